//! DNS Made Easy API type definition

use serde::{Deserialize, Serialize};

// ============ Response envelopes ============

/// Listing envelope used by `GET /` and `GET /{id}/records`.
#[derive(Debug, Deserialize)]
pub(crate) struct DataResponse<T> {
    pub data: Vec<T>,
}

/// Error body, e.g. `{"error": ["Record value may not be a standalone dot."]}`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Vec<String>,
}

// ============ Domain structures ============

/// Domain item from `GET /`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DomainSummary {
    pub id: u64,
    pub name: String,
}

/// Domain metadata from `GET /id/{name}`. Only used to test existence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomainInfo {
    pub id: Option<u64>,
    pub name: Option<String>,
}

/// Body of `POST /`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateDomainRequest<'a> {
    pub name: &'a str,
}

/// Response of `POST /`.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateDomainResponse {
    pub id: u64,
}

// ============ Record structures ============

/// A record row as the API returns it.
///
/// After [`DnsMadeEasyClient::records`](super::DnsMadeEasyClient::records)
/// the type `ANAME` reads as `ALIAS` and name-like values are absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mx_level: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_critical: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caa_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gtd_location: Option<String>,
}

/// One record row to create through `createMulti`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordParams {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mx_level: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_critical: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caa_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtd_location: Option<String>,
}

impl RecordParams {
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
            ttl,
            mx_level: None,
            priority: None,
            weight: None,
            port: None,
            issuer_critical: None,
            caa_type: None,
            gtd_location: None,
        }
    }
}
