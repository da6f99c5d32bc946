//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Zone names must be fully qualified (dot-terminated)
    #[error("Invalid zone name: {0}")]
    InvalidZoneName(String),

    /// Record type tag that is not part of the model
    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    /// A record with the same name and type is already in the zone
    #[error("Duplicate record: {record_type} '{name}'")]
    DuplicateRecord { name: String, record_type: String },

    /// Record failed validation
    #[error("Invalid record {fqdn}: {}", reasons.join(", "))]
    InvalidRecord { fqdn: String, reasons: Vec<String> },
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
