//! DNS record model

use std::collections::BTreeMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// DNS record type.
///
/// Variants are declared in wire-tag order, so the derived `Ord` sorts
/// records the same way a sorted listing of tags would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Apex alias, flattened by the provider.
    Alias,
    /// Certificate Authority Authorization record.
    Caa,
    /// Canonical name record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Name server record.
    Ns,
    /// Pointer record.
    Ptr,
    /// Service locator record.
    Srv,
    /// Text record.
    Txt,
}

impl RecordType {
    /// Every record type, in tag order.
    pub const ALL: [Self; 10] = [
        Self::A,
        Self::Aaaa,
        Self::Alias,
        Self::Caa,
        Self::Cname,
        Self::Mx,
        Self::Ns,
        Self::Ptr,
        Self::Srv,
        Self::Txt,
    ];

    /// Upper-case wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Alias => "ALIAS",
            Self::Caa => "CAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownRecordType(s.to_string()))
    }
}

/// MX value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MxValue {
    /// Lower is preferred.
    pub preference: u16,
    /// Fully-qualified mail server name.
    pub exchange: String,
}

/// SRV value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SrvValue {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    /// Fully-qualified target, or `.` for "service not available".
    pub target: String,
}

/// CAA value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaaValue {
    /// Issuer critical flag (0 or 128).
    pub flags: u8,
    /// Property tag (`issue`, `issuewild`, `iodef`).
    pub tag: String,
    pub value: String,
}

/// Type-specific record payload.
///
/// Multi-value lists are kept sorted and de-duplicated once the record is
/// built through [`Record::new`] or added to a zone, so equality does not
/// depend on the order a source listed the values in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "UPPERCASE")]
pub enum RecordData {
    A(Vec<String>),
    Aaaa(Vec<String>),
    Alias(String),
    Caa(Vec<CaaValue>),
    Cname(String),
    Mx(Vec<MxValue>),
    Ns(Vec<String>),
    Ptr(String),
    Srv(Vec<SrvValue>),
    Txt(Vec<String>),
}

fn sorted<T: Ord>(mut values: Vec<T>) -> Vec<T> {
    values.sort();
    values.dedup();
    values
}

impl RecordData {
    /// Returns the [`RecordType`] discriminant.
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A(_) => RecordType::A,
            Self::Aaaa(_) => RecordType::Aaaa,
            Self::Alias(_) => RecordType::Alias,
            Self::Caa(_) => RecordType::Caa,
            Self::Cname(_) => RecordType::Cname,
            Self::Mx(_) => RecordType::Mx,
            Self::Ns(_) => RecordType::Ns,
            Self::Ptr(_) => RecordType::Ptr,
            Self::Srv(_) => RecordType::Srv,
            Self::Txt(_) => RecordType::Txt,
        }
    }

    /// Sorts and de-duplicates multi-value payloads.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::A(v) => Self::A(sorted(v)),
            Self::Aaaa(v) => Self::Aaaa(sorted(v)),
            Self::Caa(v) => Self::Caa(sorted(v)),
            Self::Mx(v) => Self::Mx(sorted(v)),
            Self::Ns(v) => Self::Ns(sorted(v)),
            Self::Srv(v) => Self::Srv(sorted(v)),
            Self::Txt(v) => Self::Txt(sorted(v)),
            single @ (Self::Alias(_) | Self::Cname(_) | Self::Ptr(_)) => single,
        }
    }
}

/// Traffic routing attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rules", rename_all = "lowercase")]
pub enum RoutingPolicy {
    /// Every resolver gets the record's values.
    #[default]
    Simple,
    /// Region code to values.
    Geo(BTreeMap<String, Vec<String>>),
    /// Pool name to values.
    Dynamic(BTreeMap<String, Vec<String>>),
}

impl RoutingPolicy {
    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple)
    }
}

/// (name, type) identity of a record inside a zone.
pub type RecordKey = (String, RecordType);

/// A DNS record relative to its zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Name relative to the zone apex; empty for the apex itself.
    pub name: String,
    /// Time to live in seconds.
    pub ttl: u32,
    #[serde(flatten)]
    pub data: RecordData,
    #[serde(default, skip_serializing_if = "RoutingPolicy::is_simple")]
    pub routing: RoutingPolicy,
}

impl Record {
    pub fn new(name: impl Into<String>, ttl: u32, data: RecordData) -> Self {
        Self {
            name: name.into(),
            ttl,
            data: data.normalized(),
            routing: RoutingPolicy::Simple,
        }
    }

    #[must_use]
    pub fn with_routing(mut self, routing: RoutingPolicy) -> Self {
        self.routing = routing;
        self
    }

    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }

    pub fn key(&self) -> RecordKey {
        (self.name.clone(), self.record_type())
    }

    /// Fully-qualified name inside `zone_name` (which must be dot-terminated).
    pub fn fqdn(&self, zone_name: &str) -> String {
        if self.name.is_empty() {
            zone_name.to_string()
        } else {
            format!("{}.{zone_name}", self.name)
        }
    }

    pub fn is_root_ns(&self) -> bool {
        self.name.is_empty() && self.record_type() == RecordType::Ns
    }

    /// Human-readable reasons this record is not valid. Empty when valid.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        let rtype = self.record_type();

        match &self.data {
            RecordData::A(values) => {
                check_not_empty(values, &mut reasons);
                for v in values {
                    if v.parse::<Ipv4Addr>().is_err() {
                        reasons.push(format!("invalid IPv4 address \"{v}\""));
                    }
                }
            }
            RecordData::Aaaa(values) => {
                check_not_empty(values, &mut reasons);
                for v in values {
                    if v.parse::<Ipv6Addr>().is_err() {
                        reasons.push(format!("invalid IPv6 address \"{v}\""));
                    }
                }
            }
            RecordData::Alias(value) | RecordData::Cname(value) | RecordData::Ptr(value) => {
                if value.is_empty() {
                    reasons.push("missing value".to_string());
                } else {
                    check_fqdn(rtype, value, &mut reasons);
                }
            }
            RecordData::Ns(values) => {
                check_not_empty(values, &mut reasons);
                for v in values {
                    check_fqdn(rtype, v, &mut reasons);
                }
            }
            RecordData::Mx(values) => {
                check_not_empty(values, &mut reasons);
                for v in values {
                    check_fqdn(rtype, &v.exchange, &mut reasons);
                }
            }
            RecordData::Srv(values) => {
                check_not_empty(values, &mut reasons);
                for v in values.iter().filter(|v| v.target != ".") {
                    check_fqdn(rtype, &v.target, &mut reasons);
                }
            }
            RecordData::Caa(values) => {
                check_not_empty(values, &mut reasons);
                for v in values.iter().filter(|v| v.flags != 0 && v.flags != 128) {
                    reasons.push(format!("invalid CAA flags {}", v.flags));
                }
            }
            RecordData::Txt(values) => {
                check_not_empty(values, &mut reasons);
                if values.iter().any(|v| has_unescaped_semicolon(v)) {
                    reasons.push("unescaped ; in TXT value".to_string());
                }
            }
        }

        match rtype {
            RecordType::Cname if self.name.is_empty() => {
                reasons.push("root CNAME not allowed".to_string());
            }
            RecordType::Alias if !self.name.is_empty() => {
                reasons.push("non-root ALIAS not allowed".to_string());
            }
            _ => {}
        }

        reasons
    }
}

fn check_not_empty<T>(values: &[T], reasons: &mut Vec<String>) {
    if values.is_empty() {
        reasons.push("missing value(s)".to_string());
    }
}

fn check_fqdn(rtype: RecordType, value: &str, reasons: &mut Vec<String>) {
    if !value.ends_with('.') {
        reasons.push(format!("{rtype} value \"{value}\" missing trailing ."));
    }
}

fn has_unescaped_semicolon(value: &str) -> bool {
    let mut prev = None;
    for c in value.chars() {
        if c == ';' && prev != Some('\\') {
            return true;
        }
        prev = Some(c);
    }
    false
}
