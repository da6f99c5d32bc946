//! DNS Made Easy sync core library
//!
//! Provider-independent model shared by the sync tooling:
//! - Zones and typed records, validated on insert
//! - The diff engine that turns an existing zone into a desired one
//! - Plans, the unit a provider applies

pub mod error;
pub mod types;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use types::{
    CaaValue, Change, ChangeCounts, ChangeTarget, MxValue, Plan, Record, RecordData, RecordKey,
    RecordType, RoutingPolicy, SrvValue, Zone,
};
