//! Changes between two zones and the plan that carries them

use serde::Serialize;

use super::record::Record;
use super::zone::Zone;

/// One step that turns an existing zone into the desired one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Change {
    Create { new: Record },
    Update { existing: Record, new: Record },
    Delete { existing: Record },
}

impl Change {
    /// The record this change is about: the new record for creates and
    /// updates, the existing one for deletes.
    pub fn record(&self) -> &Record {
        match self {
            Self::Create { new } | Self::Update { new, .. } => new,
            Self::Delete { existing } => existing,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "Create",
            Self::Update { .. } => "Update",
            Self::Delete { .. } => "Delete",
        }
    }
}

/// What the diff engine needs to know about the zone's destination.
pub trait ChangeTarget {
    /// Whether changes to `record` can be applied at all. Unsupported
    /// records are left out of the diff on both sides.
    fn supports(&self, record: &Record) -> bool;

    /// Whether NS records at the zone apex are managed.
    fn supports_root_ns(&self) -> bool {
        true
    }
}

/// Planned changes for one zone.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Zone as read from the target.
    pub existing: Zone,
    /// Zone as it should look after apply.
    pub desired: Zone,
    /// Changes in (name, type) order.
    pub changes: Vec<Change>,
    /// Whether the zone already existed at the target.
    pub exists: bool,
}

/// Number of creates, updates and deletes in a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    pub creates: usize,
    pub updates: usize,
    pub deletes: usize,
}

impl Plan {
    pub fn counts(&self) -> ChangeCounts {
        self.changes
            .iter()
            .fold(ChangeCounts::default(), |mut acc, change| {
                match change {
                    Change::Create { .. } => acc.creates += 1,
                    Change::Update { .. } => acc.updates += 1,
                    Change::Delete { .. } => acc.deletes += 1,
                }
                acc
            })
    }
}
