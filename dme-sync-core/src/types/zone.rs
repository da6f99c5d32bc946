//! Zone model and the diff engine

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoreError, CoreResult};

use super::change::{Change, ChangeTarget};
use super::record::{Record, RecordKey, RecordType};

/// A DNS zone: a fully-qualified name plus its records, keyed by (name, type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    name: String,
    records: BTreeMap<RecordKey, Record>,
}

impl Zone {
    /// Creates an empty zone. `name` must be dot-terminated.
    pub fn new(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        if name.len() < 2 || !name.ends_with('.') {
            return Err(CoreError::InvalidZoneName(name));
        }
        Ok(Self {
            name,
            records: BTreeMap::new(),
        })
    }

    /// Fully-qualified name, e.g. `unit.tests.`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without the trailing dot, e.g. `unit.tests`
    pub fn hostname(&self) -> &str {
        self.name.trim_end_matches('.')
    }

    /// An empty zone with the same name.
    #[must_use]
    pub fn empty_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            records: BTreeMap::new(),
        }
    }

    /// Adds a record.
    ///
    /// A record with the same (name, type) is replaced only when `replace` is
    /// set. Validation problems are fatal unless `lenient`, in which case they
    /// are logged and the record is kept.
    pub fn add_record(&mut self, mut record: Record, replace: bool, lenient: bool) -> CoreResult<()> {
        record.data = record.data.normalized();
        let key = record.key();

        if !replace && self.records.contains_key(&key) {
            return Err(CoreError::DuplicateRecord {
                name: record.name,
                record_type: key.1.to_string(),
            });
        }

        let reasons = record.validation_errors();
        if !reasons.is_empty() {
            let fqdn = record.fqdn(&self.name);
            if !lenient {
                return Err(CoreError::InvalidRecord { fqdn, reasons });
            }
            for reason in &reasons {
                log::warn!("add_record: {fqdn} {}: {reason}", key.1);
            }
        }

        self.records.insert(key, record);
        Ok(())
    }

    pub fn remove_record(&mut self, name: &str, record_type: RecordType) -> Option<Record> {
        self.records.remove(&(name.to_string(), record_type))
    }

    pub fn get(&self, name: &str, record_type: RecordType) -> Option<&Record> {
        self.records.get(&(name.to_string(), record_type))
    }

    /// Records in (name, type) order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Changes that turn `self` (the existing zone) into `desired`.
    ///
    /// Records `target` cannot manage are left out on both sides. The result
    /// is in (name, type) order.
    pub fn changes<T>(&self, desired: &Self, target: &T) -> Vec<Change>
    where
        T: ChangeTarget + ?Sized,
    {
        let manages = |record: &Record| {
            if record.is_root_ns() && !target.supports_root_ns() {
                log::debug!("changes: skipping root NS, unsupported by target");
                return false;
            }
            if !target.supports(record) {
                log::info!(
                    "changes: skipping {} {}, unsupported by target",
                    record.record_type(),
                    record.fqdn(&self.name)
                );
                return false;
            }
            true
        };

        let keys: BTreeSet<&RecordKey> =
            self.records.keys().chain(desired.records.keys()).collect();

        let mut changes = Vec::new();
        for key in keys {
            match (self.records.get(key), desired.records.get(key)) {
                (Some(existing), None) if manages(existing) => {
                    changes.push(Change::Delete {
                        existing: existing.clone(),
                    });
                }
                (None, Some(new)) if manages(new) => {
                    changes.push(Change::Create { new: new.clone() });
                }
                (Some(existing), Some(new)) if existing != new && manages(new) => {
                    changes.push(Change::Update {
                        existing: existing.clone(),
                        new: new.clone(),
                    });
                }
                _ => {}
            }
        }

        log::debug!("changes: {} change(s) for {}", changes.len(), self.name);
        changes
    }
}
