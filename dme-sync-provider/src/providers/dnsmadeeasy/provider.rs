//! `DnsProvider` implementation for DNS Made Easy

use std::collections::BTreeMap;

use async_trait::async_trait;
use dme_sync_core::{Change, ChangeTarget, Plan, Record, RecordData, RecordType, RoutingPolicy, Zone};

use crate::error::{ProviderError, Result};
use crate::traits::DnsProvider;

use super::convert::{params_for, record_from_rows};
use super::{DnsMadeEasyProvider, DomainLookup, RemoteRecord};

/// Record types the API can store.
const SUPPORTED_TYPES: [RecordType; 10] = [
    RecordType::A,
    RecordType::Aaaa,
    RecordType::Alias,
    RecordType::Caa,
    RecordType::Cname,
    RecordType::Mx,
    RecordType::Ns,
    RecordType::Ptr,
    RecordType::Srv,
    RecordType::Txt,
];

impl DnsMadeEasyProvider {
    /// Cached listing for `zone_name`, fetched on first use.
    pub(crate) async fn zone_records(&self, zone_name: &str) -> Result<Vec<RemoteRecord>> {
        let mut cache = self.zone_records.lock().await;
        if let Some(records) = cache.get(zone_name) {
            return Ok(records.clone());
        }
        let records = self.client.records(zone_name).await?;
        cache.insert(zone_name.to_string(), records.clone());
        Ok(records)
    }

    /// Ids of the remote rows behind `existing`.
    async fn remote_ids(&self, zone_name: &str, existing: &Record) -> Result<Vec<u64>> {
        let record_type = existing.record_type();
        Ok(self
            .zone_records(zone_name)
            .await?
            .iter()
            .filter(|r| r.name == existing.name && r.record_type == record_type.as_str())
            .map(|r| r.id)
            .collect())
    }

    fn invalid_record(&self, e: &dme_sync_core::CoreError) -> ProviderError {
        ProviderError::InvalidRecord {
            provider: self.id.clone(),
            detail: e.to_string(),
        }
    }
}

impl ChangeTarget for DnsMadeEasyProvider {
    fn supports(&self, record: &Record) -> bool {
        // The API rejects a standalone dot as a record value, so NULL SRV
        // targets cannot be stored.
        if let RecordData::Srv(values) = &record.data {
            let targets: Vec<&str> = values.iter().map(|v| v.target.as_str()).collect();
            if targets.contains(&".") {
                log::warn!(
                    "[{}] supports: unsupported SRV record with target ({})",
                    self.id,
                    targets.join(", ")
                );
                return false;
            }
        }
        SUPPORTED_TYPES.contains(&record.record_type())
    }

    fn supports_root_ns(&self) -> bool {
        true
    }
}

#[async_trait]
impl DnsProvider for DnsMadeEasyProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn strict_supports(&self) -> bool {
        self.strict_supports
    }

    async fn populate(&self, zone: &mut Zone, lenient: bool) -> Result<bool> {
        log::debug!(
            "[{}] populate: name={}, lenient={lenient}",
            self.id,
            zone.name()
        );

        let rows = self.zone_records(zone.name()).await?;

        let mut groups: BTreeMap<(String, RecordType), Vec<&RemoteRecord>> = BTreeMap::new();
        for row in &rows {
            let Ok(record_type) = row.record_type.parse::<RecordType>() else {
                log::warn!(
                    "[{}] populate: skipping unsupported {} record",
                    self.id,
                    row.record_type
                );
                continue;
            };
            groups
                .entry((row.name.clone(), record_type))
                .or_default()
                .push(row);
        }

        let before = zone.len();
        for ((name, record_type), rows) in &groups {
            let record = record_from_rows(name, *record_type, rows)?;
            zone.add_record(record, false, lenient)
                .map_err(|e| self.invalid_record(&e))?;
        }

        let exists = self.client.domain_id(zone.name()).await?.is_some();
        log::info!(
            "[{}] populate:   found {} records, exists={exists}",
            self.id,
            zone.len() - before
        );
        Ok(exists)
    }

    fn process_desired_zone(&self, mut desired: Zone) -> Result<Zone> {
        let mut repaired = Vec::new();

        for record in desired.records() {
            let mut fixed: Option<Record> = None;

            if let RecordData::Txt(values) = &record.data {
                if values.iter().any(|v| v.contains('"')) {
                    self.supports_warn_or_except("Quotes not supported in TXT values", "removing them")?;
                    fixed.get_or_insert_with(|| record.clone()).data =
                        RecordData::Txt(values.iter().map(|v| v.replace('"', "")).collect());
                }
            }

            let routing = match &record.routing {
                RoutingPolicy::Simple => None,
                RoutingPolicy::Geo(_) => Some("Geo"),
                RoutingPolicy::Dynamic(_) => Some("Dynamic"),
            };
            if let Some(kind) = routing {
                let msg = format!(
                    "{kind} routing not supported for {} {}",
                    record.record_type(),
                    record.fqdn(desired.name())
                );
                self.supports_warn_or_except(&msg, "falling back to simple")?;
                fixed.get_or_insert_with(|| record.clone()).routing = RoutingPolicy::Simple;
            }

            repaired.extend(fixed);
        }

        // Repairs replace in place without re-validating.
        for record in repaired {
            desired
                .add_record(record, true, true)
                .map_err(|e| self.invalid_record(&e))?;
        }
        Ok(desired)
    }

    async fn apply(&self, plan: &Plan) -> Result<usize> {
        let desired = &plan.desired;
        let zone_name = desired.name();
        log::debug!(
            "[{}] apply: zone={zone_name}, changes={}",
            self.id,
            plan.changes.len()
        );

        let domain_name = desired.hostname();
        if self.client.domain(domain_name).await? == DomainLookup::NotFound {
            log::debug!("[{}] apply:   no matching zone, creating domain", self.id);
            self.client.domain_create(domain_name).await?;
        }

        // Updates are a delete of the old rows plus a create of the new ones.
        let mut deletions = Vec::new();
        let mut creations = Vec::new();
        for change in &plan.changes {
            match change {
                Change::Create { new } => creations.extend(params_for(new)),
                Change::Delete { existing } => {
                    deletions.extend(self.remote_ids(zone_name, existing).await?);
                }
                Change::Update { existing, new } => {
                    deletions.extend(self.remote_ids(zone_name, existing).await?);
                    creations.extend(params_for(new));
                }
            }
        }

        if !deletions.is_empty() {
            self.client
                .record_multi_delete(zone_name, &deletions)
                .await?;
        }
        if !creations.is_empty() {
            self.client
                .record_multi_create(zone_name, creations)
                .await?;
        }

        self.zone_records.lock().await.remove(zone_name);

        log::info!(
            "[{}] apply:   zone={zone_name}, deleted {} row(s), changes={}",
            self.id,
            deletions.len(),
            plan.changes.len()
        );
        Ok(plan.changes.len())
    }
}
