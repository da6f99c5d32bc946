//! DNS Made Easy API operations

use std::collections::HashMap;

use dme_sync_core::RecordType;
use tokio::sync::{MappedMutexGuard, MutexGuard};

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::providers::common::absolute_value;
use crate::traits::{ErrorContext, ProviderErrorMapper};

use super::types::{CreateDomainRequest, CreateDomainResponse, DataResponse, DomainSummary};
use super::{DnsMadeEasyClient, DomainInfo, RecordParams, RemoteRecord};

/// Outcome of looking a domain up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainLookup {
    Found(DomainInfo),
    NotFound,
}

/// Wire type for ALIAS records.
const ANAME: &str = "ANAME";
/// Geo location stamped on every created record.
const DEFAULT_GTD_LOCATION: &str = "DEFAULT";

/// Types whose values name a host, relative to the zone unless dot-terminated.
fn has_name_value(record_type: &str) -> bool {
    [
        RecordType::Alias,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Srv,
    ]
    .iter()
    .any(|t| t.as_str() == record_type)
}

impl DnsMadeEasyClient {
    /// Domain id cache, loaded with one `GET /` on first use.
    ///
    /// The lock is held across the fetch so concurrent callers share it.
    async fn domain_cache(&self) -> Result<MappedMutexGuard<'_, HashMap<String, u64>>> {
        let mut cache = self.domains.lock().await;
        if cache.is_none() {
            let listing: DataResponse<DomainSummary> =
                self.get("/", ErrorContext::path("/")).await?;
            let ids: HashMap<String, u64> = listing
                .data
                .into_iter()
                .map(|d| (format!("{}.", d.name), d.id))
                .collect();
            log::debug!("domains: loaded {} domain(s)", ids.len());
            *cache = Some(ids);
        }
        Ok(MutexGuard::map(cache, |c| c.get_or_insert_with(HashMap::new)))
    }

    /// Zone name (dot-terminated) to domain id for every domain on the account.
    pub async fn domains(&self) -> Result<HashMap<String, u64>> {
        Ok(self.domain_cache().await?.clone())
    }

    /// Domain id for `zone_name` (dot-terminated), if the account has it.
    pub async fn domain_id(&self, zone_name: &str) -> Result<Option<u64>> {
        Ok(self.domain_cache().await?.get(zone_name).copied())
    }

    async fn require_domain_id(&self, zone_name: &str) -> Result<u64> {
        self.domain_id(zone_name)
            .await?
            .ok_or_else(|| ProviderError::NotFound {
                provider: self.provider_name().to_string(),
                resource: zone_name.to_string(),
            })
    }

    /// Looks a domain up by name (without the trailing dot).
    pub async fn domain(&self, name: &str) -> Result<DomainLookup> {
        let path = format!("/id/{}", urlencoding::encode(name));
        let ctx = ErrorContext::path(&path).with_domain(name);
        match self.get::<DomainInfo>(&path, ctx).await {
            Ok(info) => Ok(DomainLookup::Found(info)),
            Err(ProviderError::NotFound { .. }) => Ok(DomainLookup::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Creates a domain (name without the trailing dot) and returns its id.
    ///
    /// The new id is added to the domain id cache.
    pub async fn domain_create(&self, name: &str) -> Result<u64> {
        let text = self
            .post(
                "/",
                &CreateDomainRequest { name },
                ErrorContext::path("/").with_domain(name),
            )
            .await?;
        let created: CreateDomainResponse = HttpUtils::parse_json(&text, self.provider_name())?;

        log::info!("domain_create: {name} id={}", created.id);
        self.domain_cache()
            .await?
            .insert(format!("{name}."), created.id);
        Ok(created.id)
    }

    /// Every record of `zone_name` (dot-terminated).
    ///
    /// An unknown zone yields an empty list. `ANAME` rows are reported as
    /// `ALIAS`, and host values of ALIAS/CNAME/MX/NS/SRV rows are made
    /// absolute.
    pub async fn records(&self, zone_name: &str) -> Result<Vec<RemoteRecord>> {
        let Some(zone_id) = self.domain_id(zone_name).await? else {
            log::debug!("records: {zone_name} has no domain id");
            return Ok(Vec::new());
        };

        let path = format!("/{zone_id}/records");
        let listing: DataResponse<RemoteRecord> = self
            .get(&path, ErrorContext::path(&path).with_domain(zone_name))
            .await?;

        let records = listing
            .data
            .into_iter()
            .map(|mut record| {
                if record.record_type == ANAME {
                    record.record_type = RecordType::Alias.as_str().to_string();
                }
                if has_name_value(&record.record_type) {
                    record.value = absolute_value(&record.value, zone_name);
                }
                record
            })
            .collect();
        Ok(records)
    }

    /// Deletes records by id, `batch_size` ids per request, in order.
    pub async fn record_multi_delete(&self, zone_name: &str, record_ids: &[u64]) -> Result<()> {
        let zone_id = self.require_domain_id(zone_name).await?;
        let path = format!("/{zone_id}/records");

        for batch in record_ids.chunks(self.batch_size) {
            let query: Vec<(&str, String)> =
                batch.iter().map(|id| ("ids", id.to_string())).collect();
            log::debug!("record_multi_delete: {zone_name} {} id(s)", batch.len());
            self.delete(
                &path,
                &query,
                ErrorContext::path(&path).with_domain(zone_name),
            )
            .await?;
        }
        Ok(())
    }

    /// Creates records, `batch_size` per request, in order.
    ///
    /// ALIAS is sent as `ANAME` and every row gets the default geo location.
    pub async fn record_multi_create(
        &self,
        zone_name: &str,
        mut records: Vec<RecordParams>,
    ) -> Result<()> {
        let zone_id = self.require_domain_id(zone_name).await?;
        let path = format!("/{zone_id}/records/createMulti");

        for record in &mut records {
            if record.record_type == RecordType::Alias.as_str() {
                record.record_type = ANAME.to_string();
            }
            record.gtd_location = Some(DEFAULT_GTD_LOCATION.to_string());
        }

        for batch in records.chunks(self.batch_size) {
            log::debug!("record_multi_create: {zone_name} {} record(s)", batch.len());
            self.post(
                &path,
                batch,
                ErrorContext::path(&path).with_domain(zone_name),
            )
            .await?;
        }
        Ok(())
    }
}
