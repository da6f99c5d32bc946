use async_trait::async_trait;
use dme_sync_core::{ChangeTarget, Plan, Zone};

use crate::error::{ProviderError, Result};

/// Raw API error (internal)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP status code
    pub status: u16,
    /// Messages from the API's `error` list, if the body carried one
    pub messages: Vec<String>,
    /// Raw response body
    pub body: String,
}

impl RawApiError {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            messages: Vec::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }
}

/// Request context attached when mapping an error (internal)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Domain name the request was about
    pub domain: Option<String>,
    /// Request path relative to the API base
    pub path: Option<String>,
}

impl ErrorContext {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            domain: None,
            path: Some(path.into()),
        }
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// The most specific description of what was requested.
    pub fn resource(&self) -> String {
        self.domain
            .clone()
            .or_else(|| self.path.clone())
            .unwrap_or_else(|| "<unknown>".to_string())
    }
}

/// Maps non-2xx responses to [`ProviderError`] (internal)
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Maps a raw API error to a [`ProviderError`]
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Fallback for statuses with no specific mapping
    fn http_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Http {
            provider: self.provider_name().to_string(),
            status: raw.status,
            body: raw.body,
        }
    }
}

/// DNS provider: reads a zone from a remote service and applies plans to it.
///
/// [`ChangeTarget`] is a supertrait so the diff engine can ask the provider
/// which records it manages.
#[async_trait]
pub trait DnsProvider: ChangeTarget + Send + Sync {
    /// Instance identifier, used in logs and supports errors.
    fn id(&self) -> &str;

    /// Whether supports problems fail planning (`true`) or are repaired with
    /// a warning (`false`).
    fn strict_supports(&self) -> bool;

    /// Adds the remote records of `zone` to it.
    ///
    /// Returns whether the zone exists at the provider. With `lenient`,
    /// records that fail validation are kept with a warning.
    async fn populate(&self, zone: &mut Zone, lenient: bool) -> Result<bool>;

    /// Adjusts the desired zone to what the provider can express before it
    /// is diffed.
    fn process_desired_zone(&self, desired: Zone) -> Result<Zone>;

    /// Applies `plan` and returns the number of changes applied.
    async fn apply(&self, plan: &Plan) -> Result<usize>;

    /// Builds the plan that turns the remote zone into `desired`.
    ///
    /// Remote records are read leniently: a row the provider stores but the
    /// local model rejects is kept with a warning. Returns `None` when
    /// nothing needs to change.
    async fn plan(&self, desired: &Zone) -> Result<Option<Plan>> {
        log::info!("plan: zone={}, provider={}", desired.name(), self.id());

        let mut existing = desired.empty_copy();
        let exists = self.populate(&mut existing, true).await?;
        let desired = self.process_desired_zone(desired.clone())?;

        let changes = existing.changes(&desired, self);
        if changes.is_empty() {
            log::info!("plan:   no changes");
            return Ok(None);
        }

        let plan = Plan {
            existing,
            desired,
            changes,
            exists,
        };
        let counts = plan.counts();
        log::info!(
            "plan:   creates={}, updates={}, deletes={}, exists={}",
            counts.creates,
            counts.updates,
            counts.deletes,
            plan.exists
        );
        Ok(Some(plan))
    }

    /// Fails with [`ProviderError::SupportsViolation`] in strict mode,
    /// otherwise logs `msg` together with the `fallback` being taken.
    fn supports_warn_or_except(&self, msg: &str, fallback: &str) -> Result<()> {
        if self.strict_supports() {
            return Err(ProviderError::SupportsViolation {
                provider: self.id().to_string(),
                message: msg.to_string(),
            });
        }
        log::warn!("[{}] {msg}, {fallback}", self.id());
        Ok(())
    }
}
