//! Provider configuration.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::providers::{DEFAULT_BATCH_SIZE, PROVIDER_NAME};
use crate::utils::log_sanitizer::mask_secret;

/// Construction-time settings for a DNS Made Easy provider.
///
/// Deserializes from camelCase keys:
///
/// ```json
/// { "apiKey": "...", "secretKey": "...", "sandbox": true, "ratelimitDelay": 0.5 }
/// ```
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsMadeEasyConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// Shared secret used to sign requests.
    pub secret_key: String,
    /// Use the sandbox API instead of production.
    #[serde(default)]
    pub sandbox: bool,
    /// Seconds to pause after each successful request.
    #[serde(default)]
    pub ratelimit_delay: f64,
    /// Records or ids per bulk request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Fail planning on unsupported content instead of repairing it.
    #[serde(default = "default_strict_supports")]
    pub strict_supports: bool,
    /// Overrides the API base URL (and `sandbox`).
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_strict_supports() -> bool {
    true
}

impl DnsMadeEasyConfig {
    /// Production settings with the given credentials.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            sandbox: false,
            ratelimit_delay: 0.0,
            batch_size: DEFAULT_BATCH_SIZE,
            strict_supports: true,
            base_url: None,
        }
    }

    /// Checks the settings before a provider is built from them.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidParameter`] for empty credentials, a
    /// zero batch size, or a negative or non-finite delay.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(invalid("apiKey", "must not be empty"));
        }
        if self.secret_key.trim().is_empty() {
            return Err(invalid("secretKey", "must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(invalid("batchSize", "must be at least 1"));
        }
        if !self.ratelimit_delay.is_finite() || self.ratelimit_delay < 0.0 {
            return Err(invalid(
                "ratelimitDelay",
                &format!("must be a non-negative number of seconds, got {}", self.ratelimit_delay),
            ));
        }
        Ok(())
    }

    /// The delay as a [`Duration`]. Invalid values yield zero.
    pub fn ratelimit_delay_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.ratelimit_delay).unwrap_or(Duration::ZERO)
    }
}

fn invalid(param: &str, detail: &str) -> ProviderError {
    ProviderError::InvalidParameter {
        provider: PROVIDER_NAME.to_string(),
        param: param.to_string(),
        detail: detail.to_string(),
    }
}

impl fmt::Debug for DnsMadeEasyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsMadeEasyConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("secret_key", &mask_secret(&self.secret_key))
            .field("sandbox", &self.sandbox)
            .field("ratelimit_delay", &self.ratelimit_delay)
            .field("batch_size", &self.batch_size)
            .field("strict_supports", &self.strict_supports)
            .field("base_url", &self.base_url)
            .finish()
    }
}
