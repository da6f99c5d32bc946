//! Provider factory.

use std::sync::Arc;

use crate::config::DnsMadeEasyConfig;
use crate::error::Result;
use crate::providers::DnsMadeEasyProvider;
use crate::traits::DnsProvider;

/// Creates a [`DnsProvider`] from validated configuration.
///
/// The provider is wrapped in `Arc<dyn DnsProvider>` so it can be shared
/// across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use dme_sync_provider::{create_provider, DnsMadeEasyConfig, DnsProvider};
///
/// let config = DnsMadeEasyConfig::new("api-key", "secret-key");
/// let provider = create_provider("dme", &config).unwrap();
/// assert_eq!(provider.id(), "dme");
/// ```
///
/// # Errors
///
/// Returns [`ProviderError::InvalidParameter`](crate::ProviderError::InvalidParameter)
/// when the configuration does not validate.
pub fn create_provider(id: &str, config: &DnsMadeEasyConfig) -> Result<Arc<dyn DnsProvider>> {
    Ok(Arc::new(DnsMadeEasyProvider::from_config(id, config)?))
}
