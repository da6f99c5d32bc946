//! DNS Made Easy Provider

mod client;
mod convert;
mod error;
mod http;
mod provider;
mod sign;
mod types;

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Mutex;

use crate::config::DnsMadeEasyConfig;
use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::utils::log_sanitizer::mask_secret;

pub use client::DomainLookup;
pub use types::{DomainInfo, RecordParams, RemoteRecord};

pub(crate) const PROVIDER_NAME: &str = "dnsmadeeasy";
pub(crate) const DME_PRODUCTION_URL: &str = "https://api.dnsmadeeasy.com/V2.0/dns/managed";
pub(crate) const DME_SANDBOX_URL: &str = "https://api.sandbox.dnsmadeeasy.com/V2.0/dns/managed";
pub(crate) const USER_AGENT: &str = concat!("dme-sync/", env!("CARGO_PKG_VERSION"));
/// Maximum number of records per bulk create/delete request
pub(crate) const DEFAULT_BATCH_SIZE: usize = 200;

/// DNS Made Easy REST API client
///
/// Owns the domain id cache. Record listings are not cached here; the
/// provider keeps those per zone.
pub struct DnsMadeEasyClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) secret_key: String,
    pub(crate) base_url: String,
    pub(crate) ratelimit_delay: Duration,
    pub(crate) batch_size: usize,
    /// Zone name (dot-terminated) to domain id, loaded on first use
    pub(crate) domains: Mutex<Option<HashMap<String, u64>>>,
}

impl fmt::Debug for DnsMadeEasyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsMadeEasyClient")
            .field("api_key", &mask_secret(&self.api_key))
            .field("secret_key", &mask_secret(&self.secret_key))
            .field("base_url", &self.base_url)
            .field("ratelimit_delay", &self.ratelimit_delay)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

/// DNS Made Easy client builder
pub struct DnsMadeEasyClientBuilder {
    api_key: String,
    secret_key: String,
    sandbox: bool,
    base_url: Option<String>,
    ratelimit_delay: Duration,
    batch_size: usize,
}

impl DnsMadeEasyClientBuilder {
    fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key,
            sandbox: false,
            base_url: None,
            ratelimit_delay: Duration::ZERO,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Use the sandbox API instead of production.
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Overrides the API base URL. Takes precedence over `sandbox`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Pause after every successful request.
    pub fn ratelimit_delay(mut self, delay: Duration) -> Self {
        self.ratelimit_delay = delay;
        self
    }

    /// Records per bulk request. Zero is treated as one.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn build(self) -> Result<DnsMadeEasyClient> {
        let base_url = self.base_url.unwrap_or_else(|| {
            if self.sandbox {
                DME_SANDBOX_URL.to_string()
            } else {
                DME_PRODUCTION_URL.to_string()
            }
        });

        Ok(DnsMadeEasyClient {
            client: create_http_client(PROVIDER_NAME)?,
            api_key: self.api_key,
            secret_key: self.secret_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            ratelimit_delay: self.ratelimit_delay,
            batch_size: self.batch_size,
            domains: Mutex::new(None),
        })
    }
}

impl DnsMadeEasyClient {
    pub fn new(api_key: String, secret_key: String) -> Result<Self> {
        Self::builder(api_key, secret_key).build()
    }

    pub fn builder(api_key: String, secret_key: String) -> DnsMadeEasyClientBuilder {
        DnsMadeEasyClientBuilder::new(api_key, secret_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

/// DNS Made Easy Provider
///
/// Translates between zones and the API's record rows, and caches each
/// zone's listing until the zone is next applied.
pub struct DnsMadeEasyProvider {
    pub(crate) id: String,
    pub(crate) client: DnsMadeEasyClient,
    pub(crate) strict_supports: bool,
    /// Zone name to the listing fetched for it
    pub(crate) zone_records: Mutex<HashMap<String, Vec<RemoteRecord>>>,
}

impl fmt::Debug for DnsMadeEasyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsMadeEasyProvider")
            .field("id", &self.id)
            .field("client", &self.client)
            .field("strict_supports", &self.strict_supports)
            .finish_non_exhaustive()
    }
}

/// DNS Made Easy Provider Builder
pub struct DnsMadeEasyProviderBuilder {
    id: String,
    client: DnsMadeEasyClientBuilder,
    strict_supports: bool,
}

impl DnsMadeEasyProviderBuilder {
    fn new(id: String, api_key: String, secret_key: String) -> Self {
        Self {
            id,
            client: DnsMadeEasyClient::builder(api_key, secret_key),
            strict_supports: true,
        }
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.client = self.client.sandbox(sandbox);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.base_url(base_url);
        self
    }

    pub fn ratelimit_delay(mut self, delay: Duration) -> Self {
        self.client = self.client.ratelimit_delay(delay);
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.client = self.client.batch_size(batch_size);
        self
    }

    pub fn strict_supports(mut self, strict: bool) -> Self {
        self.strict_supports = strict;
        self
    }

    pub fn build(self) -> Result<DnsMadeEasyProvider> {
        log::debug!(
            "DnsMadeEasyProvider[{}]: strict_supports={}",
            self.id,
            self.strict_supports
        );
        Ok(DnsMadeEasyProvider {
            id: self.id,
            client: self.client.build()?,
            strict_supports: self.strict_supports,
            zone_records: Mutex::new(HashMap::new()),
        })
    }
}

impl DnsMadeEasyProvider {
    pub fn new(id: String, api_key: String, secret_key: String) -> Result<Self> {
        Self::builder(id, api_key, secret_key).build()
    }

    pub fn builder(id: String, api_key: String, secret_key: String) -> DnsMadeEasyProviderBuilder {
        DnsMadeEasyProviderBuilder::new(id, api_key, secret_key)
    }

    /// Builds a provider from validated configuration.
    pub fn from_config(id: impl Into<String>, config: &DnsMadeEasyConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Self::builder(
            id.into(),
            config.api_key.clone(),
            config.secret_key.clone(),
        )
        .sandbox(config.sandbox)
        .ratelimit_delay(config.ratelimit_delay_duration())
        .batch_size(config.batch_size)
        .strict_supports(config.strict_supports);

        if let Some(base_url) = &config.base_url {
            builder = builder.base_url(base_url.clone());
        }
        builder.build()
    }

    pub fn client(&self) -> &DnsMadeEasyClient {
        &self.client
    }
}
