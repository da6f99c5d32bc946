//! # dme-sync-provider
//!
//! Keeps [DNS Made Easy](https://dnsmadeeasy.com/) managed zones in sync with
//! a desired [`Zone`].
//!
//! Two layers:
//!
//! - [`DnsMadeEasyClient`]: the signed REST client. HMAC-SHA1 request
//!   signing, a per-client domain id cache, batched record create/delete and
//!   an optional pause after every successful request.
//! - [`DnsMadeEasyProvider`]: the [`DnsProvider`] adapter. Converts API
//!   record rows to typed records and back, plans the changes between the
//!   live zone and the desired one, and applies them.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dme_sync_provider::{
//!     create_provider, DnsMadeEasyConfig, DnsProvider, Record, RecordData, Zone,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DnsMadeEasyConfig::new("api-key", "secret-key");
//!     let provider = create_provider("dme", &config)?;
//!
//!     let mut desired = Zone::new("example.com.")?;
//!     desired.add_record(
//!         Record::new("www", 300, RecordData::A(vec!["1.2.3.4".to_string()])),
//!         false,
//!         false,
//!     )?;
//!
//!     if let Some(plan) = provider.plan(&desired).await? {
//!         let applied = provider.apply(&plan).await?;
//!         println!("applied {applied} change(s)");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::Unauthorized`]: the API rejected the credentials
//! - [`ProviderError::NotFound`]: the domain does not exist
//! - [`ProviderError::BadRequest`]: the API rejected the request, with its messages
//! - [`ProviderError::SupportsViolation`]: the desired zone uses something
//!   the API cannot store and strict supports handling is on
//!
//! Nothing is retried.

mod config;
mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

pub use config::DnsMadeEasyConfig;
pub use factory::create_provider;

// Re-export core trait only (internal traits are not exported)
pub use traits::DnsProvider;

pub use providers::{
    DnsMadeEasyClient, DnsMadeEasyClientBuilder, DnsMadeEasyProvider, DnsMadeEasyProviderBuilder,
    DomainInfo, DomainLookup, RecordParams, RemoteRecord,
};

// Re-export the zone model
pub use dme_sync_core::{
    CaaValue, Change, ChangeCounts, ChangeTarget, CoreError, MxValue, Plan, Record, RecordData,
    RecordType, RoutingPolicy, SrvValue, Zone,
};
