//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod dnsmadeeasy;

pub use dnsmadeeasy::{
    DnsMadeEasyClient, DnsMadeEasyClientBuilder, DnsMadeEasyProvider, DnsMadeEasyProviderBuilder,
    DomainLookup,
};
pub use dnsmadeeasy::{DomainInfo, RecordParams, RemoteRecord};

pub(crate) use dnsmadeeasy::{DEFAULT_BATCH_SIZE, PROVIDER_NAME};
