//! Helpers shared by the provider modules

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha1::Sha1;

use crate::error::{ProviderError, Result};

type HmacSha1 = Hmac<Sha1>;

// ============ HTTP Client ============

/// Connect timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Builds an HTTP client with the default timeouts
pub fn create_http_client(provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

// ============ HMAC-SHA1 ============

/// Lower-case hex HMAC-SHA1 of `data` keyed with `key`.
pub fn hmac_sha1_hex(key: &[u8], data: &[u8], provider: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|e| ProviderError::InvalidParameter {
        provider: provider.to_string(),
        param: "secret_key".to_string(),
        detail: e.to_string(),
    })?;
    mac.update(data);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

// ============ Record names ============

/// Makes a record value absolute inside `zone_name` (dot-terminated).
///
/// An empty value means the zone apex; a value without a trailing dot is
/// relative to the zone.
/// e.g. "" + "unit.tests." -> "unit.tests."
/// e.g. "smtp-1" + "unit.tests." -> "smtp-1.unit.tests."
pub fn absolute_value(value: &str, zone_name: &str) -> String {
    if value.is_empty() {
        zone_name.to_string()
    } else if value.ends_with('.') {
        value.to_string()
    } else {
        format!("{value}.{zone_name}")
    }
}
