//! DNS Made Easy HMAC-SHA1 request signing

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::providers::common::hmac_sha1_hex;

use super::{DnsMadeEasyClient, PROVIDER_NAME};

/// `x-dnsme-requestDate` value, e.g. `Sat, 12 Feb 2011 20:59:04 +0000`
pub(crate) fn request_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
}

impl DnsMadeEasyClient {
    /// `x-dnsme-hmac` value: hex HMAC-SHA1 of the request date keyed with the
    /// secret key.
    pub(crate) fn sign(&self, request_date: &str) -> Result<String> {
        hmac_sha1_hex(
            self.secret_key.as_bytes(),
            request_date.as_bytes(),
            PROVIDER_NAME,
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn client(secret: &str) -> DnsMadeEasyClient {
        DnsMadeEasyClient::new("api".to_string(), secret.to_string()).unwrap()
    }

    #[test]
    fn request_date_format() {
        let now = Utc.with_ymd_and_hms(2011, 2, 12, 20, 59, 4).unwrap();
        assert_eq!(request_date(now), "Sat, 12 Feb 2011 20:59:04 +0000");

        let now = Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap();
        assert_eq!(request_date(now), "Fri, 05 Jan 2024 08:00:00 +0000");
    }

    #[test]
    fn sign_is_lower_hex_sha1() {
        let sig = client("secret")
            .sign("Sat, 12 Feb 2011 20:59:04 +0000")
            .unwrap();
        assert_eq!(sig.len(), 40);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn sign_known_vector() {
        let sig = client("key")
            .sign("The quick brown fox jumps over the lazy dog")
            .unwrap();
        assert_eq!(sig, "de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9");
    }

    #[test]
    fn sign_depends_on_date_and_secret() {
        let a = client("secret").sign("Sat, 12 Feb 2011 20:59:04 +0000").unwrap();
        let b = client("secret").sign("Sat, 12 Feb 2011 20:59:05 +0000").unwrap();
        let c = client("other").sign("Sat, 12 Feb 2011 20:59:04 +0000").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
