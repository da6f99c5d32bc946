//! DNS Made Easy error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{DnsMadeEasyClient, PROVIDER_NAME};

/// DNS Made Easy reports failures through the HTTP status, with an optional
/// `{"error": [...]}` body.
impl ProviderErrorMapper for DnsMadeEasyClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.status {
            400 => ProviderError::BadRequest {
                provider: self.provider_name().to_string(),
                messages: if raw.messages.is_empty() {
                    vec![raw.body]
                } else {
                    raw.messages
                },
            },
            401 | 403 => ProviderError::Unauthorized {
                provider: self.provider_name().to_string(),
                raw_message: (!raw.messages.is_empty()).then(|| raw.messages.join("; ")),
            },
            404 => ProviderError::NotFound {
                provider: self.provider_name().to_string(),
                resource: context.resource(),
            },
            _ => self.http_error(raw),
        }
    }
}
