use serde::{Deserialize, Serialize};

/// Unified error type for all DNS Made Easy operations.
///
/// Each variant includes a `provider` field identifying where the error came
/// from: the API client reports `dnsmadeeasy`, the provider adapter reports
/// its configured id. All variants are serializable for structured error
/// reporting.
///
/// Nothing is retried. The only pause between requests is the configured
/// rate-limit delay, which is not error driven.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The API rejected the credentials (HTTP 401 or 403).
    Unauthorized {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The API rejected the request as invalid (HTTP 400).
    BadRequest {
        /// Provider that produced the error.
        provider: String,
        /// Validation messages reported by the API.
        messages: Vec<String>,
    },

    /// The requested domain or resource does not exist (HTTP 404).
    NotFound {
        /// Provider that produced the error.
        provider: String,
        /// Domain name or request path that was not found.
        resource: String,
    },

    /// Any other non-success HTTP status.
    Http {
        /// Provider that produced the error.
        provider: String,
        /// HTTP status code.
        status: u16,
        /// Response body as returned by the API.
        body: String,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// A configuration or request parameter is invalid.
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// A record read from the API, or repaired locally, failed validation.
    InvalidRecord {
        /// Provider that produced the error.
        provider: String,
        /// Validation failure details.
        detail: String,
    },

    /// The desired zone uses something the provider cannot express and
    /// strict supports handling is enabled.
    SupportsViolation {
        /// Provider that produced the error.
        provider: String,
        /// What is not supported.
        message: String,
    },
}

impl ProviderError {
    /// Whether the error is an expected outcome (bad input, missing resource) rather than a fault.
    ///
    /// `true` logs at `warn`, `false` at `error`.
    /// **Update this when adding a variant.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. }
                | Self::BadRequest { .. }
                | Self::NotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::InvalidRecord { .. }
                | Self::SupportsViolation { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::Unauthorized {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Unauthorized: {msg}")
                } else {
                    write!(f, "[{provider}] Unauthorized")
                }
            }
            Self::BadRequest { provider, messages } => {
                if messages.is_empty() {
                    write!(f, "[{provider}] Bad request")
                } else {
                    write!(f, "[{provider}] Bad request: {}", messages.join("; "))
                }
            }
            Self::NotFound { provider, resource } => {
                write!(f, "[{provider}] Not found: {resource}")
            }
            Self::Http {
                provider,
                status,
                body,
            } => {
                write!(f, "[{provider}] HTTP {status}: {body}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::InvalidRecord { provider, detail } => {
                write!(f, "[{provider}] {detail}")
            }
            Self::SupportsViolation { provider, message } => {
                write!(f, "[{provider}] {message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
