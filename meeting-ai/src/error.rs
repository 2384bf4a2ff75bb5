//! Error types for language-model operations.

use std::fmt;

/// Universal error type that abstracts provider-specific errors into common variants.
///
/// Every provider implementation maps its native failures to these variants,
/// keeping the provider's own message so that it can be shown to the caller.
#[derive(Debug)]
pub enum Error {
    /// API key rejected, expired, or missing the required scope.
    Authentication(String),

    /// Connection, DNS, or TLS failure before a response was received.
    Network(String),

    /// The provider client is missing a credential or was built with invalid settings.
    Configuration(String),

    /// The provider answered with an error (bad request, model unavailable, quota).
    Provider(String),

    /// The call exceeded the configured timeout.
    Timeout(String),

    /// Provider rate limit exceeded.
    RateLimited(String),

    /// The provider answered successfully but the body could not be decoded.
    Deserialization(String),

    /// Catch-all for errors that don't fit other categories.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// The provider-facing message without the category prefix.
    ///
    /// This is what gets surfaced to end users; `Display` adds the category for logs.
    pub fn message(&self) -> String {
        match self {
            Error::Authentication(msg)
            | Error::Network(msg)
            | Error::Configuration(msg)
            | Error::Provider(msg)
            | Error::Timeout(msg)
            | Error::RateLimited(msg)
            | Error::Deserialization(msg) => msg.clone(),
            Error::Other(err) => err.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            Error::Network(msg) => write!(f, "Network error: {}", msg),
            Error::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Provider(msg) => write!(f, "Provider error: {}", msg),
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Error::Other(err) => write!(f, "Other error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
