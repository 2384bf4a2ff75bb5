//! Error types for the `domain` layer.
use meeting_ai::Error as MeetingAiError;
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. `web` depends on `domain` but never on the provider crates
/// directly, so every provider failure is translated here. Each leaf kind carries
/// the human-readable message that `web` returns to clients.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Errors raised before any external call is made.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// A required secret or address is missing from configuration.
    Config(String),
    /// Client input is missing, blank, or malformed.
    Validation(String),
    /// An identical operation is already in progress.
    Conflict(String),
    Other(String),
}

/// Errors reported by, or while reaching, an external provider.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network(String),
    Provider(String),
    Other(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::internal(InternalErrorKind::Config(message.into()))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::internal(InternalErrorKind::Validation(message.into()))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::internal(InternalErrorKind::Conflict(message.into()))
    }

    fn internal(kind: InternalErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(kind),
        }
    }

    /// The message carried by the leaf error kind.
    pub fn message(&self) -> &str {
        match &self.error_kind {
            DomainErrorKind::Internal(kind) => match kind {
                InternalErrorKind::Config(msg)
                | InternalErrorKind::Validation(msg)
                | InternalErrorKind::Conflict(msg)
                | InternalErrorKind::Other(msg) => msg,
            },
            DomainErrorKind::External(kind) => match kind {
                ExternalErrorKind::Network(msg)
                | ExternalErrorKind::Provider(msg)
                | ExternalErrorKind::Other(msg) => msg,
            },
        }
    }

    /// Replaces an empty external message with `fallback`.
    ///
    /// Providers occasionally fail without a usable body; the caller still gets
    /// an operation-specific explanation.
    pub fn with_fallback_message(mut self, fallback: &str) -> Self {
        if let DomainErrorKind::External(
            ExternalErrorKind::Network(msg)
            | ExternalErrorKind::Provider(msg)
            | ExternalErrorKind::Other(msg),
        ) = &mut self.error_kind
        {
            if msg.trim().is_empty() {
                *msg = fallback.to_string();
            }
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
                source: Some(Box::new(err)),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network(err.to_string())),
                source: Some(Box::new(err)),
            }
        }
    }
}

// This is where we translate errors from the `meeting-ai` layer to the `domain` layer.
impl From<MeetingAiError> for Error {
    fn from(err: MeetingAiError) -> Self {
        let message = err.message();
        let error_kind = match &err {
            MeetingAiError::Configuration(_) => {
                DomainErrorKind::Internal(InternalErrorKind::Config(message))
            }
            MeetingAiError::Network(_) | MeetingAiError::Timeout(_) => {
                DomainErrorKind::External(ExternalErrorKind::Network(message))
            }
            MeetingAiError::Authentication(_)
            | MeetingAiError::Provider(_)
            | MeetingAiError::RateLimited(_) => {
                DomainErrorKind::External(ExternalErrorKind::Provider(message))
            }
            MeetingAiError::Deserialization(_) | MeetingAiError::Other(_) => {
                DomainErrorKind::External(ExternalErrorKind::Other(message))
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_ai_errors_keep_provider_message() {
        let err: Error =
            MeetingAiError::Authentication("Incorrect API key provided".to_string()).into();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Provider(
                "Incorrect API key provided".to_string()
            ))
        );
        assert_eq!(err.message(), "Incorrect API key provided");
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_timeouts_are_network_errors() {
        let err: Error = MeetingAiError::Timeout("operation timed out".to_string()).into();
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Network(_))
        ));
    }

    #[test]
    fn test_fallback_replaces_only_empty_external_messages() {
        let empty: Error = MeetingAiError::Provider(String::new()).into();
        assert_eq!(
            empty.with_fallback_message("Failed to summarize").message(),
            "Failed to summarize"
        );

        let populated: Error = MeetingAiError::Provider("model overloaded".to_string()).into();
        assert_eq!(
            populated
                .with_fallback_message("Failed to summarize")
                .message(),
            "model overloaded"
        );

        let internal = Error::validation("").with_fallback_message("Failed to summarize");
        assert_eq!(internal.message(), "");
    }
}
