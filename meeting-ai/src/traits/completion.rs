//! Chat-completion provider trait.

use crate::types::completion::{Completion, Request};
use crate::Error;
use async_trait::async_trait;

/// Abstraction for a synchronous (non-streaming) chat-completion call.
///
/// Implementations send the whole [`Request`] in a single round trip and return
/// the first choice the model produced. No retries are attempted at this layer;
/// callers decide how a failure is reported.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Run one completion and return the provider's first choice.
    async fn complete(&self, request: Request) -> Result<Completion, Error>;

    /// Return unique identifier for this provider (e.g., "openai").
    ///
    /// Used in log lines to attribute failures.
    fn provider_id(&self) -> &'static str;
}
