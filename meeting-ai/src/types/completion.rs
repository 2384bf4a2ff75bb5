//! Types for chat-completion operations.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Provider-agnostic completion request.
///
/// `model` is left to the provider when `None`, so a request built by domain
/// code does not need to know which deployment serves it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Result of a completion call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// Text of the first returned choice. `None` when the provider answered
    /// without any content (for example a refusal or an empty choice list).
    pub text: Option<String>,
    /// Model identifier echoed back by the provider, if any.
    pub model: Option<String>,
}
