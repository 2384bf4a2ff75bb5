//! Language-model abstraction layer for meeting summarization.
//!
//! This crate provides a trait-based seam between application code and
//! chat-completion providers (OpenAI, Azure OpenAI, local OpenAI-compatible
//! servers). Applications build a provider-agnostic [`types::completion::Request`]
//! and receive a [`types::completion::Completion`], so providers can be swapped
//! or mocked without changing handler logic.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::Error;
