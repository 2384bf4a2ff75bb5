//! Business logic for the meeting summarizer.
//!
//! `web` depends on this crate only. The provider seams it needs are re-exported
//! here so that `web` does not depend on the `meeting-ai` crate directly.
pub use meeting_ai::{
    traits::completion::Provider as CompletionProvider, types::completion,
    Error as CompletionError,
};

pub mod emails;
pub mod error;
pub mod gateway;
pub mod send_guard;
pub mod summary;
