//! This module holds typed parameters for the endpoint inputs.
//!
//! Every field is optional at the type level. A missing field is a validation
//! failure reported by `domain` with the endpoint's own message, not a body
//! parse failure.

pub(crate) mod email;
pub(crate) mod summary;
