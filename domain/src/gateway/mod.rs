//! HTTP clients for the external providers the service depends on.

pub mod openai;
pub mod resend;
