//! JSON bodies returned by the endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Successful `POST /summarize` response
#[derive(Debug, Serialize, ToSchema)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Successful `POST /send-email` response
#[derive(Debug, Serialize, ToSchema)]
pub struct EmailSentResponse {
    pub ok: bool,
}

/// Body of every non-2xx response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
