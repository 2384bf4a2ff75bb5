use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /send-email`
#[derive(Debug, Deserialize, ToSchema)]
pub struct SendEmailParams {
    /// Address the summary is sent to.
    #[schema(example = "bob@example.com")]
    pub recipient: Option<String>,
    /// Plain-text body, sent unmodified.
    pub summary: Option<String>,
}
