use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /summarize`
#[derive(Debug, Deserialize, ToSchema)]
pub struct SummarizeParams {
    /// Raw meeting transcript. Must contain non-whitespace text.
    #[schema(example = "Alice and Bob agreed to ship v2 by Friday.")]
    pub transcript: Option<String>,
    /// Custom instruction placed before the transcript. Defaults to
    /// "Summarize in clear bullet points." when absent or empty.
    pub prompt: Option<String>,
}
