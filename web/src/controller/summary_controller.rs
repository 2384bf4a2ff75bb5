//! Controller for transcript summarization.

use crate::extractors::json_body::JsonBody;
use crate::params::summary::SummarizeParams;
use crate::response::{ErrorResponse, SummarizeResponse};
use crate::{AppState, Error};

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use domain::summary as SummaryApi;
use log::*;

/// POST /summarize
///
/// Generate a structured summary (decisions, action items, risks, next steps)
/// of a meeting transcript.
#[utoipa::path(
    post,
    path = "/summarize",
    request_body = SummarizeParams,
    responses(
        (status = 200, description = "Summary generated", body = SummarizeResponse),
        (status = 400, description = "Transcript missing or blank, or malformed body", body = ErrorResponse),
        (status = 500, description = "OpenAI API key not configured or provider failure", body = ErrorResponse),
    )
)]
pub async fn summarize(
    State(app_state): State<AppState>,
    body: Result<JsonBody<SummarizeParams>, Error>,
) -> Result<impl IntoResponse, Error> {
    // A missing key is reported whatever the body holds, even when it does not parse.
    SummaryApi::ensure_configured(&app_state.config)?;
    let JsonBody(params) = body?;

    debug!(
        "POST summarize (custom prompt: {})",
        params.prompt.is_some()
    );

    let summary = SummaryApi::summarize(
        &app_state.config,
        app_state.summarizer.as_ref(),
        params.transcript.as_deref(),
        params.prompt.as_deref(),
    )
    .await?;

    Ok(Json(SummarizeResponse { summary }))
}
