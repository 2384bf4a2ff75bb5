//! Controller for emailing a finished summary.

use crate::extractors::json_body::JsonBody;
use crate::params::email::SendEmailParams;
use crate::response::{EmailSentResponse, ErrorResponse};
use crate::{AppState, Error};

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use domain::emails as EmailApi;
use log::*;

/// POST /send-email
///
/// Send the summary as a plain-text email to a single recipient.
#[utoipa::path(
    post,
    path = "/send-email",
    request_body = SendEmailParams,
    responses(
        (status = 200, description = "Email accepted by the provider", body = EmailSentResponse),
        (status = 400, description = "Recipient or summary missing or blank, or malformed body", body = ErrorResponse),
        (status = 409, description = "An identical email is already being sent", body = ErrorResponse),
        (status = 500, description = "Resend API key or sender not configured, or provider failure", body = ErrorResponse),
    )
)]
pub async fn send(
    State(app_state): State<AppState>,
    body: Result<JsonBody<SendEmailParams>, Error>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST send-email");

    EmailApi::sender_address(&app_state.config)?;
    let JsonBody(params) = body?;

    EmailApi::send_summary_email(
        &app_state.config,
        app_state.mailer.as_ref(),
        &app_state.in_flight_sends,
        params.recipient.as_deref(),
        params.summary.as_deref(),
    )
    .await?;

    Ok(Json(EmailSentResponse { ok: true }))
}
