use crate::emails::{Mailer, OutgoingEmail, SendReceipt};
use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use async_trait::async_trait;
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::time::Duration;

/// Resend API client for sending transactional emails
pub struct ResendClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: Option<reqwest::header::HeaderValue>,
}

/// Request payload for sending an email via Resend
#[derive(Debug, Serialize)]
pub struct SendEmailRequest<'a> {
    pub from: &'a str,
    pub to: Vec<&'a str>,
    pub subject: &'a str,
    pub text: &'a str,
}

/// Response from Resend API
#[derive(Debug, Deserialize)]
pub struct SendEmailResponse {
    pub id: Option<String>,
}

/// Error body returned by Resend, e.g. `{"statusCode": 422, "name": "validation_error", "message": "..."}`
#[derive(Debug, Deserialize)]
struct ResendErrorBody {
    message: Option<String>,
    name: Option<String>,
}

impl ResendClient {
    /// Create a new Resend client from configuration.
    ///
    /// The API key may be absent; `send` then fails with a configuration error.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let auth_header = match config.resend_api_key() {
            Some(api_key) => Some(build_auth_header(api_key)?),
            None => None,
        };

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.resend_base_url().trim_end_matches('/').to_string(),
            auth_header,
        })
    }
}

#[async_trait]
impl Mailer for ResendClient {
    /// Send an email using the Resend API
    async fn send(&self, email: OutgoingEmail) -> Result<SendReceipt, Error> {
        let auth_header = self.auth_header.clone().ok_or_else(|| {
            warn!("Failed to get Resend API key from config");
            Error::config("RESEND_API_KEY not configured")
        })?;

        let url = format!("{}/emails", self.base_url);
        let request = SendEmailRequest {
            from: &email.from,
            to: vec![email.to.as_str()],
            subject: &email.subject,
            text: &email.text,
        };

        debug!("Email subject: {}", request.subject);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth_header)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to send email request: {e:?}");
                Error::from(e)
            })?;

        let status = response.status();
        if status.is_success() {
            let body: SendEmailResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Resend response: {e:?}");
                Error {
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Resend".to_string(),
                    )),
                    source: Some(Box::new(e)),
                }
            })?;

            info!("Email sent successfully, message_id: {:?}", body.id);

            Ok(SendReceipt {
                message_id: body.id,
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Failed to send email: {} - {}", status, error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Provider(
                    provider_message(&error_text),
                )),
            })
        }
    }

    fn provider_id(&self) -> &'static str {
        "resend"
    }
}

/// Build the bearer authorization header for the Resend API
fn build_auth_header(api_key: &str) -> Result<reqwest::header::HeaderValue, Error> {
    let auth_value = format!("Bearer {}", api_key);
    let mut auth_header = reqwest::header::HeaderValue::from_str(&auth_value).map_err(|err| {
        warn!("Failed to create authorization header value: {err:?}");
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config(
                "Invalid Resend API key format".to_string(),
            )),
        }
    })?;
    auth_header.set_sensitive(true);
    Ok(auth_header)
}

/// Extracts Resend's message from an error body, falling back to the raw text.
/// An empty result lets the caller substitute its own fallback.
fn provider_message(error_text: &str) -> String {
    match serde_json::from_str::<ResendErrorBody>(error_text) {
        Ok(ResendErrorBody {
            message: Some(message),
            ..
        }) if !message.trim().is_empty() => message,
        Ok(ResendErrorBody {
            name: Some(name), ..
        }) => name,
        _ => error_text.trim().to_string(),
    }
}
