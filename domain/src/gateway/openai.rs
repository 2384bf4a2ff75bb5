//! OpenAI chat completions client.
//!
//! Implements the `meeting-ai` completion [`Provider`] over the
//! `/chat/completions` endpoint. One request per call, no streaming, no retries.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use async_trait::async_trait;
use log::*;
use meeting_ai::traits::completion::Provider;
use meeting_ai::types::completion::{Completion, Message, Request};
use meeting_ai::Error as MeetingAiError;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::time::Duration;

const PROVIDER_ID: &str = "openai";

/// Body of a chat completion call
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `{"error": {"message": ..., "type": ..., "code": ...}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// OpenAI API client
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    auth_header: Option<HeaderValue>,
}

impl OpenAiClient {
    /// Create a client from configuration.
    ///
    /// A missing API key is not an error here; `complete` reports it instead, so
    /// the server can start and answer with a configuration error.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let auth_header = match config.openai_api_key() {
            Some(api_key) => Some(bearer_header(api_key)?),
            None => None,
        };

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.openai_base_url().trim_end_matches('/').to_string(),
            model: config.openai_model().to_string(),
            auth_header,
        })
    }
}

#[async_trait]
impl Provider for OpenAiClient {
    async fn complete(&self, request: Request) -> Result<Completion, MeetingAiError> {
        let auth_header = self.auth_header.clone().ok_or_else(|| {
            MeetingAiError::Configuration("OPENAI_API_KEY not configured".to_string())
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        let model = request.model.as_deref().unwrap_or(&self.model);
        let body = ChatCompletionRequest {
            model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(
            "Calling OpenAI chat completions with model {model} ({} messages)",
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth_header)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach OpenAI: {e:?}");
                if e.is_timeout() {
                    MeetingAiError::Timeout(e.to_string())
                } else {
                    MeetingAiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI API: {} - {}", status, error_text);
            return Err(status_error(status, &error_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse OpenAI response: {e:?}");
            MeetingAiError::Deserialization(e.to_string())
        })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);

        Ok(Completion {
            text,
            model: parsed.model,
        })
    }

    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }
}

fn bearer_header(api_key: &str) -> Result<HeaderValue, Error> {
    let mut header = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|err| {
        warn!("Failed to create authorization header value: {err:?}");
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config(
                "Invalid OpenAI API key format".to_string(),
            )),
        }
    })?;
    header.set_sensitive(true);
    Ok(header)
}

/// Maps a non-success response to a provider error, preferring OpenAI's own message.
fn status_error(status: StatusCode, body: &str) -> MeetingAiError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body.to_string()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MeetingAiError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => MeetingAiError::RateLimited(message),
        _ => MeetingAiError::Provider(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExternalErrorKind;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config_for(server_url: &str) -> Config {
        Config::from_defaults()
            .set_openai_api_key(Some("sk-test".to_string()))
            .set_openai_base_url(server_url)
    }

    // Accepts connections and never answers, so only the client timeout ends a request.
    async fn silent_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        url
    }

    async fn closed_port_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        url
    }

    fn request() -> Request {
        Request {
            model: None,
            messages: vec![Message::system("be brief"), Message::user("notes")],
            max_tokens: 700,
            temperature: 0.3,
        }
    }

    #[tokio::test]
    async fn test_complete_posts_chat_request_and_returns_first_choice() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 700,
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "notes"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "chatcmpl-1",
                    "model": "gpt-4o-mini-2024-07-18",
                    "choices": [
                        {"index": 0, "message": {"role": "assistant", "content": "- Ship v2"}},
                        {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
                    ]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = OpenAiClient::new(&config_for(&server.url())).unwrap();
        let completion = client.complete(request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(completion.text.as_deref(), Some("- Ship v2"));
        assert_eq!(completion.model.as_deref(), Some("gpt-4o-mini-2024-07-18"));
    }

    #[tokio::test]
    async fn test_complete_with_no_choices_returns_no_text() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(json!({"choices": []}).to_string())
            .create_async()
            .await;

        let client = OpenAiClient::new(&config_for(&server.url())).unwrap();
        let completion = client.complete(request()).await.unwrap();

        assert_eq!(completion.text, None);
    }

    #[tokio::test]
    async fn test_complete_surfaces_openai_error_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(
                json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = OpenAiClient::new(&config_for(&server.url())).unwrap();
        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(err, MeetingAiError::Authentication(_)));
        assert_eq!(err.message(), "Incorrect API key provided");
    }

    #[tokio::test]
    async fn test_complete_without_api_key_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let config = config_for(&server.url()).set_openai_api_key(None);
        let client = OpenAiClient::new(&config).unwrap();
        let err = client.complete(request()).await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, MeetingAiError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_complete_times_out_against_stalled_server() {
        let mut config = config_for(&silent_server().await);
        config.provider_timeout_secs = 1;
        let client = OpenAiClient::new(&config).unwrap();

        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(err, MeetingAiError::Timeout(_)), "got {err:?}");
        assert!(!err.message().is_empty());
        let domain_err = Error::from(err).with_fallback_message("Failed to summarize");
        assert!(matches!(
            domain_err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_reports_unreachable_server_as_network_error() {
        let client = OpenAiClient::new(&config_for(&closed_port_url().await)).unwrap();

        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(err, MeetingAiError::Network(_)), "got {err:?}");
        assert!(err.message().contains("error sending request"));
    }

    #[test]
    fn test_status_error_falls_back_to_raw_body_then_reason() {
        let err = status_error(StatusCode::BAD_GATEWAY, "upstream exploded");
        assert_eq!(err.message(), "upstream exploded");

        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, MeetingAiError::RateLimited(_)));
        assert_eq!(err.message(), "Too Many Requests");
    }
}
