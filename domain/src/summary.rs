//! Meeting summarization: input validation and prompt shaping in front of a
//! chat-completion provider.

use crate::error::Error;
use log::*;
use meeting_ai::traits::completion::Provider;
use meeting_ai::types::completion::{Message, Request};
use service::config::Config;

/// System message establishing tone and structure for every summary.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a concise assistant that produces structured, business-ready meeting summaries.";

/// Instruction used when the caller supplies no custom prompt.
pub const DEFAULT_INSTRUCTION: &str = "Summarize in clear bullet points.";

const OUTPUT_TEMPLATE: &str =
    "Provide:\n- Key decisions\n- Action items (owner, due date)\n- Risks/blocks\n- Next steps";

pub const MISSING_API_KEY: &str = "OPENAI_API_KEY not configured";
pub const TRANSCRIPT_REQUIRED: &str = "Transcript is required";
const FALLBACK_ERROR: &str = "Failed to summarize";

/// Builds the two-message completion request for `transcript`.
///
/// The transcript is wrapped in triple quotes so that instructions embedded in
/// meeting text read as quoted content rather than as part of the prompt.
pub fn build_request(config: &Config, transcript: &str, instruction: Option<&str>) -> Request {
    let instruction = instruction
        .filter(|i| !i.is_empty())
        .unwrap_or(DEFAULT_INSTRUCTION);

    let user_content = format!(
        "{instruction}\n\nTranscript:\n\"\"\"{transcript}\"\"\"\n\n{OUTPUT_TEMPLATE}"
    );

    Request {
        model: None,
        messages: vec![
            Message::system(SYSTEM_INSTRUCTION),
            Message::user(user_content),
        ],
        max_tokens: config.summary_max_tokens,
        temperature: config.summary_temperature,
    }
}

/// Fails with the configuration error when no OpenAI API key is set.
///
/// Callers run this before looking at the request body at all.
pub fn ensure_configured(config: &Config) -> Result<(), Error> {
    if config.openai_api_key().is_none() {
        error!("Summary requested but the OpenAI API key is not configured");
        return Err(Error::config(MISSING_API_KEY));
    }
    Ok(())
}

/// Summarizes a transcript with a single provider call.
///
/// Configuration is checked before input, so a request that is wrong on both
/// counts reports the configuration error. A completion without content yields
/// an empty summary.
pub async fn summarize(
    config: &Config,
    provider: &dyn Provider,
    transcript: Option<&str>,
    instruction: Option<&str>,
) -> Result<String, Error> {
    ensure_configured(config)?;

    let transcript = match transcript {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            debug!("Rejecting summary request with a blank transcript");
            return Err(Error::validation(TRANSCRIPT_REQUIRED));
        }
    };

    let request = build_request(config, transcript, instruction);
    debug!(
        "Requesting summary from {} for a {} character transcript",
        provider.provider_id(),
        transcript.chars().count()
    );

    let completion = provider.complete(request).await.map_err(|err| {
        warn!("{} completion failed: {err}", provider.provider_id());
        Error::from(err).with_fallback_message(FALLBACK_ERROR)
    })?;

    let summary = completion
        .text
        .map(|text| text.trim().to_string())
        .unwrap_or_default();
    info!(
        "Generated summary of {} characters (model: {})",
        summary.chars().count(),
        completion.model.as_deref().unwrap_or("unknown")
    );

    Ok(summary)
}
