use domain::gateway::{openai::OpenAiClient, resend::ResendClient};
use log::{error, info, warn};
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!(
        "Starting meeting summarizer [{}] with model {}",
        config.runtime_env(),
        config.openai_model()
    );

    // Missing secrets are reported per request, so the server still starts.
    if config.openai_api_key().is_none() {
        warn!("OPENAI_API_KEY is not set; /summarize will answer with a configuration error");
    }
    if config.resend_api_key().is_none() || config.email_from().is_none() {
        warn!("RESEND_API_KEY or EMAIL_FROM is not set; /send-email will answer with a configuration error");
    }

    let summarizer = match OpenAiClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to build OpenAI client: {e}");
            std::process::exit(1);
        }
    };

    let mailer = match ResendClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to build Resend client: {e}");
            std::process::exit(1);
        }
    };

    let app_state = web::AppState::new(config, summarizer, mailer);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server exited with error: {e}");
        std::process::exit(1);
    }
}
