use axum::http::{header, HeaderValue, Method};
use domain::emails::Mailer;
use domain::send_guard::InFlightSends;
use domain::CompletionProvider;
use log::*;
use service::config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

mod controller;
mod error;
mod extractors;
mod params;
mod response;
pub mod router;

pub use error::Error;

// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub summarizer: Arc<dyn CompletionProvider>,
    pub mailer: Arc<dyn Mailer>,
    pub in_flight_sends: Arc<InFlightSends>,
}

impl AppState {
    pub fn new(
        app_config: Config,
        summarizer: Arc<dyn CompletionProvider>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config: Arc::new(app_config),
            summarizer,
            mailer,
            in_flight_sends: Arc::new(InFlightSends::new()),
        }
    }
}

/// Binds the configured interface and serves until Ctrl-C or SIGTERM.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let server_url = format!("{host}:{}", app_state.config.port);

    let cors_layer = cors_layer(&app_state.config);
    let app = router::define_routes(app_state).layer(cors_layer);

    let listener = TcpListener::bind(&server_url).await?;
    info!("Server listening on http://{server_url}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();
    info!("CORS allowed origins: {:?}", config.allowed_origins);

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining in-flight requests");
}
