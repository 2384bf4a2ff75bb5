use crate::{
    controller::{email_controller, health_check_controller, summary_controller},
    params, response, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Meeting Summarizer API"
        ),
        paths(
            summary_controller::summarize,
            email_controller::send,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                params::summary::SummarizeParams,
                params::email::SendEmailParams,
                response::SummarizeResponse,
                response::EmailSentResponse,
                response::ErrorResponse,
            )
        ),
        tags(
            (name = "meeting_summarizer", description = "Summarize meeting transcripts and email the result")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    let static_dir = app_state.config.static_dir.clone();

    Router::new()
        .merge(summary_routes(app_state.clone()))
        .merge(email_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        // The browser front end is served for every path not matched above.
        .fallback_service(ServeDir::new(static_dir))
}

fn summary_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/summarize", post(summary_controller::summarize))
        .with_state(app_state)
}

fn email_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/send-email", post(email_controller::send))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}
