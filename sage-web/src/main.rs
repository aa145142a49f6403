use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::{Router, routing::get};
use sage_core::{Assistant, Config};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Conversation id used when the caller doesn't supply one
const DEFAULT_CONVERSATION: &str = "default";

#[derive(Deserialize)]
struct AskParams {
    question: String,
    conversation: Option<String>,
}

async fn ask_handler(
    State(assistant): State<Arc<Assistant>>,
    Query(params): Query<AskParams>,
) -> Result<String, (StatusCode, String)> {
    if params.question.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Question cannot be empty".to_string(),
        ));
    }

    let conversation = params
        .conversation
        .as_deref()
        .unwrap_or(DEFAULT_CONVERSATION);

    assistant
        .ask(conversation, &params.question)
        .await
        .map_err(|e| {
            tracing::error!("Exchange failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            )
        })
}

async fn version_handler() -> Json<serde_json::Value> {
    Json(json!({ "version": VERSION }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize logging; the token-usage lines are emitted at debug level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sage_core=debug".into()),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Starting sage v{}", VERSION);

    let config = Config::from_env()?;
    let addr = config.addr.clone();
    let assistant = Arc::new(Assistant::new(config)?);

    let app = Router::new()
        .route("/assistant/ask", get(ask_handler))
        .route("/api/version", get(version_handler))
        .layer(
            tower::ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(assistant);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}
