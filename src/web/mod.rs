// Web server — Axum-based JSON API.
//
// Two resource groups under /reddit, versioned in the path, both gated
// by the shared-secret token middleware. /health stays public.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::insight::registry::BackendRegistry;
use crate::reddit::traits::PostSource;

pub mod auth;
pub mod handlers;

/// Shared application state threaded through all Axum handlers.
///
/// Built once at startup and read-only afterwards — the backend
/// registry and post source are never mutated during request handling.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub posts: Arc<dyn PostSource>,
    pub backends: Arc<BackendRegistry>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config, posts: Arc<dyn PostSource>, backends: BackendRegistry) -> Self {
        Self {
            config: Arc::new(config),
            posts,
            backends: Arc::new(backends),
            started_at: Utc::now(),
        }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(state: AppState, port: u16, bind: &str) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Cinder API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the full router. Public so composition tests can drive it
/// in-process with substitute clients.
pub fn build_router(state: AppState) -> Router {
    // Token-gated API routes
    let reddit_api = Router::new()
        .route(
            "/reddit/get_sentiment/v1",
            post(handlers::sentiment::get_sentiment_v1),
        )
        .route(
            "/reddit/get_sentiment/v2",
            post(handlers::sentiment::get_sentiment_v2),
        )
        .route(
            "/reddit/get_hot_news/v1",
            post(handlers::hot_news::get_hot_news_v1),
        )
        .route(
            "/reddit/get_hot_news/v2",
            post(handlers::hot_news::get_hot_news_v2),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .merge(reddit_api)
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Deployment health check — always returns 200 OK.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "status": "ok",
            "started_at": state.started_at.to_rfc3339(),
        })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
