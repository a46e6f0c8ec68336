// Sentiment search handlers.
//
// POST /reddit/get_sentiment/v1 — text + n_posts, default backend
// POST /reddit/get_sentiment/v2 — adds an optional backend selector
//
// Pipeline: search -> classify + keywords per post -> aggregate.
// The batch bound is checked before any external call; one failed
// classification aborts the whole batch.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::aggregate::summarize_posts;
use crate::insight::analysis::enrich_posts;
use crate::insight::registry::BackendKind;
use crate::web::{api_error, AppState};

/// Hard cap on posts per sentiment request — each one costs two
/// backend calls.
pub const MAX_SENTIMENT_POSTS: u32 = 20;

#[derive(Deserialize)]
pub struct SentimentParams {
    /// Search query text.
    pub text: String,
    pub n_posts: u32,
    /// Backend selector — honored on v2 only.
    #[serde(default)]
    pub backend: Option<BackendKind>,
}

/// POST /reddit/get_sentiment/v1 — always uses the configured default backend.
pub async fn get_sentiment_v1(
    State(state): State<AppState>,
    Query(params): Query<SentimentParams>,
) -> Response {
    let backend = state.config.default_backend;
    run_sentiment(state, params, backend).await
}

/// POST /reddit/get_sentiment/v2 — optional per-request backend selector.
pub async fn get_sentiment_v2(
    State(state): State<AppState>,
    Query(params): Query<SentimentParams>,
) -> Response {
    let backend = params.backend.unwrap_or(state.config.default_backend);
    run_sentiment(state, params, backend).await
}

async fn run_sentiment(state: AppState, params: SentimentParams, backend: BackendKind) -> Response {
    if params.n_posts > MAX_SENTIMENT_POSTS {
        return api_error(
            StatusCode::BAD_REQUEST,
            "The requested number of posts is too large.",
        );
    }

    let client = match state.backends.get(backend) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, backend = %backend, "Backend lookup failed");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, &format!("{e:#}"));
        }
    };

    let result = async {
        let posts = state.posts.search(&params.text, params.n_posts).await?;
        let enriched = enrich_posts(client, posts).await?;
        summarize_posts(&enriched)
    }
    .await;

    match result {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            tracing::error!(error = %e, query = %params.text, "Sentiment pipeline failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, &format!("{e:#}"))
        }
    }
}
