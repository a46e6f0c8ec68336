// Hot news handlers.
//
// POST /reddit/get_hot_news/v1 — n_posts, default backend
// POST /reddit/get_hot_news/v2 — adds an optional backend selector
//
// Pipeline: fetch hot listing -> one summarization call. Returns the
// backend's prose summary as a JSON string — deliberately a different
// shape from the sentiment endpoint's aggregate.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::insight::analysis::summarize_news;
use crate::insight::registry::BackendKind;
use crate::web::{api_error, AppState};

/// Hard cap on posts per hot-news request — a single summarization call
/// regardless of batch size, so the bound is looser than sentiment's.
pub const MAX_HOT_NEWS_POSTS: u32 = 100;

#[derive(Deserialize)]
pub struct HotNewsParams {
    pub n_posts: u32,
    /// Backend selector — honored on v2 only.
    #[serde(default)]
    pub backend: Option<BackendKind>,
}

/// POST /reddit/get_hot_news/v1 — always uses the configured default backend.
pub async fn get_hot_news_v1(
    State(state): State<AppState>,
    Query(params): Query<HotNewsParams>,
) -> Response {
    let backend = state.config.default_backend;
    run_hot_news(state, params, backend).await
}

/// POST /reddit/get_hot_news/v2 — optional per-request backend selector.
pub async fn get_hot_news_v2(
    State(state): State<AppState>,
    Query(params): Query<HotNewsParams>,
) -> Response {
    let backend = params.backend.unwrap_or(state.config.default_backend);
    run_hot_news(state, params, backend).await
}

async fn run_hot_news(state: AppState, params: HotNewsParams, backend: BackendKind) -> Response {
    if params.n_posts > MAX_HOT_NEWS_POSTS {
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
        let posts = state.posts.fetch_hot(params.n_posts).await?;
        summarize_news(client.as_ref(), &posts).await
    }
    .await;

    match result {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Hot news pipeline failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, &format!("{e:#}"))
        }
    }
}
