// Composition tests — driving the real router with substitute clients.
//
// These tests exercise the full request path (auth middleware, batch
// validation, pipeline, aggregation, response shape) in-process via
// tower::ServiceExt::oneshot. The Reddit and chat-backend seams are
// replaced with stubs that count their calls, so the "no external calls
// on rejection" properties are observable.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use cinder::config::Config;
use cinder::insight::registry::{BackendKind, BackendRegistry};
use cinder::insight::traits::ChatBackend;
use cinder::reddit::posts::Post;
use cinder::reddit::traits::PostSource;
use cinder::web::{build_router, AppState};

const TEST_TOKEN: i64 = 4321;

// ============================================================
// Stubs
// ============================================================

fn canned_post(title: &str, text: &str, score: Value) -> Post {
    Post {
        title: title.to_string(),
        url: format!("https://example.com/{title}"),
        score,
        text: text.to_string(),
        comments: 1,
        sentiment: None,
        keywords: None,
    }
}

/// Post source returning a fixed batch and counting every call.
#[derive(Default)]
struct StubSource {
    hot_calls: AtomicUsize,
    search_calls: AtomicUsize,
}

#[async_trait]
impl PostSource for StubSource {
    async fn fetch_hot(&self, n: u32) -> Result<Vec<Post>> {
        self.hot_calls.fetch_add(1, Ordering::SeqCst);
        Ok(canned_batch().into_iter().take(n as usize).collect())
    }

    async fn search(&self, _query: &str, n: u32) -> Result<Vec<Post>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(canned_batch().into_iter().take(n as usize).collect())
    }
}

fn canned_batch() -> Vec<Post> {
    vec![
        canned_post("alpha", "a great launch all around", json!("5")),
        canned_post("beta", "an awful outage report", json!(3)),
        canned_post("gamma", "a routine maintenance note", json!(2)),
    ]
}

/// Post source whose calls always fail, for upstream-error propagation.
struct FailingSource;

#[async_trait]
impl PostSource for FailingSource {
    async fn fetch_hot(&self, _n: u32) -> Result<Vec<Post>> {
        anyhow::bail!("content API returned 503")
    }

    async fn search(&self, _query: &str, _n: u32) -> Result<Vec<Post>> {
        anyhow::bail!("content API returned 503")
    }
}

/// Chat backend with deterministic replies keyed off the prompt, plus a
/// call counter and a tag so routing across backends is observable.
#[derive(Debug)]
struct StubBackend {
    tag: &'static str,
    calls: AtomicUsize,
}

impl StubBackend {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ChatBackend for StubBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.starts_with("Classify the sentiment") {
            if prompt.contains("great") {
                Ok("Positive".to_string())
            } else if prompt.contains("awful") {
                Ok("Negative".to_string())
            } else {
                Ok("Neutral".to_string())
            }
        } else if prompt.starts_with("Extract the main keywords") {
            // Echo the embedded post title as the keyword string.
            let title = prompt
                .split("<text>")
                .last()
                .and_then(|rest| rest.split('\n').next())
                .unwrap_or("");
            Ok(title.to_string())
        } else {
            Ok(format!("summary from {}", self.tag))
        }
    }
}

// ============================================================
// Harness
// ============================================================

fn test_config() -> Config {
    Config {
        reddit_client_id: String::new(),
        reddit_client_secret: String::new(),
        reddit_username: String::new(),
        reddit_password: String::new(),
        reddit_user_agent: "cinder-tests".to_string(),
        openai_api_key: String::new(),
        groq_api_key: String::new(),
        api_token: TEST_TOKEN,
        default_backend: BackendKind::O1Mini,
    }
}

struct Harness {
    state: AppState,
    source: Arc<StubSource>,
    default_backend: Arc<StubBackend>,
    alt_backend: Arc<StubBackend>,
}

/// Build an AppState with stub seams. The default backend is registered
/// for o1-mini; a second tagged stub sits behind llama-3.1-8b-instant.
fn harness() -> Harness {
    let source = Arc::new(StubSource::default());
    let default_backend = Arc::new(StubBackend::new("o1"));
    let alt_backend = Arc::new(StubBackend::new("llama"));

    let mut registry = BackendRegistry::new();
    registry.register(BackendKind::O1Mini, default_backend.clone());
    registry.register(BackendKind::Llama8bInstant, alt_backend.clone());

    let state = AppState::new(test_config(), source.clone(), registry);
    Harness {
        state,
        source,
        default_backend,
        alt_backend,
    }
}

async fn send(state: AppState, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = build_router(state)
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// ============================================================
// Auth gate
// ============================================================

#[tokio::test]
async fn missing_token_is_unauthorized_with_no_downstream_calls() {
    let h = harness();
    let (status, body) = send(
        h.state.clone(),
        "POST",
        "/reddit/get_sentiment/v1?text=rust&n_posts=5",
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid token" }));
    assert_eq!(h.source.search_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.default_backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
    let h = harness();
    let (status, _) = send(
        h.state.clone(),
        "POST",
        "/reddit/get_hot_news/v1?n_posts=5&api_token=9999",
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(h.source.hot_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn health_needs_no_token() {
    let h = harness();
    let (status, body) = send(h.state, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ============================================================
// Batch-size validation
// ============================================================

#[tokio::test]
async fn sentiment_over_bound_is_rejected_before_any_call() {
    let h = harness();
    let (status, body) = send(
        h.state.clone(),
        "POST",
        &format!("/reddit/get_sentiment/v1?text=rust&n_posts=21&api_token={TEST_TOKEN}"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "The requested number of posts is too large." })
    );
    assert_eq!(h.source.search_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.default_backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn sentiment_at_bound_proceeds() {
    let h = harness();
    let (status, _) = send(
        h.state.clone(),
        "POST",
        &format!("/reddit/get_sentiment/v1?text=rust&n_posts=20&api_token={TEST_TOKEN}"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.source.search_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn hot_news_over_bound_is_rejected_before_any_call() {
    let h = harness();
    let (status, _) = send(
        h.state.clone(),
        "POST",
        &format!("/reddit/get_hot_news/v1?n_posts=101&api_token={TEST_TOKEN}"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(h.source.hot_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn hot_news_at_bound_proceeds() {
    let h = harness();
    let (status, _) = send(
        h.state.clone(),
        "POST",
        &format!("/reddit/get_hot_news/v1?n_posts=100&api_token={TEST_TOKEN}"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.source.hot_calls.load(Ordering::SeqCst), 1);
}

// ============================================================
// Pipelines end to end
// ============================================================

#[tokio::test]
async fn sentiment_pipeline_aggregates_the_batch() {
    let h = harness();
    let (status, body) = send(
        h.state.clone(),
        "POST",
        &format!("/reddit/get_sentiment/v1?text=rust&n_posts=5&api_token={TEST_TOKEN}"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "positive": 1,
            "negative": 1,
            "neutral": 1,
            "keywords": ["alpha", "beta", "gamma"],
            "score_total": 10,
        })
    );
    // Two backend calls per post: classify + keywords.
    assert_eq!(h.default_backend.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn hot_news_pipeline_returns_prose_string() {
    let h = harness();
    let (status, body) = send(
        h.state.clone(),
        "POST",
        &format!("/reddit/get_hot_news/v1?n_posts=3&api_token={TEST_TOKEN}"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // The hot-news shape is a bare JSON string, not an aggregate object.
    assert_eq!(body, json!("summary from o1"));
    assert_eq!(h.default_backend.calls.load(Ordering::SeqCst), 1);
}

// ============================================================
// Backend selection (v2)
// ============================================================

#[tokio::test]
async fn v2_backend_param_routes_to_selected_client() {
    let h = harness();
    let (status, body) = send(
        h.state.clone(),
        "POST",
        &format!(
            "/reddit/get_hot_news/v2?n_posts=3&backend=llama-3.1-8b-instant&api_token={TEST_TOKEN}"
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("summary from llama"));
    assert_eq!(h.alt_backend.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.default_backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn v2_without_backend_param_uses_default() {
    let h = harness();
    let (status, body) = send(
        h.state.clone(),
        "POST",
        &format!("/reddit/get_hot_news/v2?n_posts=3&api_token={TEST_TOKEN}"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("summary from o1"));
}

#[tokio::test]
async fn unregistered_backend_is_a_server_error() {
    // The harness registry deliberately omits the Groq 70b model.
    let h = harness();
    let (status, body) = send(
        h.state.clone(),
        "POST",
        &format!(
            "/reddit/get_hot_news/v2?n_posts=3&backend=llama-3.3-70b-versatile&api_token={TEST_TOKEN}"
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("llama-3.3-70b-versatile"));
    assert_eq!(h.source.hot_calls.load(Ordering::SeqCst), 0);
}

// ============================================================
// Upstream failure propagation
// ============================================================

#[tokio::test]
async fn upstream_failure_surfaces_as_server_error() {
    let mut registry = BackendRegistry::new();
    registry.register(BackendKind::O1Mini, Arc::new(StubBackend::new("o1")));
    let state = AppState::new(test_config(), Arc::new(FailingSource), registry);

    let (status, body) = send(
        state,
        "POST",
        &format!("/reddit/get_sentiment/v1?text=rust&n_posts=5&api_token={TEST_TOKEN}"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("503"));
}
