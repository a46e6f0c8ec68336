// Post fetching — hot listing and search retrieval, normalized records.
//
// Fetches a single batch per call (no pagination): the hot listing of
// r/news for the news summary pipeline, and a hot-sorted search across
// r/all for the sentiment pipeline.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::client::RedditClient;
use super::traits::PostSource;

/// A normalized post — just the fields the analysis pipeline needs,
/// plus the optional backend-derived annotations.
#[derive(Debug, Clone)]
pub struct Post {
    pub title: String,
    pub url: String,
    /// Raw score value as returned by the API. Carried untouched;
    /// coercion to integer happens during aggregation and is the one
    /// place a malformed score is allowed to fail.
    pub score: Value,
    pub text: String,
    pub comments: u64,
    /// Sentiment label as reported by the backend, verbatim.
    pub sentiment: Option<String>,
    /// Free-text keyword string as reported by the backend.
    pub keywords: Option<String>,
}

/// Fetch up to `n` posts from the hot listing of r/news.
///
/// Order is the API's own ranking — no local re-sort.
pub async fn fetch_hot(client: &RedditClient, n: u32) -> Result<Vec<Post>> {
    let limit = n.to_string();
    let listing: Listing = client
        .api_get("/r/news/hot", &[("limit", limit.as_str())])
        .await
        .context("Failed to fetch hot news listing")?;

    let posts = posts_from_listing(listing);
    info!(count = posts.len(), "Collected hot news posts");
    Ok(posts)
}

/// Fetch up to `n` posts matching `query` across r/all, hot-sorted.
pub async fn search(client: &RedditClient, query: &str, n: u32) -> Result<Vec<Post>> {
    let limit = n.to_string();
    let listing: Listing = client
        .api_get(
            "/r/all/search",
            &[("q", query), ("sort", "hot"), ("limit", limit.as_str())],
        )
        .await
        .with_context(|| format!("Failed to search posts for {query:?}"))?;

    let posts = posts_from_listing(listing);
    info!(count = posts.len(), query = query, "Collected search results");
    Ok(posts)
}

/// Flatten a listing response into normalized posts, preserving the
/// API's ordering.
pub fn posts_from_listing(listing: Listing) -> Vec<Post> {
    let page_size = listing.data.children.len();
    let posts: Vec<Post> = listing
        .data
        .children
        .into_iter()
        .map(|child| {
            let raw = child.data;
            Post {
                title: raw.title,
                url: raw.url,
                score: raw.score,
                text: raw.selftext,
                comments: raw.num_comments,
                sentiment: None,
                keywords: None,
            }
        })
        .collect();

    debug!(page_posts = page_size, "Normalized listing page");
    posts
}

#[async_trait]
impl PostSource for RedditClient {
    async fn fetch_hot(&self, n: u32) -> Result<Vec<Post>> {
        fetch_hot(self, n).await
    }

    async fn search(&self, query: &str, n: u32) -> Result<Vec<Post>> {
        search(self, query, n).await
    }
}

// -- Serde types for listing responses --

/// A listing envelope as returned by /r/{sub}/hot and /r/{sub}/search.
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    pub children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
pub struct ListingChild {
    pub data: RawPost,
}

/// The subset of a post's fields the service consumes. Link posts carry
/// no selftext, so it defaults to empty.
#[derive(Debug, Deserialize)]
pub struct RawPost {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: Value,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub num_comments: u64,
}
