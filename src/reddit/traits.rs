// Post source trait — the seam between the web layer and the Reddit API.
//
// RedditClient is the only production implementation; tests substitute
// stubs so the request pipeline can run without network access.

use anyhow::Result;
use async_trait::async_trait;

use super::posts::Post;

/// Read-only source of content posts. Implementations must be async
/// because fetching requires HTTP calls.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch up to `n` currently-trending posts from the news listing,
    /// in the API's own ranking order.
    async fn fetch_hot(&self, n: u32) -> Result<Vec<Post>>;

    /// Fetch up to `n` posts matching `query` across all communities,
    /// in the API's hot-ranked relevance order.
    async fn search(&self, query: &str, n: u32) -> Result<Vec<Post>>;
}
