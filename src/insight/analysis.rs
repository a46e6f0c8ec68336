// Analysis operations — prompts and the per-post enrichment pipeline.
//
// Three single-shot operations against a chat backend: sentiment label,
// keyword string, news summary. The prompts pin the exact labels the
// aggregator counts; the reply is still trusted verbatim.

use std::sync::Arc;

use anyhow::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::info;

use crate::reddit::posts::Post;

use super::traits::ChatBackend;

/// How many posts are classified concurrently. The buffered stream
/// yields results in submission order, so the aggregator's keyword-order
/// invariant holds regardless of arrival order.
const ENRICH_CONCURRENCY: usize = 4;

/// Ask the backend for a sentiment label.
///
/// Returns the reply verbatim — expected to be one of "Positive",
/// "Neutral" or "Negative", but not checked here.
pub async fn classify_sentiment(backend: &dyn ChatBackend, text: &str) -> Result<String> {
    let prompt = format!(
        "Classify the sentiment of the text between the <text> tags as \
         'Positive', 'Neutral' or 'Negative'. Return only one of those \
         options: <text>{text}</text>"
    );
    backend.complete(&prompt).await
}

/// Ask the backend for a single keyword string summarizing the text.
pub async fn extract_keywords(backend: &dyn ChatBackend, text: &str) -> Result<String> {
    let prompt = format!(
        "Extract the main keywords from the text between the <text> tags, \
         very briefly. Return only a single string: <text>{text}</text>"
    );
    backend.complete(&prompt).await
}

/// Ask the backend for a short prose summary of a batch of news posts.
///
/// Posts are joined as "title: text" lines in input order.
pub async fn summarize_news(backend: &dyn ChatBackend, posts: &[Post]) -> Result<String> {
    let text = posts
        .iter()
        .map(|post| format!("{}: {}", post.title, post.text))
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = format!(
        "Interpret the news between the <text> tags and write a summary \
         of a few lines: <text>{text}</text>"
    );
    backend.complete(&prompt).await
}

/// Annotate each post with a sentiment label and a keyword string.
///
/// Posts are processed with a bounded concurrent fan-out; output order
/// matches input order. One failed classification aborts the whole
/// batch — there is no partially-enriched result.
pub async fn enrich_posts(backend: Arc<dyn ChatBackend>, posts: Vec<Post>) -> Result<Vec<Post>> {
    let total = posts.len();

    let enriched: Vec<Post> = stream::iter(posts)
        .map(|post| {
            let backend = Arc::clone(&backend);
            async move {
                let body = format!("{}\n{}", post.title, post.text);
                let sentiment = classify_sentiment(backend.as_ref(), &body).await?;
                let keywords = extract_keywords(backend.as_ref(), &body).await?;
                Ok::<Post, anyhow::Error>(Post {
                    sentiment: Some(sentiment),
                    keywords: Some(keywords),
                    ..post
                })
            }
        })
        .buffered(ENRICH_CONCURRENCY)
        .try_collect()
        .await?;

    info!(count = total, "Enriched posts with sentiment and keywords");
    Ok(enriched)
}
