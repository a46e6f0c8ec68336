// Batch aggregation — sentiment counts, keyword list, score total.
//
// Counting is an exact string match against the three labels the
// classification prompt asks for. A reply outside that set lands in no
// bucket; the counts can sum to less than the input length. Keywords
// keep input order, one entry per post, no dedup. Scores are coerced to
// integers at this point and nowhere else — a score that won't coerce
// fails the whole aggregation.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::reddit::posts::Post;

pub const LABEL_POSITIVE: &str = "Positive";
pub const LABEL_NEGATIVE: &str = "Negative";
pub const LABEL_NEUTRAL: &str = "Neutral";

/// Aggregated view over a batch of classified posts — the sentiment
/// endpoint's response body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostSummary {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub keywords: Vec<String>,
    pub score_total: i64,
}

/// Summarize a batch of already-classified posts.
///
/// An empty batch yields all-zero counts, an empty keyword list and a
/// zero total.
pub fn summarize_posts(posts: &[Post]) -> Result<PostSummary> {
    let label_count = |label: &str| {
        posts
            .iter()
            .filter(|post| post.sentiment.as_deref() == Some(label))
            .count()
    };

    let keywords = posts
        .iter()
        .map(|post| post.keywords.clone().unwrap_or_default())
        .collect();

    let mut score_total = 0i64;
    for post in posts {
        score_total += coerce_score(&post.score)
            .with_context(|| format!("Malformed score on post {:?}", post.title))?;
    }

    Ok(PostSummary {
        positive: label_count(LABEL_POSITIVE),
        negative: label_count(LABEL_NEGATIVE),
        neutral: label_count(LABEL_NEUTRAL),
        keywords,
        score_total,
    })
}

/// Coerce a raw score value to an integer.
///
/// Integers pass through, floats truncate toward zero, numeric strings
/// parse. Anything else is an error.
fn coerce_score(value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| anyhow::anyhow!("Score out of integer range: {n}")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .with_context(|| format!("Score is not numeric: {s:?}")),
        other => anyhow::bail!("Score is not numeric: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_integer() {
        assert_eq!(coerce_score(&json!(42)).unwrap(), 42);
    }

    #[test]
    fn coerce_negative_integer() {
        assert_eq!(coerce_score(&json!(-7)).unwrap(), -7);
    }

    #[test]
    fn coerce_float_truncates() {
        assert_eq!(coerce_score(&json!(5.9)).unwrap(), 5);
    }

    #[test]
    fn coerce_numeric_string() {
        assert_eq!(coerce_score(&json!("17")).unwrap(), 17);
        assert_eq!(coerce_score(&json!(" 3 ")).unwrap(), 3);
    }

    #[test]
    fn coerce_non_numeric_string_fails() {
        assert!(coerce_score(&json!("lots")).is_err());
    }

    #[test]
    fn coerce_null_and_bool_fail() {
        assert!(coerce_score(&Value::Null).is_err());
        assert!(coerce_score(&json!(true)).is_err());
    }
}
