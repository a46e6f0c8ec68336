// Auth middleware — shared-secret token check on every /reddit route.
//
// The token is a numeric query parameter (`api_token`) compared against
// the configured value. Missing, non-numeric or mismatched tokens get a
// fixed 401 before any downstream call is made.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use super::{api_error, AppState};

/// Axum middleware: reject requests without a valid api_token with 401.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request.uri().query().and_then(token_from_query);

    if provided != Some(state.config.api_token) {
        return api_error(StatusCode::UNAUTHORIZED, "Invalid token");
    }

    next.run(request).await
}

/// Pull the numeric api_token out of a raw query string.
fn token_from_query(query: &str) -> Option<i64> {
    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        if name == "api_token" {
            value.parse().ok()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_extracted_among_other_params() {
        assert_eq!(
            token_from_query("text=rust&n_posts=5&api_token=1234"),
            Some(1234)
        );
    }

    #[test]
    fn missing_token_is_none() {
        assert_eq!(token_from_query("text=rust&n_posts=5"), None);
    }

    #[test]
    fn non_numeric_token_is_none() {
        assert_eq!(token_from_query("api_token=abcd"), None);
        assert_eq!(token_from_query("api_token="), None);
    }

    #[test]
    fn first_token_wins() {
        assert_eq!(token_from_query("api_token=1&api_token=2"), Some(1));
    }
}
