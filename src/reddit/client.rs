// Authenticated Reddit client — OAuth2 password grant over HTTP.
//
// Reddit's data API requires a bearer token even for read-only listings.
// Script apps get one from the password grant: basic auth with the app's
// client id/secret plus the account's username/password. The token is
// acquired per batch call — nothing here depends on token reuse.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;

/// OAuth API endpoint for all listing reads.
pub const OAUTH_API_URL: &str = "https://oauth.reddit.com";

/// Token endpoint for the password grant.
const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Authenticated HTTP client for the Reddit data API.
///
/// A thin reqwest wrapper with a generic GET helper — transport and
/// auth failures surface unchanged to the caller.
pub struct RedditClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
}

impl RedditClient {
    /// Create a new client from the loaded configuration.
    ///
    /// Call `config.require_reddit()` first — empty credentials fail
    /// only when the token request is made.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.reddit_user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            client_id: config.reddit_client_id.clone(),
            client_secret: config.reddit_client_secret.clone(),
            username: config.reddit_username.clone(),
            password: config.reddit_password.clone(),
        })
    }

    /// Obtain a bearer token via the password grant.
    async fn access_token(&self) -> Result<String> {
        let params = [
            ("grant_type", "password"),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ];

        let response = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&params)
            .send()
            .await
            .context("Reddit token request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Reddit token endpoint returned {status}: {body}");
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse Reddit token response")?;

        debug!("Acquired Reddit access token");
        Ok(token.access_token)
    }

    /// Make an authenticated GET request to a data API path and
    /// deserialize the response.
    ///
    /// `path` is relative to the OAuth API root (e.g. "/r/news/hot").
    pub async fn api_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let token = self.access_token().await?;
        let url = format!("{OAUTH_API_URL}{path}");

        debug!(path = path, "Reddit GET request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Reddit request failed: {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Reddit {path} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize {path} response"))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}
