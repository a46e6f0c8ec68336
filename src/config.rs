use std::env;

use anyhow::Result;

use crate::insight::registry::BackendKind;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Reddit script-app credentials (password grant).
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_username: String,
    pub reddit_password: String,
    /// User agent sent on every Reddit call — Reddit throttles generic agents.
    pub reddit_user_agent: String,
    /// API key for the OpenAI backend (o1-mini).
    pub openai_api_key: String,
    /// API key for the Groq backends (deepseek / llama models).
    pub groq_api_key: String,
    /// Shared-secret numeric token required on every /reddit route.
    pub api_token: i64,
    /// Backend used when a request doesn't select one (CINDER_BACKEND env var).
    pub default_backend: BackendKind,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only api_token and the default backend have defaults — the Reddit
    /// credentials are required for anything that touches the content API.
    pub fn load() -> Result<Self> {
        let default_backend = env::var("CINDER_BACKEND")
            .ok()
            .and_then(|raw| raw.parse().ok())
            // unset or unrecognized both fall back to o1-mini
            .unwrap_or_default();

        let api_token = env::var("CINDER_API_TOKEN")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(1234);

        Ok(Self {
            reddit_client_id: env::var("REDDIT_CLIENT_ID").unwrap_or_default(),
            reddit_client_secret: env::var("REDDIT_CLIENT_SECRET").unwrap_or_default(),
            reddit_username: env::var("REDDIT_USERNAME").unwrap_or_default(),
            reddit_password: env::var("REDDIT_PASSWORD").unwrap_or_default(),
            reddit_user_agent: env::var("REDDIT_USER_AGENT")
                .unwrap_or_else(|_| "cinder/0.1 (reddit sentiment service)".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
            api_token,
            default_backend,
        })
    }

    /// Check that the Reddit credentials are configured.
    /// Call this before any operation that hits the content API.
    pub fn require_reddit(&self) -> Result<()> {
        if self.reddit_client_id.is_empty()
            || self.reddit_client_secret.is_empty()
            || self.reddit_username.is_empty()
            || self.reddit_password.is_empty()
        {
            anyhow::bail!(
                "Reddit credentials not set. Add REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET,\n\
                 REDDIT_USERNAME and REDDIT_PASSWORD to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Check that the API key backing `kind` is configured.
    pub fn require_backend_key(&self, kind: BackendKind) -> Result<()> {
        let (key, var) = match kind {
            BackendKind::O1Mini => (&self.openai_api_key, "OPENAI_API_KEY"),
            BackendKind::DeepseekR1Distill
            | BackendKind::Llama8bInstant
            | BackendKind::Llama70bVersatile => (&self.groq_api_key, "GROQ_API_KEY"),
        };
        if key.is_empty() {
            anyhow::bail!(
                "{var} not set — required for the {kind} backend.\n\
                 Add it to your .env file. See .env.example for details."
            );
        }
        Ok(())
    }
}
