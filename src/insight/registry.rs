// Backend registry — explicit selector-to-client mapping.
//
// Built once at startup from Config and threaded through AppState, so
// every call site's backend dependency is explicit and tests can
// register substitute clients. A selector with no registered client is
// a configuration error surfaced at lookup, never a silent fallback.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::Config;

use super::chat::{ChatCompletionsBackend, GROQ_API_URL, OPENAI_API_URL};
use super::traits::ChatBackend;

/// Which chat-completions backend handles a text-insight request.
///
/// Serialized as the provider's exact model identifier — these are the
/// values the `backend` query parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    #[serde(rename = "o1-mini")]
    O1Mini,
    #[serde(rename = "deepseek-r1-distill-llama-70b-specdec")]
    DeepseekR1Distill,
    #[serde(rename = "llama-3.1-8b-instant")]
    Llama8bInstant,
    #[serde(rename = "llama-3.3-70b-versatile")]
    Llama70bVersatile,
}

impl BackendKind {
    /// The provider-side model identifier.
    pub fn model_id(self) -> &'static str {
        match self {
            BackendKind::O1Mini => "o1-mini",
            BackendKind::DeepseekR1Distill => "deepseek-r1-distill-llama-70b-specdec",
            BackendKind::Llama8bInstant => "llama-3.1-8b-instant",
            BackendKind::Llama70bVersatile => "llama-3.3-70b-versatile",
        }
    }

    /// All selector values the public enum accepts.
    pub const ALL: [BackendKind; 4] = [
        BackendKind::O1Mini,
        BackendKind::DeepseekR1Distill,
        BackendKind::Llama8bInstant,
        BackendKind::Llama70bVersatile,
    ];
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::O1Mini
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_id())
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.model_id() == raw)
            .ok_or_else(|| anyhow::anyhow!("Unknown backend: {raw}"))
    }
}

/// Read-only mapping from selector to a pre-constructed client.
pub struct BackendRegistry {
    clients: HashMap<BackendKind, Arc<dyn ChatBackend>>,
}

impl BackendRegistry {
    /// Create an empty registry. Production code uses `from_config`;
    /// tests register stub backends directly.
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    /// Register a client for a selector, replacing any previous one.
    pub fn register(&mut self, kind: BackendKind, client: Arc<dyn ChatBackend>) {
        self.clients.insert(kind, client);
    }

    /// Build the full registry from configuration.
    ///
    /// Every public selector gets a client; a missing API key for any of
    /// them fails here, at startup, rather than on the first request.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::new();
        let mut registry = Self::new();

        for kind in BackendKind::ALL {
            config.require_backend_key(kind)?;
            let (base_url, api_key) = match kind {
                BackendKind::O1Mini => (OPENAI_API_URL, config.openai_api_key.clone()),
                _ => (GROQ_API_URL, config.groq_api_key.clone()),
            };
            registry.register(
                kind,
                Arc::new(ChatCompletionsBackend::new(
                    http.clone(),
                    base_url,
                    api_key,
                    kind.model_id(),
                )),
            );
        }

        Ok(registry)
    }

    /// Look up the client for a selector.
    ///
    /// A miss means the registry was built without this backend — a
    /// configuration error, not a request error.
    pub fn get(&self, kind: BackendKind) -> Result<Arc<dyn ChatBackend>> {
        self.clients.get(&kind).cloned().ok_or_else(|| {
            anyhow::anyhow!("No client registered for backend {kind} — check server configuration")
        })
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_strings_round_trip() {
        for kind in BackendKind::ALL {
            let parsed: BackendKind = kind.model_id().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_selector_rejected() {
        assert!("gpt-5".parse::<BackendKind>().is_err());
        assert!("".parse::<BackendKind>().is_err());
    }

    #[test]
    fn serde_uses_model_ids() {
        let json = serde_json::to_string(&BackendKind::Llama8bInstant).unwrap();
        assert_eq!(json, "\"llama-3.1-8b-instant\"");
        let kind: BackendKind =
            serde_json::from_str("\"deepseek-r1-distill-llama-70b-specdec\"").unwrap();
        assert_eq!(kind, BackendKind::DeepseekR1Distill);
    }

    #[test]
    fn default_backend_is_o1_mini() {
        assert_eq!(BackendKind::default(), BackendKind::O1Mini);
    }

    #[test]
    fn empty_registry_lookup_is_config_error() {
        let registry = BackendRegistry::new();
        let err = registry.get(BackendKind::O1Mini).unwrap_err();
        assert!(err.to_string().contains("configuration"));
    }
}
