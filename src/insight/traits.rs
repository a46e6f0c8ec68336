// Chat backend trait — the swap-ready abstraction.
//
// One method: send a prompt, get the model's text reply. Implementors
// encapsulate transport, serialization, and vendor-specific details;
// consumers stay decoupled from any particular provider.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for single-shot chat-completion calls. Implementations must be
/// async because providers are reached over HTTP.
///
/// Replies are returned verbatim: when a prompt asks for one of a fixed
/// set of labels, the backend's answer is trusted as-is. A reply outside
/// the expected set is not an error here — downstream counting simply
/// won't match it.
#[async_trait]
pub trait ChatBackend: Send + Sync + std::fmt::Debug {
    /// Send a single user prompt and return the assistant's reply text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
