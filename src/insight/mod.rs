// Text insight — trait-based abstraction over chat-completions backends.
//
// The ChatBackend trait defines the interface. ChatCompletionsBackend
// implements it for the OpenAI-compatible wire format both OpenAI and
// Groq speak. The registry maps selector values to pre-built clients;
// analysis holds the prompts and the per-post enrichment pipeline.

pub mod analysis;
pub mod chat;
pub mod registry;
pub mod traits;
