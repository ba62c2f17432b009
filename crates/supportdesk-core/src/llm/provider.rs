//! CompletionProvider trait definition.
//!
//! The abstraction every completion backend implements: role-tagged
//! messages in, one completion string out. Uses native async fn in traits
//! (RPITIT, Rust 2024 edition).
//!
//! Implementations live in supportdesk-infra (e.g., `AnthropicProvider`,
//! `OpenAiCompatibleProvider`, `ScriptedProvider`).

use supportdesk_types::llm::{CompletionError, CompletionRequest, CompletionResponse};

/// Trait for completion provider backends.
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic", "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, CompletionError>> + Send;
}
