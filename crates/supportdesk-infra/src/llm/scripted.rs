//! Deterministic in-process completion provider.
//!
//! Replays a queue of canned outcomes, then falls back to a fixed reply.
//! Used as the default provider in development (no API key required) and
//! by tests that need to drive the fallback path, including the
//! escalation sentinel.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use supportdesk_core::llm::CompletionProvider;
use supportdesk_types::llm::{CompletionError, CompletionRequest, CompletionResponse, Usage};

/// Completion provider that never leaves the process.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    fallback: String,
    counter: AtomicU64,
}

impl ScriptedProvider {
    /// Reply used once the script queue is exhausted.
    pub const DEFAULT_REPLY: &'static str =
        "Thanks for reaching out. Could you share a few more details so I can help?";

    pub fn new() -> Self {
        Self::with_fallback(Self::DEFAULT_REPLY)
    }

    pub fn with_fallback(fallback: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Queue a canned reply for the next call.
    pub fn push_reply(&self, text: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a failure for the next call.
    pub fn push_error(&self, err: CompletionError) {
        self.script.lock().unwrap().push_back(Err(err));
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()));

        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        outcome.map(|content| CompletionResponse {
            id: format!("scripted-{n}"),
            content,
            model: request.model.clone(),
            usage: Usage::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use supportdesk_types::llm::{Message, MessageRole};

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "scripted-model".to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "hello".to_string(),
            }],
            system: None,
            max_tokens: 128,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_fallback_reply_when_script_empty() {
        let provider = ScriptedProvider::new();
        let response = provider.complete(&request()).await.unwrap();
        assert_eq!(response.content, ScriptedProvider::DEFAULT_REPLY);
        assert_eq!(response.model, "scripted-model");
    }

    #[tokio::test]
    async fn test_scripted_replies_play_in_order() {
        let provider = ScriptedProvider::new();
        provider.push_reply("first");
        provider.push_reply("second");

        assert_eq!(provider.complete(&request()).await.unwrap().content, "first");
        assert_eq!(provider.complete(&request()).await.unwrap().content, "second");
        // Queue drained; back to fallback
        assert_eq!(
            provider.complete(&request()).await.unwrap().content,
            ScriptedProvider::DEFAULT_REPLY
        );
    }

    #[tokio::test]
    async fn test_scripted_error_surfaces() {
        let provider = ScriptedProvider::new();
        provider.push_error(CompletionError::Overloaded("busy".to_string()));

        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Overloaded(_)));
    }

    #[tokio::test]
    async fn test_response_ids_are_unique() {
        let provider = ScriptedProvider::new();
        let a = provider.complete(&request()).await.unwrap();
        let b = provider.complete(&request()).await.unwrap();
        assert_ne!(a.id, b.id);
    }
}
