//! Reply resolution pipeline.
//!
//! Given the current query and the session's prior history, produce a
//! reply and an escalation flag. Rules run in a fixed order, first match
//! wins: escalation triggers, then the FAQ table, then the completion
//! fallback.

use std::time::Duration;

use tracing::{debug, warn};

use supportdesk_types::config::ResolverConfig;
use supportdesk_types::llm::{CompletionError, CompletionRequest, Message, MessageRole};
use supportdesk_types::turn::Turn;

use crate::llm::BoxCompletionProvider;

/// Per-request settings for the completion fallback, derived from the
/// provider configuration at construction time.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,
}

/// The outcome of resolving one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub escalate: bool,
}

/// Resolves queries against triggers, the FAQ table, and the completion
/// provider, in that order.
///
/// All rule data comes from the [`ResolverConfig`] passed at construction;
/// nothing is read from ambient state.
pub struct ReplyResolver {
    config: ResolverConfig,
    options: CompletionOptions,
    provider: BoxCompletionProvider,
}

impl ReplyResolver {
    pub fn new(
        config: ResolverConfig,
        options: CompletionOptions,
        provider: BoxCompletionProvider,
    ) -> Self {
        Self {
            config,
            options,
            provider,
        }
    }

    /// Resolve a query against the rule pipeline.
    ///
    /// `history` is the session's turn sequence *before* the current query
    /// was appended; the query itself is added as the final user message of
    /// the completion prompt.
    pub async fn resolve(
        &self,
        query: &str,
        history: &[Turn],
    ) -> Result<Resolution, CompletionError> {
        let lowered = query.to_lowercase();

        if let Some(trigger) = self
            .config
            .triggers
            .iter()
            .find(|t| lowered.contains(&t.to_lowercase()))
        {
            debug!(trigger = %trigger, "escalation trigger matched");
            return Ok(Resolution {
                text: self.config.handoff_message.clone(),
                escalate: true,
            });
        }

        if let Some(entry) = self
            .config
            .faq
            .iter()
            .find(|e| lowered.contains(&e.phrase.to_lowercase()))
        {
            debug!(phrase = %entry.phrase, "faq entry matched");
            return Ok(Resolution {
                text: entry.answer.clone(),
                escalate: false,
            });
        }

        let request = self.build_request(query, history);
        debug!(
            provider = self.provider.name(),
            model = %request.model,
            history_len = history.len(),
            "invoking completion fallback"
        );

        let response = match tokio::time::timeout(
            self.options.timeout,
            self.provider.complete(&request),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                let elapsed_ms = self.options.timeout.as_millis() as u64;
                warn!(elapsed_ms, "completion call timed out");
                return Err(CompletionError::Timeout { elapsed_ms });
            }
        };

        if response.content == self.config.escalation_sentinel {
            debug!("provider signalled escalation");
            return Ok(Resolution {
                text: self.config.handoff_message.clone(),
                escalate: true,
            });
        }

        Ok(Resolution {
            text: response.content,
            escalate: false,
        })
    }

    /// Prompt shape: fixed system instruction, full prior history, then the
    /// new query as the final user message.
    fn build_request(&self, query: &str, history: &[Turn]) -> CompletionRequest {
        let mut messages: Vec<Message> = history
            .iter()
            .map(|turn| Message {
                role: turn.role.into(),
                content: turn.content.clone(),
            })
            .collect();

        messages.push(Message {
            role: MessageRole::User,
            content: query.to_string(),
        });

        CompletionRequest {
            model: self.options.model.clone(),
            messages,
            system: Some(self.config.system_prompt.clone()),
            max_tokens: self.options.max_tokens,
            temperature: Some(self.options.temperature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use supportdesk_types::config::FaqEntry;
    use supportdesk_types::llm::{CompletionResponse, Usage};

    use crate::llm::CompletionProvider;

    /// Replays a queue of canned outcomes.
    struct StubProvider {
        outcomes: Mutex<VecDeque<Result<String, CompletionError>>>,
        delay: Option<Duration>,
    }

    impl StubProvider {
        fn replying(text: &str) -> Self {
            Self {
                outcomes: Mutex::new(VecDeque::from([Ok(text.to_string())])),
                delay: None,
            }
        }

        fn failing(err: CompletionError) -> Self {
            Self {
                outcomes: Mutex::new(VecDeque::from([Err(err)])),
                delay: None,
            }
        }

        fn hanging() -> Self {
            Self {
                outcomes: Mutex::new(VecDeque::new()),
                delay: Some(Duration::from_secs(3600)),
            }
        }
    }

    impl CompletionProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let outcome = self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("fallback reply".to_string()));
            outcome.map(|content| CompletionResponse {
                id: "stub-1".to_string(),
                content,
                model: request.model.clone(),
                usage: Usage::default(),
            })
        }
    }

    fn test_config() -> ResolverConfig {
        ResolverConfig {
            faq: vec![
                FaqEntry {
                    phrase: "reset password".to_string(),
                    answer: "Go to Settings > Security > Reset.".to_string(),
                },
                FaqEntry {
                    phrase: "password".to_string(),
                    answer: "More general password answer.".to_string(),
                },
            ],
            ..ResolverConfig::default()
        }
    }

    fn test_options() -> CompletionOptions {
        CompletionOptions {
            model: "test-model".to_string(),
            temperature: 0.5,
            max_tokens: 256,
            timeout: Duration::from_secs(5),
        }
    }

    fn resolver_with(provider: StubProvider) -> ReplyResolver {
        ReplyResolver::new(
            test_config(),
            test_options(),
            BoxCompletionProvider::new(provider),
        )
    }

    #[tokio::test]
    async fn trigger_check_is_case_insensitive_and_beats_faq() {
        let provider = StubProvider::replying("should never be used");
        let resolver = resolver_with(provider);

        // "manager" is a trigger; the query also mentions "password", which
        // would match the FAQ if triggers did not run first.
        let resolution = resolver
            .resolve("My password is broken, I want to speak to a MANAGER", &[])
            .await
            .unwrap();

        assert!(resolution.escalate);
        assert_eq!(resolution.text, test_config().handoff_message);
    }

    #[tokio::test]
    async fn trigger_match_never_consults_provider() {
        // A provider that would fail proves the short-circuit: resolution
        // still succeeds.
        let resolver = resolver_with(StubProvider::failing(CompletionError::Provider {
            message: "must not be called".to_string(),
        }));

        let resolution = resolver.resolve("get me a human", &[]).await.unwrap();
        assert!(resolution.escalate);
    }

    #[tokio::test]
    async fn faq_first_match_wins_in_table_order() {
        let provider = StubProvider::replying("should never be used");
        let resolver = resolver_with(provider);

        // Matches both "reset password" and "password"; the earlier entry
        // must win.
        let resolution = resolver
            .resolve("How do I RESET PASSWORD on my account?", &[])
            .await
            .unwrap();

        assert!(!resolution.escalate);
        assert_eq!(resolution.text, "Go to Settings > Security > Reset.");
    }

    #[tokio::test]
    async fn faq_later_entry_matches_when_earlier_does_not() {
        let resolver = resolver_with(StubProvider::replying("unused"));

        let resolution = resolver
            .resolve("what is the password policy", &[])
            .await
            .unwrap();

        assert_eq!(resolution.text, "More general password answer.");
    }

    #[tokio::test]
    async fn unmatched_query_returns_provider_text_verbatim() {
        let resolver = resolver_with(StubProvider::replying("You can export data as CSV."));

        let resolution = resolver
            .resolve("Can I export my data?", &[])
            .await
            .unwrap();

        assert!(!resolution.escalate);
        assert_eq!(resolution.text, "You can export data as CSV.");
    }

    #[tokio::test]
    async fn sentinel_output_is_replaced_with_handoff() {
        let config = test_config();
        let resolver = resolver_with(StubProvider::replying(&config.escalation_sentinel));

        let resolution = resolver
            .resolve("Something only an agent can fix", &[])
            .await
            .unwrap();

        assert!(resolution.escalate);
        assert_eq!(resolution.text, config.handoff_message);
    }

    #[tokio::test]
    async fn sentinel_must_match_exactly() {
        let resolver =
            resolver_with(StubProvider::replying("maybe ACTION: ESCALATE_TO_AGENT soon"));

        let resolution = resolver.resolve("Weird edge case", &[]).await.unwrap();

        assert!(!resolution.escalate);
        assert_eq!(resolution.text, "maybe ACTION: ESCALATE_TO_AGENT soon");
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let resolver = resolver_with(StubProvider::failing(CompletionError::Provider {
            message: "boom".to_string(),
        }));

        let err = resolver.resolve("Can I export my data?", &[]).await.unwrap_err();
        assert!(matches!(err, CompletionError::Provider { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_provider_times_out() {
        let resolver = resolver_with(StubProvider::hanging());

        let err = resolver.resolve("Can I export my data?", &[]).await.unwrap_err();
        match err {
            CompletionError::Timeout { elapsed_ms } => assert_eq!(elapsed_ms, 5_000),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn prompt_includes_history_then_query() {
        let resolver = resolver_with(StubProvider::replying("ok"));
        let history = vec![Turn::user("first question"), Turn::assistant("first answer")];

        let request = resolver.build_request("second question", &history);

        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert_eq!(request.messages[0].content, "first question");
        assert_eq!(request.messages[1].role, MessageRole::Assistant);
        assert_eq!(request.messages[2].content, "second question");
        assert!(request.system.is_some());
        assert_eq!(request.model, "test-model");
    }
}
