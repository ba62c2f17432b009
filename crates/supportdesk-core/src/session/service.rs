//! Chat service orchestrating one conversation turn.
//!
//! ChatService validates the request, reads the prior history, persists
//! the user turn, resolves a reply, persists the assistant turn, and
//! returns the reply with its escalation flag.

use tracing::info;

use supportdesk_types::error::ChatError;
use supportdesk_types::turn::{SessionSummary, Turn};

use crate::resolver::ReplyResolver;
use crate::session::repository::TurnRepository;

/// Result of handling one user message.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub response: String,
    pub escalated: bool,
}

/// Orchestrates turn persistence and reply resolution.
///
/// Generic over `TurnRepository` to maintain clean architecture
/// (supportdesk-core never depends on supportdesk-infra).
pub struct ChatService<R: TurnRepository> {
    repo: R,
    resolver: ReplyResolver,
}

impl<R: TurnRepository> ChatService<R> {
    pub fn new(repo: R, resolver: ReplyResolver) -> Self {
        Self { repo, resolver }
    }

    /// Access the turn repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Handle one user message for a session.
    ///
    /// The user turn is persisted before resolution, so a failed completion
    /// call still leaves the query on record. Escalated hand-off replies
    /// are persisted as assistant turns like any other reply.
    pub async fn handle_message(
        &self,
        session_id: &str,
        query: &str,
    ) -> Result<ChatOutcome, ChatError> {
        if session_id.trim().is_empty() {
            return Err(ChatError::Validation(
                "session_id must not be empty".to_string(),
            ));
        }
        if query.trim().is_empty() {
            return Err(ChatError::Validation("query must not be empty".to_string()));
        }

        let history = self.repo.read(session_id).await?;

        self.repo.append(session_id, &Turn::user(query)).await?;

        let resolution = self.resolver.resolve(query, &history).await?;

        self.repo
            .append(session_id, &Turn::assistant(&resolution.text))
            .await?;

        info!(
            session_id,
            escalated = resolution.escalate,
            prior_turns = history.len(),
            "chat turn resolved"
        );

        Ok(ChatOutcome {
            response: resolution.text,
            escalated: resolution.escalate,
        })
    }

    /// Full turn sequence for a session; empty for unknown ids.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Turn>, ChatError> {
        if session_id.trim().is_empty() {
            return Err(ChatError::Validation(
                "session_id must not be empty".to_string(),
            ));
        }
        Ok(self.repo.read(session_id).await?)
    }

    /// Known sessions, most recently active first.
    pub async fn sessions(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<SessionSummary>, ChatError> {
        Ok(self.repo.list_sessions(limit, offset).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use supportdesk_types::config::ResolverConfig;
    use supportdesk_types::error::PersistenceError;
    use supportdesk_types::llm::{
        CompletionError, CompletionRequest, CompletionResponse, Usage,
    };
    use supportdesk_types::turn::TurnRole;

    use crate::llm::{BoxCompletionProvider, CompletionProvider};
    use crate::resolver::CompletionOptions;

    /// Minimal in-memory TurnRepository for exercising the service flow.
    #[derive(Default)]
    struct MemoryRepository {
        sessions: Mutex<HashMap<String, Vec<Turn>>>,
    }

    impl TurnRepository for MemoryRepository {
        async fn append(&self, session_id: &str, turn: &Turn) -> Result<(), PersistenceError> {
            self.sessions
                .lock()
                .unwrap()
                .entry(session_id.to_string())
                .or_default()
                .push(turn.clone());
            Ok(())
        }

        async fn read(&self, session_id: &str) -> Result<Vec<Turn>, PersistenceError> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .get(session_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn list_sessions(
            &self,
            _limit: Option<i64>,
            _offset: Option<i64>,
        ) -> Result<Vec<SessionSummary>, PersistenceError> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .map(|(id, turns)| SessionSummary {
                    session_id: id.clone(),
                    turn_count: turns.len() as u64,
                    last_activity: turns.last().and_then(|t| t.created_at),
                })
                .collect())
        }

        async fn count_sessions(&self) -> Result<u64, PersistenceError> {
            Ok(self.sessions.lock().unwrap().len() as u64)
        }

        async fn count_turns(&self) -> Result<u64, PersistenceError> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .values()
                .map(|v| v.len() as u64)
                .sum())
        }
    }

    /// Provider that always replies with the same text, or always fails.
    struct FixedProvider {
        outcome: Result<String, String>,
    }

    impl CompletionProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            match &self.outcome {
                Ok(text) => Ok(CompletionResponse {
                    id: "fixed-1".to_string(),
                    content: text.clone(),
                    model: request.model.clone(),
                    usage: Usage::default(),
                }),
                Err(message) => Err(CompletionError::Provider {
                    message: message.clone(),
                }),
            }
        }
    }

    fn service_with(outcome: Result<&str, &str>) -> ChatService<MemoryRepository> {
        let resolver = ReplyResolver::new(
            ResolverConfig::default(),
            CompletionOptions {
                model: "test-model".to_string(),
                temperature: 0.5,
                max_tokens: 256,
                timeout: Duration::from_secs(5),
            },
            BoxCompletionProvider::new(FixedProvider {
                outcome: outcome.map(String::from).map_err(String::from),
            }),
        );
        ChatService::new(MemoryRepository::default(), resolver)
    }

    #[tokio::test]
    async fn turn_sequence_read_back_in_append_order() {
        let service = service_with(Ok("Sure, I can help with that."));

        for i in 0..3 {
            service
                .handle_message("s-1", &format!("question {i}"))
                .await
                .unwrap();
        }

        let history = service.history("s-1").await.unwrap();
        assert_eq!(history.len(), 6);
        for (i, pair) in history.chunks(2).enumerate() {
            assert_eq!(pair[0].role, TurnRole::User);
            assert_eq!(pair[0].content, format!("question {i}"));
            assert_eq!(pair[1].role, TurnRole::Assistant);
        }
    }

    #[tokio::test]
    async fn unknown_session_reads_empty() {
        let service = service_with(Ok("unused"));
        let history = service.history("never-seen").await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn repeated_reads_are_idempotent() {
        let service = service_with(Ok("Answer."));
        service.handle_message("s-2", "hello").await.unwrap();

        let first = service.history("s-2").await.unwrap();
        let second = service.history("s-2").await.unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.role, b.role);
            assert_eq!(a.content, b.content);
        }
    }

    #[tokio::test]
    async fn empty_session_id_is_rejected() {
        let service = service_with(Ok("unused"));
        let err = service.handle_message("  ", "hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let service = service_with(Ok("unused"));
        let err = service.handle_message("s-3", "").await.unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
        // Nothing was persisted for the rejected request
        assert!(service.history("s-3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn escalation_flag_surfaces_in_outcome() {
        let service = service_with(Ok("unused"));
        let outcome = service
            .handle_message("s-4", "let me talk to a manager")
            .await
            .unwrap();
        assert!(outcome.escalated);

        // The hand-off reply is persisted as the assistant turn
        let history = service.history("s-4").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, TurnRole::Assistant);
        assert_eq!(history[1].content, outcome.response);
    }

    #[tokio::test]
    async fn completion_failure_propagates_but_user_turn_persists() {
        let service = service_with(Err("provider down"));
        let err = service
            .handle_message("s-5", "something off-script")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Completion(_)));

        let history = service.history("s-5").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, TurnRole::User);
    }

    #[tokio::test]
    async fn sessions_listing_counts_turns() {
        let service = service_with(Ok("Answer."));
        service.handle_message("s-6", "one").await.unwrap();
        service.handle_message("s-6", "two").await.unwrap();
        service.handle_message("s-7", "three").await.unwrap();

        let sessions = service.sessions(None, None).await.unwrap();
        assert_eq!(sessions.len(), 2);
        let s6 = sessions.iter().find(|s| s.session_id == "s-6").unwrap();
        assert_eq!(s6.turn_count, 4);
    }
}
