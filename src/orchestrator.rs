//! Per-session compression orchestration.
//!
//! The engine itself is pure; this layer wires it to a session after each
//! completed exchange. All mutating operations on a session go through one
//! `tokio` mutex held across the whole usage-decision-swap sequence, so the
//! usage a decision is based on always reflects the exact list it acts upon
//! and a compression run never interleaves with an in-flight append.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::compression::{CompressionResult, compress};
use crate::errors::SessionStoreError;
use crate::session::Session;

/// A session behind its per-session serialization lock.
pub type SharedSession = Arc<Mutex<Session>>;

/// Persistence callback invoked after a successful compression.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn persist(&self, session: &Session) -> Result<(), SessionStoreError>;
}

/// Check a session's usage and compress it if the policy says so.
///
/// Returns `None` only when the session has no compression configured;
/// otherwise always a result, even a no-op one, so callers can surface
/// status. On `compressed: true` the message list is swapped atomically and
/// the stripped result becomes `session.last_compression`.
pub fn check_and_perform_compression(session: &mut Session) -> Option<CompressionResult> {
    let config = session.compression.clone()?;

    let mut result = compress(session.messages(), &config, &session.model);
    if result.compressed {
        if let Some(new_messages) = result.compressed_messages.take() {
            session.swap_messages(new_messages);
        }
        session.last_compression = Some(result.clone());
    } else {
        tracing::debug!(session = %session.id, outcome = %result.message, "compression skipped");
    }

    Some(result)
}

/// Orchestrates compression for shared sessions and persists the outcome.
pub struct CompressionOrchestrator<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> CompressionOrchestrator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the post-exchange compression check for `session`.
    ///
    /// The lock is held across usage computation, the decision, the swap,
    /// and persistence; the store callback is the only suspension point.
    pub async fn run(
        &self,
        session: &SharedSession,
    ) -> Result<Option<CompressionResult>, SessionStoreError> {
        let mut guard = session.lock().await;
        let result = check_and_perform_compression(&mut guard);

        if result.as_ref().is_some_and(|r| r.compressed) {
            self.store.persist(&guard).await?;
            tracing::info!(session = %guard.id, "compressed session persisted");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::{CompressionConfig, CompressionStrategy};
    use crate::message::Message;

    /// Store that records which sessions were persisted.
    #[derive(Default)]
    struct RecordingStore {
        persisted: Mutex<Vec<uuid::Uuid>>,
    }

    #[async_trait]
    impl SessionStore for RecordingStore {
        async fn persist(&self, session: &Session) -> Result<(), SessionStoreError> {
            self.persisted.lock().await.push(session.id);
            Ok(())
        }
    }

    fn chatty_session() -> Session {
        let mut session = Session::new("unknown-model").with_compression(CompressionConfig {
            strategy: CompressionStrategy::SlidingWindow,
            threshold: 50,
            preserve_recent_messages: 4,
            ..Default::default()
        });
        for i in 0..30 {
            session.push(Message::user(format!("q{i}: {}", "x".repeat(1200))));
            session.push(Message::assistant(format!("a{i}: {}", "y".repeat(1200))));
        }
        session
    }

    #[test]
    fn test_returns_none_without_config() {
        let mut session = Session::new("glm-4.7");
        session.push(Message::user("hello"));
        assert!(check_and_perform_compression(&mut session).is_none());
        assert!(session.last_compression.is_none());
    }

    #[test]
    fn test_noop_result_leaves_session_untouched() {
        let mut session =
            Session::new("glm-4.7").with_compression(CompressionConfig::default());
        session.push(Message::user("hello"));
        session.push(Message::assistant("hi"));

        let result = check_and_perform_compression(&mut session).unwrap();
        assert!(!result.compressed);
        assert_eq!(session.message_count(), 2);
        // No-op results are returned but not stored as the rolling status.
        assert!(session.last_compression.is_none());
    }

    #[test]
    fn test_compression_swaps_and_records() {
        let mut session = chatty_session();
        let before = session.message_count();

        let result = check_and_perform_compression(&mut session).unwrap();
        assert!(result.compressed);
        assert!(session.message_count() < before);

        let stored = session.last_compression.as_ref().unwrap();
        assert!(stored.compressed);
        assert!(stored.compressed_messages.is_none());
    }

    #[test]
    fn test_second_run_is_stable() {
        let mut session = chatty_session();
        let first = check_and_perform_compression(&mut session).unwrap();
        assert!(first.compressed);
        let count = session.message_count();

        let second = check_and_perform_compression(&mut session).unwrap();
        assert!(!second.compressed);
        assert_eq!(session.message_count(), count);
    }

    #[tokio::test]
    async fn test_orchestrator_persists_only_on_compression() {
        let orchestrator = CompressionOrchestrator::new(RecordingStore::default());

        let quiet: SharedSession = Arc::new(Mutex::new(
            Session::new("glm-4.7").with_compression(CompressionConfig::default()),
        ));
        let result = orchestrator.run(&quiet).await.unwrap().unwrap();
        assert!(!result.compressed);
        assert!(orchestrator.store.persisted.lock().await.is_empty());

        let busy: SharedSession = Arc::new(Mutex::new(chatty_session()));
        let busy_id = busy.lock().await.id;
        let result = orchestrator.run(&busy).await.unwrap().unwrap();
        assert!(result.compressed);
        assert_eq!(*orchestrator.store.persisted.lock().await, vec![busy_id]);
    }

    #[tokio::test]
    async fn test_appends_serialize_against_compression() {
        let session: SharedSession = Arc::new(Mutex::new(chatty_session()));
        let orchestrator = Arc::new(CompressionOrchestrator::new(RecordingStore::default()));

        let appender = {
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                for i in 0..20 {
                    session.lock().await.push(Message::user(format!("late {i}")));
                }
            })
        };
        let compressor = {
            let session = Arc::clone(&session);
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.run(&session).await.unwrap() })
        };

        appender.await.unwrap();
        let result = compressor.await.unwrap().unwrap();

        // Whatever the interleaving, the decision saw a consistent list and
        // every late append is still present afterwards.
        assert!(result.compressed);
        let guard = session.lock().await;
        let late = guard
            .messages()
            .iter()
            .filter(|m| m.content.starts_with("late "))
            .count();
        assert_eq!(late, 20);
    }
}
