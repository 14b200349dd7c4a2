//! Registry of conversation sessions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::session::ConversationSession;
use crate::types::ConversationKey;

/// Handle to one session. Each session has its own lock so mutation is
/// serialized per key while cross-contact operations stay independent.
pub type SessionHandle = Arc<RwLock<ConversationSession>>;

/// Maps each (account, contact) pair to its single conversation session.
///
/// Sessions are created lazily on the first observed event for a pair and
/// removed only when the owning account context is torn down. The composite
/// key makes the one-session-per-pair invariant structural.
#[derive(Default, Debug)]
pub struct ConversationRegistry {
    sessions: RwLock<HashMap<ConversationKey, SessionHandle>>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for a pair, creating it on first access.
    pub async fn get_or_create(&self, key: &ConversationKey) -> SessionHandle {
        if let Some(session) = self.sessions.read().await.get(key) {
            return session.clone();
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(key.clone())
            .or_insert_with(|| Arc::new(RwLock::new(ConversationSession::new(key.clone()))))
            .clone()
    }

    /// Look up a session without creating one.
    pub async fn find(&self, key: &ConversationKey) -> Option<SessionHandle> {
        self.sessions.read().await.get(key).cloned()
    }

    /// Remove a single session. Used only on account/context teardown.
    pub async fn remove(&self, key: &ConversationKey) {
        self.sessions.write().await.remove(key);
    }

    /// All sessions belonging to one account.
    pub async fn sessions_for_account(
        &self,
        account: &str,
    ) -> Vec<(ConversationKey, SessionHandle)> {
        self.sessions
            .read()
            .await
            .iter()
            .filter(|(key, _)| key.account() == account)
            .map(|(key, session)| (key.clone(), session.clone()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
