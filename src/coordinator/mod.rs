pub mod auth;
pub mod dispatch;
pub mod messaging;
pub mod presence;

use std::sync::Arc;

use log::info;
use tokio::sync::RwLock;

use crate::config::OtrConfig;
use crate::engine::CryptoEngine;
use crate::error::OtrError;
use crate::events::{AuthenticationHandler, DisplayHandler, Transport};
use crate::registry::ConversationRegistry;
use crate::types::{ConversationKey, MessageState, OtrPolicy};

/// Coordinates the encrypted-messaging overlay for all conversations.
///
/// The coordinator owns the conversation registry and wires four
/// collaborators together: the cryptographic engine, the display surface,
/// the authentication UI and the message transport. Message interception,
/// presence handling, engine-event dispatch and SMP driving each live in
/// their own impl block.
pub struct Coordinator {
    engine: Arc<dyn CryptoEngine>,
    registry: ConversationRegistry,
    display: Arc<dyn DisplayHandler>,
    auth: Arc<dyn AuthenticationHandler>,
    transport: Arc<dyn Transport>,
    config: RwLock<OtrConfig>,
}

impl Coordinator {
    /// Create a coordinator and push the configured policy to the engine.
    pub fn new(
        engine: Arc<dyn CryptoEngine>,
        display: Arc<dyn DisplayHandler>,
        auth: Arc<dyn AuthenticationHandler>,
        transport: Arc<dyn Transport>,
        config: OtrConfig,
    ) -> Self {
        engine.set_policy(config.policy);
        Self {
            engine,
            registry: ConversationRegistry::new(),
            display,
            auth,
            transport,
            config: RwLock::new(config),
        }
    }

    pub fn registry(&self) -> &ConversationRegistry {
        &self.registry
    }

    pub async fn config(&self) -> OtrConfig {
        *self.config.read().await
    }

    pub async fn policy(&self) -> OtrPolicy {
        self.config.read().await.policy
    }

    /// Update the policy and push it to the engine.
    pub async fn set_policy(&self, policy: OtrPolicy) {
        info!("[set_policy]: Switching policy to {policy}");
        self.config.write().await.policy = policy;
        self.engine.set_policy(policy);
    }

    /// Initiate a key exchange with the contact.
    ///
    /// Refused while the policy is below [`OtrPolicy::Enabled`]; teardown
    /// paths are not policy-gated.
    pub async fn start_session(&self, key: &ConversationKey) -> Result<(), OtrError> {
        if self.policy().await < OtrPolicy::Enabled {
            return Err(OtrError::PolicyDisabled);
        }
        info!("[start_session]: Starting session for {key}");
        self.engine.start_session(key)?;
        Ok(())
    }

    /// End the session, notifying the peer.
    pub async fn end_session(&self, key: &ConversationKey) -> Result<(), OtrError> {
        info!("[end_session]: Ending session for {key}");
        self.engine.end_session(key)?;
        if let Some(session) = self.registry.find(key).await {
            let mut session = session.write().await;
            session.refresh(self.engine.message_state(key), self.engine.is_verified(key));
        }
        Ok(())
    }

    pub fn message_state(&self, key: &ConversationKey) -> MessageState {
        self.engine.message_state(key)
    }

    pub fn is_verified(&self, key: &ConversationKey) -> bool {
        self.engine.is_verified(key)
    }

    pub async fn is_online(&self, key: &ConversationKey) -> bool {
        match self.registry.find(key).await {
            Some(session) => session.read().await.is_online(),
            None => false,
        }
    }

    /// Human-readable state of the conversation, qualified with
    /// ", unverified" when encrypted but not authenticated.
    pub fn state_line(&self, key: &ConversationKey) -> String {
        let state = self.engine.message_state(key);
        let mut line = state.to_string();
        if state == MessageState::Encrypted && !self.engine.is_verified(key) {
            line.push_str(", unverified");
        }
        line
    }

    /// Status line describing the current secure session id, if any.
    pub fn session_id_line(&self, key: &ConversationKey) -> String {
        match self.engine.session_id(key) {
            Some(id) => format!(
                "Session ID between account \"{}\" and {}: {}",
                key.account(),
                key.contact(),
                id
            ),
            None => "No active encrypted session".to_string(),
        }
    }

    /// Status line with the account's own key fingerprint.
    pub fn fingerprint_line(&self, key: &ConversationKey) -> String {
        match self.engine.fingerprint(key.account()) {
            Some(fingerprint) => format!(
                "Fingerprint for account \"{}\": {}",
                key.account(),
                fingerprint
            ),
            None => format!("No private key for account \"{}\"", key.account()),
        }
    }
}
