//! Presence handling.
//!
//! Presence events toggle the online flag of the matching session and,
//! depending on configuration, tear down cryptographic state when a contact
//! disappears. Sessions survive offline periods; only account teardown
//! destroys them.

use log::{debug, info, warn};

use crate::coordinator::Coordinator;
use crate::error::OtrError;
use crate::types::{ConversationKey, MessageState, PresenceEvent};

impl Coordinator {
    /// Process a presence notification for one contact.
    pub async fn handle_presence(
        &self,
        key: &ConversationKey,
        event: PresenceEvent,
    ) -> Result<(), OtrError> {
        match event {
            PresenceEvent::Available => self.presence_available(key).await,
            PresenceEvent::Unavailable => self.presence_unavailable(key).await,
        }
    }

    async fn presence_available(&self, key: &ConversationKey) -> Result<(), OtrError> {
        let session = self.registry.get_or_create(key).await;
        session.write().await.set_online(true);
        debug!("[presence_available]: {key} is online");
        Ok(())
    }

    /// A contact went offline.
    ///
    /// A second unavailable notification for the same contact is a no-op,
    /// which keeps the expire call (and the resulting status line) from
    /// firing twice. With `end_when_offline` set, the engine session is
    /// expired silently; a still-plaintext session has no cryptographic
    /// state to drop and is skipped.
    async fn presence_unavailable(&self, key: &ConversationKey) -> Result<(), OtrError> {
        let Some(session) = self.registry.find(key).await else {
            debug!("[presence_unavailable]: Dropping event for unknown {key}");
            return Ok(());
        };

        let mut session = session.write().await;
        if !session.is_online() {
            debug!("[presence_unavailable]: {key} already offline");
            return Ok(());
        }
        session.set_online(false);

        if self.config.read().await.end_when_offline
            && self.engine.message_state(key) != MessageState::Plaintext
        {
            info!("[presence_unavailable]: Expiring session for {key}");
            self.engine.expire_session(key)?;
        }
        session.refresh(self.engine.message_state(key), self.engine.is_verified(key));
        Ok(())
    }

    /// The whole account stream closed.
    ///
    /// Every session under the account gets a full protocol teardown (the
    /// peer is notified, unlike expiry) and is marked offline. An engine
    /// failure for one contact is logged and must not keep the remaining
    /// sessions from being torn down. The records themselves stay in the
    /// registry so state survives a reconnect.
    pub async fn handle_stream_closed(&self, account: &str) -> Result<(), OtrError> {
        info!("[handle_stream_closed]: Tearing down sessions for account {account}");
        for (key, session) in self.registry.sessions_for_account(account).await {
            if let Err(err) = self.engine.end_session(&key) {
                warn!("[handle_stream_closed]: Failed to end session for {key}: {err}");
            }
            let mut session = session.write().await;
            session.set_online(false);
            session.refresh(
                self.engine.message_state(&key),
                self.engine.is_verified(&key),
            );
        }
        Ok(())
    }
}
