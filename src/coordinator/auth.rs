//! SMP authentication driving.
//!
//! User-triggered side of the handshake: initiating an attempt, answering a
//! peer-initiated one and cancelling. The peer-initiated side arrives
//! through the event dispatcher.

use log::info;

use crate::coordinator::Coordinator;
use crate::engine::SmpSecret;
use crate::error::OtrError;
use crate::smp::{SmpAttempt, SmpPrompt, SmpRole, SmpState};
use crate::types::{ConversationKey, MessageState};

impl Coordinator {
    /// Start authenticating the contact with the given secret material.
    ///
    /// The attempt is created `Ready`, the input validated, and only then
    /// does it go `InProgress` and the engine begin the handshake. An
    /// unfinished previous attempt is aborted first; validation failures
    /// leave the session without an attempt.
    pub async fn begin_authentication(
        &self,
        key: &ConversationKey,
        secret: SmpSecret,
    ) -> Result<(), OtrError> {
        let session = self
            .registry
            .find(key)
            .await
            .ok_or_else(|| OtrError::SessionNotFound(key.to_string()))?;

        if self.engine.message_state(key) != MessageState::Encrypted {
            return Err(OtrError::NotEncrypted);
        }

        let mut session = session.write().await;
        if session.has_unfinished_smp() {
            info!("[begin_authentication]: Aborting unfinished attempt for {key}");
            self.engine.abort_smp(key)?;
            session.clear_smp();
        }

        let mut attempt = SmpAttempt::initiate(secret.method());
        attempt.start(&secret)?;
        self.engine.begin_smp(key, &secret)?;

        info!(
            "[begin_authentication]: Started {} authentication for {key}",
            attempt.method()
        );
        session.install_smp(attempt);
        Ok(())
    }

    /// Answer a peer-initiated handshake.
    pub async fn respond_authentication(
        &self,
        key: &ConversationKey,
        answer: &str,
    ) -> Result<(), OtrError> {
        let session = self
            .registry
            .find(key)
            .await
            .ok_or_else(|| OtrError::SessionNotFound(key.to_string()))?;

        let session = session.read().await;
        let waiting = session.active_smp().is_some_and(|attempt| {
            attempt.role() == SmpRole::Responder && attempt.state() == SmpState::InProgress
        });
        if !waiting {
            return Err(OtrError::NoPendingAuthentication);
        }
        if answer.is_empty() {
            return Err(crate::error::SmpError::EmptySecret.into());
        }

        info!("[respond_authentication]: Answering SMP request for {key}");
        self.engine.respond_smp(key, answer)?;
        Ok(())
    }

    /// Cancel the running attempt.
    ///
    /// Idempotent: cancelling a finished or absent attempt has no
    /// observable effect, the engine is not called. Acceptable from any
    /// external trigger at any time while the handshake runs.
    pub async fn cancel_authentication(&self, key: &ConversationKey) -> Result<(), OtrError> {
        let Some(session) = self.registry.find(key).await else {
            return Ok(());
        };
        let mut session = session.write().await;
        if !session.has_unfinished_smp() {
            return Ok(());
        }

        info!("[cancel_authentication]: Aborting attempt for {key}");
        self.engine.abort_smp(key)?;
        session.clear_smp();
        Ok(())
    }

    /// Prompt data of the live attempt, if one is running.
    pub async fn active_authentication(&self, key: &ConversationKey) -> Option<SmpPrompt> {
        let session = self.registry.find(key).await?;
        let session = session.read().await;
        session.active_smp().map(SmpAttempt::prompt)
    }

    /// Lifecycle state of the current attempt, finished ones included.
    pub async fn authentication_state(&self, key: &ConversationKey) -> Option<SmpState> {
        let session = self.registry.find(key).await?;
        let session = session.read().await;
        session.smp().map(SmpAttempt::state)
    }

    /// Progress percentage of the current attempt, for the UI progress bar.
    pub async fn authentication_progress(&self, key: &ConversationKey) -> Option<u8> {
        let session = self.registry.find(key).await?;
        let session = session.read().await;
        session.smp().map(SmpAttempt::progress)
    }
}
