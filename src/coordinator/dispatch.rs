//! Engine-event dispatch.
//!
//! The single place where engine callbacks, registry state and user-visible
//! notification are reconciled. Every callback category lands in
//! [`Coordinator::handle_engine_event`]; the reactions keep the cached
//! session view consistent with the engine before anything is shown to the
//! user.

use log::{debug, info, warn};

use crate::coordinator::Coordinator;
use crate::engine::EngineEvent;
use crate::error::OtrError;
use crate::smp::SmpAttempt;
use crate::types::{ConversationKey, MessageState, StateChange};

impl Coordinator {
    /// Route one engine callback to the registry and the output handlers.
    pub async fn handle_engine_event(&self, event: EngineEvent) -> Result<(), OtrError> {
        match event {
            EngineEvent::StateChanged { key, change } => self.on_state_changed(&key, change).await,
            EngineEvent::SmpRequested { key, question } => {
                self.on_smp_requested(&key, question).await
            }
            EngineEvent::SmpProgress { key, progress } => {
                self.on_smp_progress(&key, progress).await
            }
            EngineEvent::SmpCompleted { key, succeeded } => {
                self.on_smp_completed(&key, succeeded).await
            }
            EngineEvent::DisplayMessage { key, text } => {
                self.display.append_status_event(&key, &text).await
            }
            EngineEvent::LogMessage { account, text } => {
                info!("[engine_log]: account={account} {text}");
                Ok(())
            }
            EngineEvent::PolicyChanged { policy } => {
                self.set_policy(policy).await;
                Ok(())
            }
            EngineEvent::InjectMessage { key, body } => self.send_internal(&key, &body).await,
        }
    }

    /// The engine reported a session state transition.
    async fn on_state_changed(
        &self,
        key: &ConversationKey,
        change: StateChange,
    ) -> Result<(), OtrError> {
        info!("[on_state_changed]: {change} for {key}");

        let session = self.registry.get_or_create(key).await;
        let (encrypted, verified) = {
            let mut session = session.write().await;
            session.refresh(self.engine.message_state(key), self.engine.is_verified(key));
            (session.encrypted(), session.is_verified())
        };

        let text = status_line(change, encrypted, verified, key.contact());
        self.display.append_status_event(key, &text).await
    }

    /// The peer initiated an SMP handshake.
    ///
    /// An unfinished local attempt is force-aborted before the responder
    /// attempt is built, so two handshakes never run against the same
    /// cryptographic session. A request arriving outside an encrypted
    /// session cannot be answered and is aborted outright.
    async fn on_smp_requested(
        &self,
        key: &ConversationKey,
        question: Option<String>,
    ) -> Result<(), OtrError> {
        info!("[on_smp_requested]: SMP request for {key}");
        let session = self.registry.get_or_create(key).await;
        let mut session = session.write().await;

        if self.engine.message_state(key) != MessageState::Encrypted {
            warn!("[on_smp_requested]: Rejecting SMP request outside encrypted session for {key}");
            self.engine.abort_smp(key)?;
            return Ok(());
        }

        if session.has_unfinished_smp() {
            info!("[on_smp_requested]: Aborting unfinished attempt for {key}");
            self.engine.abort_smp(key)?;
            session.clear_smp();
        }

        let attempt = SmpAttempt::respond(question);
        let prompt = attempt.prompt();
        session.install_smp(attempt);
        drop(session);

        self.auth.on_smp_request(key, prompt).await
    }

    /// Numeric progress for the running handshake. A late or duplicate
    /// callback with no matching attempt is dropped.
    async fn on_smp_progress(&self, key: &ConversationKey, progress: i32) -> Result<(), OtrError> {
        let Some(session) = self.registry.find(key).await else {
            debug!("[on_smp_progress]: Dropping progress for unknown {key}");
            return Ok(());
        };
        let mut session = session.write().await;
        match session.smp_mut() {
            Some(attempt) => attempt.update_progress(progress),
            None => debug!("[on_smp_progress]: No attempt for {key}"),
        }
        Ok(())
    }

    /// The engine finished the comparison. The attempt only records the
    /// verdict; trust itself is re-read from the engine, which remains the
    /// authority.
    async fn on_smp_completed(
        &self,
        key: &ConversationKey,
        succeeded: bool,
    ) -> Result<(), OtrError> {
        info!("[on_smp_completed]: SMP finished for {key}, succeeded={succeeded}");
        let Some(session) = self.registry.find(key).await else {
            debug!("[on_smp_completed]: Dropping completion for unknown {key}");
            return Ok(());
        };
        let mut session = session.write().await;
        if let Some(attempt) = session.smp_mut() {
            if attempt.is_active() {
                // Ready attempts cannot finish; only a running handshake
                // can complete.
                if let Err(err) = attempt.finish(succeeded) {
                    debug!("[on_smp_completed]: {err}");
                }
            }
        }
        session.refresh(self.engine.message_state(key), self.engine.is_verified(key));
        Ok(())
    }
}

/// Compose the status line shown to the user for a state change.
fn status_line(change: StateChange, encrypted: bool, verified: bool, contact: &str) -> String {
    match change {
        StateChange::GoingSecure => {
            if encrypted {
                "Attempting to refresh the private conversation".to_string()
            } else {
                "Attempting to start a private conversation".to_string()
            }
        }
        StateChange::GoneSecure => {
            if verified {
                "Private conversation started".to_string()
            } else {
                "Unverified conversation started".to_string()
            }
        }
        StateChange::GoneInsecure => "Private conversation lost".to_string(),
        StateChange::Close => "Private conversation closed".to_string(),
        StateChange::RemoteClose => format!(
            "{contact} has ended the private conversation with you; \
             you should do the same."
        ),
        StateChange::StillSecure => {
            if verified {
                "Private conversation refreshed".to_string()
            } else {
                "Unverified conversation refreshed".to_string()
            }
        }
        StateChange::TrustChanged => {
            if verified {
                "Contact authenticated".to_string()
            } else {
                "Contact not authenticated".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn going_secure_distinguishes_refresh_from_start() {
        assert_eq!(
            status_line(StateChange::GoingSecure, true, false, "bob@example.org"),
            "Attempting to refresh the private conversation"
        );
        assert_eq!(
            status_line(StateChange::GoingSecure, false, false, "bob@example.org"),
            "Attempting to start a private conversation"
        );
    }

    #[test]
    fn gone_secure_reflects_verification() {
        assert_eq!(
            status_line(StateChange::GoneSecure, true, true, "bob@example.org"),
            "Private conversation started"
        );
        assert_eq!(
            status_line(StateChange::GoneSecure, true, false, "bob@example.org"),
            "Unverified conversation started"
        );
    }

    #[test]
    fn remote_close_names_the_contact() {
        assert_eq!(
            status_line(StateChange::RemoteClose, false, false, "bob@example.org"),
            "bob@example.org has ended the private conversation with you; \
             you should do the same."
        );
    }

    #[test]
    fn trust_changed_reports_the_verdict() {
        assert_eq!(
            status_line(StateChange::TrustChanged, true, true, "bob@example.org"),
            "Contact authenticated"
        );
        assert_eq!(
            status_line(StateChange::TrustChanged, true, false, "bob@example.org"),
            "Contact not authenticated"
        );
    }
}
