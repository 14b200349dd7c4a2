//! Per-conversation session record.

use crate::smp::SmpAttempt;
use crate::types::{ConversationKey, MessageState};

/// State of one (account, contact) conversation.
///
/// Owned by the [`crate::registry::ConversationRegistry`]; exactly one
/// record exists per pair. The record caches the engine's view of the
/// session so presence handling and status composition do not have to query
/// the engine under the registry lock, and it exclusively owns the active
/// SMP attempt.
#[derive(Debug)]
pub struct ConversationSession {
    key: ConversationKey,
    online: bool,
    state: MessageState,
    verified: bool,
    smp: Option<SmpAttempt>,
}

impl ConversationSession {
    pub fn new(key: ConversationKey) -> Self {
        Self {
            key,
            online: false,
            state: MessageState::Unknown,
            verified: false,
            smp: None,
        }
    }

    pub fn key(&self) -> &ConversationKey {
        &self.key
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    pub fn message_state(&self) -> MessageState {
        self.state
    }

    pub fn encrypted(&self) -> bool {
        self.state == MessageState::Encrypted
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Refresh the cached engine view after an adapter-driven event.
    pub fn refresh(&mut self, state: MessageState, verified: bool) {
        self.state = state;
        self.verified = verified;
    }

    /// The current attempt, finished or not.
    pub fn smp(&self) -> Option<&SmpAttempt> {
        self.smp.as_ref()
    }

    pub fn smp_mut(&mut self) -> Option<&mut SmpAttempt> {
        self.smp.as_mut()
    }

    /// The current attempt, only while it is still live.
    pub fn active_smp(&self) -> Option<&SmpAttempt> {
        self.smp.as_ref().filter(|attempt| attempt.is_active())
    }

    pub fn has_unfinished_smp(&self) -> bool {
        self.active_smp().is_some()
    }

    /// Install a fresh attempt. The caller must have aborted any unfinished
    /// predecessor first; a finished predecessor is simply replaced.
    pub fn install_smp(&mut self, attempt: SmpAttempt) {
        self.smp = Some(attempt);
    }

    /// Drop the current attempt, if any.
    pub fn clear_smp(&mut self) -> Option<SmpAttempt> {
        self.smp.take()
    }
}
