//! Output-event handler traits.
//!
//! Implementations of these traits receive callbacks when the coordinator
//! produces something user-visible or network-bound. The core stays ignorant
//! of the UI toolkit and the wire protocol; the surrounding host wires these
//! up at construction.

use async_trait::async_trait;

use crate::error::OtrError;
use crate::smp::SmpPrompt;
use crate::types::ConversationKey;

/// Receives human-readable status lines for a conversation.
///
/// Status lines are appended as system events, never as chat messages from
/// either party, and never contain raw protocol traffic.
#[async_trait]
pub trait DisplayHandler: Send + Sync {
    async fn append_status_event(
        &self,
        key: &ConversationKey,
        text: &str,
    ) -> Result<(), OtrError>;
}

/// Receives authentication attempts that need user attention.
///
/// The prompt carries the role, method and peer question (if any); the user
/// answers through [`crate::coordinator::Coordinator::respond_authentication`]
/// or cancels through
/// [`crate::coordinator::Coordinator::cancel_authentication`].
#[async_trait]
pub trait AuthenticationHandler: Send + Sync {
    async fn on_smp_request(
        &self,
        key: &ConversationKey,
        prompt: SmpPrompt,
    ) -> Result<(), OtrError>;
}

/// Accepts outbound message send requests.
///
/// Bodies arriving here have already been through the outbound interception
/// path; the transport must deliver them as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_message(&self, key: &ConversationKey, body: &str) -> Result<(), OtrError>;
}
