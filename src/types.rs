//! Core types shared across the coordination layer.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Composite key identifying a conversation: a local account talking to one
/// remote contact.
///
/// Keeping both halves in a single key makes the one-session-per-pair
/// invariant structural: the registry map cannot hold two entries for the
/// same pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    account: String,
    contact: String,
}

impl ConversationKey {
    pub fn new(account: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            contact: contact.into(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }
}

impl Display for ConversationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.account, self.contact)
    }
}

/// Coarse state of the cryptographic session for one conversation, as
/// reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageState {
    /// No encryption is active; messages pass through as plaintext.
    Plaintext,
    /// A key exchange is underway but not yet complete.
    Encrypting,
    /// The session is fully established; messages are encrypted.
    Encrypted,
    /// The peer ended the session; sending would leak plaintext.
    Finished,
    /// The engine has no record for this conversation yet.
    Unknown,
}

impl Display for MessageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self {
            MessageState::Plaintext => "plaintext",
            MessageState::Encrypting => "encrypting",
            MessageState::Encrypted => "encrypted",
            MessageState::Finished => "finished",
            MessageState::Unknown => "unknown",
        };
        write!(f, "{state}")
    }
}

/// Session state transitions reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    /// A key exchange has been initiated (locally or by the peer).
    GoingSecure,
    /// The key exchange completed and the session is now encrypted.
    GoneSecure,
    /// Encryption was lost without an explicit close.
    GoneInsecure,
    /// The session was closed locally.
    Close,
    /// The peer ended the session on their side.
    RemoteClose,
    /// An already-encrypted session was refreshed with new keys.
    StillSecure,
    /// The verification status of the contact changed.
    TrustChanged,
}

impl Display for StateChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let change = match self {
            StateChange::GoingSecure => "going-secure",
            StateChange::GoneSecure => "gone-secure",
            StateChange::GoneInsecure => "gone-insecure",
            StateChange::Close => "close",
            StateChange::RemoteClose => "remote-close",
            StateChange::StillSecure => "still-secure",
            StateChange::TrustChanged => "trust-changed",
        };
        write!(f, "{change}")
    }
}

/// Encryption policy, ordered from most to least restrictive.
///
/// Anything below [`OtrPolicy::Enabled`] refuses to initiate new sessions;
/// existing sessions and teardown paths stay active.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum OtrPolicy {
    /// Never offer or accept encryption.
    Disabled,
    /// Accept encryption when the peer offers it, never initiate.
    Manual,
    /// Offer and accept encryption.
    #[default]
    Enabled,
    /// Refuse to send plaintext at all.
    Always,
}

impl Display for OtrPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let policy = match self {
            OtrPolicy::Disabled => "disabled",
            OtrPolicy::Manual => "manual",
            OtrPolicy::Enabled => "enabled",
            OtrPolicy::Always => "always",
        };
        write!(f, "{policy}")
    }
}

/// Presence notification for a single contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEvent {
    Available,
    Unavailable,
}
