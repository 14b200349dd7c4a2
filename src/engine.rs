//! Interface to the cryptographic engine.
//!
//! The coordination layer never performs cryptography itself. Everything it
//! needs from the real OTR engine goes through [`CryptoEngine`], and
//! everything the engine reports back arrives as an [`EngineEvent`] handed
//! to [`crate::coordinator::Coordinator::handle_engine_event`].

use crate::error::EngineError;
use crate::smp::SmpMethod;
use crate::types::{ConversationKey, MessageState, OtrPolicy, StateChange};

/// Result of encoding an outgoing plaintext body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeOutcome {
    /// The body to actually put on the wire. May equal the input when the
    /// session is plaintext.
    Encoded(String),
    /// The engine consumed the message entirely as protocol control
    /// traffic; nothing may be transmitted.
    Consumed,
}

/// Result of decoding an incoming wire body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Decoded plaintext to deliver. `None` means the stanza carried no
    /// user-visible content.
    Plaintext(Option<String>),
    /// Pure protocol control traffic; never shown to the user.
    Control,
}

/// Secret material for starting an SMP handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmpSecret {
    Question { question: String, answer: String },
    SharedSecret(String),
    Fingerprint,
}

impl SmpSecret {
    pub fn method(&self) -> SmpMethod {
        match self {
            SmpSecret::Question { .. } => SmpMethod::Question,
            SmpSecret::SharedSecret(_) => SmpMethod::SharedSecret,
            SmpSecret::Fingerprint => SmpMethod::Fingerprint,
        }
    }
}

/// Operations the coordination layer needs from the OTR engine.
///
/// Calls return synchronously from this layer's perspective; the engine may
/// emit follow-up [`EngineEvent`]s (for example a state change after
/// `start_session`). Implementations wrap the real cryptographic library.
pub trait CryptoEngine: Send + Sync {
    /// Transform an outgoing plaintext body for the wire.
    fn encode(
        &self,
        key: &ConversationKey,
        plaintext: &str,
    ) -> Result<EncodeOutcome, EngineError>;

    /// Transform an incoming wire body back into plaintext.
    fn decode(
        &self,
        key: &ConversationKey,
        ciphertext: &str,
    ) -> Result<DecodeOutcome, EngineError>;

    /// Initiate a key exchange with the contact.
    fn start_session(&self, key: &ConversationKey) -> Result<(), EngineError>;

    /// End the session, notifying the peer.
    fn end_session(&self, key: &ConversationKey) -> Result<(), EngineError>;

    /// Silently drop the session state without notifying the peer.
    fn expire_session(&self, key: &ConversationKey) -> Result<(), EngineError>;

    fn message_state(&self, key: &ConversationKey) -> MessageState;

    /// Whether the contact's fingerprint has been verified.
    fn is_verified(&self, key: &ConversationKey) -> bool;

    /// Identifier of the current encrypted session, if one is established.
    fn session_id(&self, key: &ConversationKey) -> Option<String>;

    /// The account's own long-term key fingerprint, if a key exists.
    fn fingerprint(&self, account: &str) -> Option<String>;

    fn set_policy(&self, policy: OtrPolicy);

    fn policy(&self) -> OtrPolicy;

    /// Begin an SMP handshake as initiator.
    fn begin_smp(&self, key: &ConversationKey, secret: &SmpSecret) -> Result<(), EngineError>;

    /// Answer a peer-initiated SMP handshake.
    fn respond_smp(&self, key: &ConversationKey, answer: &str) -> Result<(), EngineError>;

    /// Tear down the protocol state of a running SMP handshake.
    fn abort_smp(&self, key: &ConversationKey) -> Result<(), EngineError>;
}

/// Callbacks delivered by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The session state changed.
    StateChanged {
        key: ConversationKey,
        change: StateChange,
    },
    /// The peer initiated an SMP handshake, optionally with a question.
    SmpRequested {
        key: ConversationKey,
        question: Option<String>,
    },
    /// Numeric progress (0-100) of a running SMP handshake.
    SmpProgress { key: ConversationKey, progress: i32 },
    /// The SMP comparison finished; `succeeded` is the engine's verdict.
    SmpCompleted {
        key: ConversationKey,
        succeeded: bool,
    },
    /// A human-readable message to show as a status event.
    DisplayMessage { key: ConversationKey, text: String },
    /// A diagnostic line for the log, tagged with the account.
    LogMessage { account: String, text: String },
    /// The effective policy changed; the coordinator pushes the new value
    /// back to the engine.
    PolicyChanged { policy: OtrPolicy },
    /// The engine needs a control message transmitted to the peer (for
    /// example a handshake reply). Routed through the outbound path with an
    /// internal origin tag so it is not re-encoded.
    InjectMessage { key: ConversationKey, body: String },
}
