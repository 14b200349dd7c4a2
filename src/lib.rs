//! Coordination layer for an OTR-style encrypted messaging overlay.
//!
//! This crate decides, per (account, contact) pair, when message bodies are
//! wrapped and unwrapped by an external cryptographic engine, tracks the
//! per-contact conversation state driven by presence and protocol events,
//! and drives the SMP mutual-authentication handshake. It performs no
//! cryptography itself and renders nothing; the engine, the transport, the
//! display surface and the authentication UI are collaborators behind
//! narrow traits.
//!
//! # Key components
//!
//! - [`coordinator::Coordinator`] — ties the collaborators together and
//!   exposes the interception, presence, dispatch and authentication
//!   operations.
//! - [`engine::CryptoEngine`] / [`engine::EngineEvent`] — the adapter
//!   interface to the real OTR engine and its callbacks.
//! - [`registry::ConversationRegistry`] — one session per pair, created
//!   lazily, surviving offline periods.
//! - [`smp::SmpAttempt`] — the authentication state machine.

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod events;
pub mod registry;
pub mod session;
pub mod smp;
pub mod types;

pub use config::OtrConfig;
pub use coordinator::messaging::{
    InboundVerdict, MessageOrigin, OutboundMessage, OutboundVerdict,
};
pub use coordinator::Coordinator;
pub use engine::{CryptoEngine, DecodeOutcome, EncodeOutcome, EngineEvent, SmpSecret};
pub use error::{EngineError, OtrError, SmpError};
pub use events::{AuthenticationHandler, DisplayHandler, Transport};
pub use registry::{ConversationRegistry, SessionHandle};
pub use session::ConversationSession;
pub use smp::{SmpAttempt, SmpMethod, SmpPrompt, SmpRole, SmpState};
pub use types::{ConversationKey, MessageState, OtrPolicy, PresenceEvent, StateChange};
