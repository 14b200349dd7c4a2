//! Errors for the coordination layer.

use thiserror::Error;

/// Errors reported by the cryptographic engine adapter.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Cryptographic engine failure: {0}")]
    Crypto(String),

    #[error("No active session for this conversation")]
    NoSession,

    #[error("An unknown error occurred: {0}")]
    Other(anyhow::Error),
}

/// Errors from the SMP authentication state machine.
#[derive(Debug, Error)]
pub enum SmpError {
    #[error("Invalid authentication transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Shared secret must not be empty")]
    EmptySecret,

    #[error("Question and answer must not be empty")]
    EmptyQuestion,

    #[error("Secret material does not match the selected method")]
    MethodMismatch,
}

/// Errors surfaced by the coordinator.
#[derive(Debug, Error)]
pub enum OtrError {
    #[error("No conversation found for {0}")]
    SessionNotFound(String),

    #[error("Encryption policy forbids starting a session")]
    PolicyDisabled,

    #[error("Authentication requires an encrypted session")]
    NotEncrypted,

    #[error("No authentication attempt is waiting for a response")]
    NoPendingAuthentication,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Smp(#[from] SmpError),

    #[error("Handler error: {0}")]
    Handler(String),
}
