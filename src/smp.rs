//! State machine for SMP (Socialist Millionaire Protocol) authentication
//! attempts.
//!
//! One attempt covers a single run of the mutual-authentication handshake
//! between the local account and one contact. A conversation session owns at
//! most one attempt at a time; a new handshake always starts from a fresh
//! attempt object.
//!
//! # States
//!
//! - **Ready**: the attempt exists but the handshake has not started. Only
//!   initiator attempts pass through this state.
//! - **InProgress**: the handshake is running. Responder attempts are
//!   created directly in this state because the peer already initiated.
//! - **Finished**: the engine reported the outcome of the comparison. No
//!   transition leaves this state; the attempt is replaced, never reused.
//!
//! # State transitions
//!
//! ```text
//! Ready -- start(secret) --> InProgress          (initiator, input validated)
//!          respond(question)  creates InProgress (responder)
//! InProgress -- finish() --> Finished
//! ```
//!
//! Progress updates are accepted only while `InProgress` and only within
//! 0-100; anything else is ignored, never an error.

use std::fmt::Display;

use log::debug;

use crate::engine::SmpSecret;
use crate::error::SmpError;

/// Which side of the handshake this attempt plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmpRole {
    /// The local user started the authentication.
    Initiator,
    /// The peer started it; the local user only supplies an answer.
    Responder,
}

/// How the shared secret is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmpMethod {
    /// A question with an agreed answer, carried to the peer.
    Question,
    /// A shared secret both parties already know.
    SharedSecret,
    /// Manual out-of-band fingerprint comparison.
    Fingerprint,
}

impl Display for SmpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let method = match self {
            SmpMethod::Question => "question",
            SmpMethod::SharedSecret => "shared-secret",
            SmpMethod::Fingerprint => "fingerprint",
        };
        write!(f, "{method}")
    }
}

/// Lifecycle state of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmpState {
    Ready,
    InProgress,
    Finished,
}

impl Display for SmpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self {
            SmpState::Ready => "Ready",
            SmpState::InProgress => "InProgress",
            SmpState::Finished => "Finished",
        };
        write!(f, "{state}")
    }
}

/// The data handed to the authentication UI when an attempt needs user
/// attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmpPrompt {
    pub role: SmpRole,
    pub method: SmpMethod,
    pub question: Option<String>,
}

/// A single run of the SMP handshake.
#[derive(Debug, Clone)]
pub struct SmpAttempt {
    role: SmpRole,
    method: SmpMethod,
    state: SmpState,
    question: Option<String>,
    progress: u8,
    succeeded: bool,
}

impl SmpAttempt {
    /// Create an initiator attempt in `Ready` state.
    ///
    /// The handshake does not start until [`SmpAttempt::start`] validates
    /// the secret material.
    pub fn initiate(method: SmpMethod) -> Self {
        Self {
            role: SmpRole::Initiator,
            method,
            state: SmpState::Ready,
            question: None,
            progress: 0,
            succeeded: false,
        }
    }

    /// Create a responder attempt, already `InProgress` because the peer
    /// initiated the handshake.
    ///
    /// A carried question selects the question method; its absence means the
    /// peer used a bare shared secret.
    pub fn respond(question: Option<String>) -> Self {
        let method = if question.is_some() {
            SmpMethod::Question
        } else {
            SmpMethod::SharedSecret
        };
        Self {
            role: SmpRole::Responder,
            method,
            state: SmpState::InProgress,
            question,
            progress: 0,
            succeeded: false,
        }
    }

    /// Validate the secret material and start the handshake.
    ///
    /// ## Preconditions:
    /// - Must be in `Ready` state
    /// - Secret material must match the chosen method and be non-empty
    ///
    /// ## State transition:
    /// Ready -> InProgress
    pub fn start(&mut self, secret: &SmpSecret) -> Result<(), SmpError> {
        if self.state != SmpState::Ready {
            return Err(SmpError::InvalidStateTransition {
                from: self.state.to_string(),
                to: SmpState::InProgress.to_string(),
            });
        }

        match (self.method, secret) {
            (SmpMethod::Question, SmpSecret::Question { question, answer }) => {
                if question.is_empty() || answer.is_empty() {
                    return Err(SmpError::EmptyQuestion);
                }
                self.question = Some(question.clone());
            }
            (SmpMethod::SharedSecret, SmpSecret::SharedSecret(secret)) => {
                if secret.is_empty() {
                    return Err(SmpError::EmptySecret);
                }
            }
            // Fingerprint comparison needs no input beyond the
            // engine-reported value.
            (SmpMethod::Fingerprint, SmpSecret::Fingerprint) => {}
            _ => return Err(SmpError::MethodMismatch),
        }

        self.state = SmpState::InProgress;
        Ok(())
    }

    /// Record a progress update from the engine.
    ///
    /// Out-of-range values and updates after `Finished` are dropped; late or
    /// duplicate callbacks are expected in a live system.
    pub fn update_progress(&mut self, progress: i32) {
        if self.state != SmpState::InProgress {
            debug!("[update_progress]: Dropping progress update in state {}", self.state);
            return;
        }
        if !(0..=100).contains(&progress) {
            debug!("[update_progress]: Dropping out-of-range progress {progress}");
            return;
        }
        self.progress = progress as u8;
    }

    /// Record the engine's verdict on the comparison.
    ///
    /// ## State transition:
    /// InProgress -> Finished
    pub fn finish(&mut self, succeeded: bool) -> Result<(), SmpError> {
        if self.state != SmpState::InProgress {
            return Err(SmpError::InvalidStateTransition {
                from: self.state.to_string(),
                to: SmpState::Finished.to_string(),
            });
        }
        self.state = SmpState::Finished;
        self.succeeded = succeeded;
        self.progress = 100;
        Ok(())
    }

    /// Whether the attempt is still live (`Ready` or `InProgress`).
    pub fn is_active(&self) -> bool {
        self.state != SmpState::Finished
    }

    pub fn is_finished(&self) -> bool {
        self.state == SmpState::Finished
    }

    pub fn role(&self) -> SmpRole {
        self.role
    }

    pub fn method(&self) -> SmpMethod {
        self.method
    }

    pub fn state(&self) -> SmpState {
        self.state
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Whether the engine reported a successful comparison. Only meaningful
    /// once `Finished`.
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Build the prompt handed to the authentication UI.
    pub fn prompt(&self) -> SmpPrompt {
        SmpPrompt {
            role: self.role,
            method: self.method,
            question: self.question.clone(),
        }
    }
}
