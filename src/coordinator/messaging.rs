//! Message interception pipeline.
//!
//! Two ordered filters sit in the host's delivery chain: the inbound filter
//! runs before any other message processing, the outbound filter after all
//! of it, so encryption happens as close to the wire as possible. Both are
//! driven by the host calling [`Coordinator::process_outbound`] and
//! [`Coordinator::process_inbound`]; the verdict tells the host whether the
//! message continues through the chain.

use log::{debug, info};

use crate::coordinator::Coordinator;
use crate::engine::{DecodeOutcome, EncodeOutcome};
use crate::error::OtrError;
use crate::types::ConversationKey;

/// Who produced an outbound message.
///
/// Replies required by the handshake travel the same outbound path as user
/// messages but are tagged [`MessageOrigin::Internal`] so the filter does
/// not re-encode them. Without the tag, a handshake reply would be encoded
/// again, producing another reply and an unbounded loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrigin {
    /// Typed by the user; subject to encoding.
    User,
    /// Injected by this layer; passes through untouched.
    Internal,
}

/// An outgoing message entering the outbound filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub key: ConversationKey,
    pub body: String,
    pub origin: MessageOrigin,
}

impl OutboundMessage {
    pub fn from_user(key: ConversationKey, body: impl Into<String>) -> Self {
        Self {
            key,
            body: body.into(),
            origin: MessageOrigin::User,
        }
    }

    pub fn internal(key: ConversationKey, body: impl Into<String>) -> Self {
        Self {
            key,
            body: body.into(),
            origin: MessageOrigin::Internal,
        }
    }
}

/// Outbound filter decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundVerdict {
    /// Hand this body to the transport.
    Send(String),
    /// The message was consumed as protocol traffic; transmit nothing.
    Suppress,
}

/// Inbound filter decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundVerdict {
    /// Deliver this body to the user-visible layer.
    Deliver(String),
    /// The stanza was handled here; nothing reaches the user.
    Handled,
}

impl Coordinator {
    /// Run the outbound filter over an outgoing message.
    ///
    /// Must complete before the message is handed to transport; no message
    /// may bypass encoding.
    pub async fn process_outbound(
        &self,
        message: OutboundMessage,
    ) -> Result<OutboundVerdict, OtrError> {
        if message.origin == MessageOrigin::Internal {
            // Already produced by the engine; re-encoding it would loop.
            debug!("[process_outbound]: Passing internal message for {}", message.key);
            return Ok(OutboundVerdict::Send(message.body));
        }

        match self.engine.encode(&message.key, &message.body)? {
            EncodeOutcome::Encoded(body) => Ok(OutboundVerdict::Send(body)),
            EncodeOutcome::Consumed => {
                debug!("[process_outbound]: Engine consumed message for {}", message.key);
                Ok(OutboundVerdict::Suppress)
            }
        }
    }

    /// Run the inbound filter over an incoming wire body.
    ///
    /// Must complete before the message is exposed to any consumer,
    /// including the display collaborator.
    pub async fn process_inbound(
        &self,
        key: &ConversationKey,
        body: &str,
    ) -> Result<InboundVerdict, OtrError> {
        match self.engine.decode(key, body)? {
            DecodeOutcome::Control => {
                debug!("[process_inbound]: Handled control traffic for {key}");
                Ok(InboundVerdict::Handled)
            }
            DecodeOutcome::Plaintext(Some(body)) => Ok(InboundVerdict::Deliver(body)),
            // Nothing user-visible in this stanza.
            DecodeOutcome::Plaintext(None) => Ok(InboundVerdict::Handled),
        }
    }

    /// Send an internally generated control message to the peer.
    ///
    /// Travels the ordinary outbound path with an internal origin tag, so
    /// the filter passes it through and the transport receives it as-is.
    pub(crate) async fn send_internal(
        &self,
        key: &ConversationKey,
        body: &str,
    ) -> Result<(), OtrError> {
        if body.is_empty() {
            return Ok(());
        }
        info!("[send_internal]: Sending control message for {key}");
        let message = OutboundMessage::internal(key.clone(), body);
        match self.process_outbound(message).await? {
            OutboundVerdict::Send(body) => self.transport.send_message(key, &body).await,
            OutboundVerdict::Suppress => Ok(()),
        }
    }
}
