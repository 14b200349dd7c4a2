//! Mock collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use otr_overlay::{
    AuthenticationHandler, ConversationKey, Coordinator, CryptoEngine, DecodeOutcome,
    DisplayHandler, EncodeOutcome, EngineError, MessageState, OtrConfig, OtrError, OtrPolicy,
    SmpMethod, SmpPrompt, SmpSecret, Transport,
};

/// Wire prefix the mock engine puts on encrypted bodies.
pub const WIRE_PREFIX: &str = "?OTR:";
/// Bodies with this prefix are treated as pure protocol control traffic.
pub const CONTROL_PREFIX: &str = "?OTRv3?";

/// One recorded engine call, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Encode(ConversationKey),
    Decode(ConversationKey),
    StartSession(ConversationKey),
    EndSession(ConversationKey),
    ExpireSession(ConversationKey),
    SetPolicy(OtrPolicy),
    BeginSmp(ConversationKey, SmpMethod),
    RespondSmp(ConversationKey, String),
    AbortSmp(ConversationKey),
}

/// Scripted engine standing in for the real cryptographic library.
///
/// Per-conversation state is set by the test; every trait call is recorded
/// so ordering properties can be asserted.
#[derive(Default)]
pub struct MockEngine {
    calls: Mutex<Vec<EngineCall>>,
    states: Mutex<HashMap<ConversationKey, MessageState>>,
    verified: Mutex<HashMap<ConversationKey, bool>>,
    session_ids: Mutex<HashMap<ConversationKey, String>>,
    fingerprints: Mutex<HashMap<String, String>>,
    policy: Mutex<OtrPolicy>,
    end_session_failures: Mutex<HashSet<ConversationKey>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&self, key: &ConversationKey, state: MessageState) {
        self.states.lock().unwrap().insert(key.clone(), state);
    }

    pub fn set_verified(&self, key: &ConversationKey, verified: bool) {
        self.verified.lock().unwrap().insert(key.clone(), verified);
    }

    pub fn set_session_id(&self, key: &ConversationKey, id: &str) {
        self.session_ids
            .lock()
            .unwrap()
            .insert(key.clone(), id.to_string());
    }

    pub fn set_fingerprint(&self, account: &str, fingerprint: &str) {
        self.fingerprints
            .lock()
            .unwrap()
            .insert(account.to_string(), fingerprint.to_string());
    }

    /// Make `end_session` fail for this conversation.
    pub fn fail_end_session(&self, key: &ConversationKey) {
        self.end_session_failures
            .lock()
            .unwrap()
            .insert(key.clone());
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CryptoEngine for MockEngine {
    fn encode(
        &self,
        key: &ConversationKey,
        plaintext: &str,
    ) -> Result<EncodeOutcome, EngineError> {
        self.record(EngineCall::Encode(key.clone()));
        // Messages that are themselves handshake fragments get consumed.
        if plaintext.starts_with(CONTROL_PREFIX) {
            return Ok(EncodeOutcome::Consumed);
        }
        match self.message_state(key) {
            MessageState::Encrypted => {
                Ok(EncodeOutcome::Encoded(format!("{WIRE_PREFIX}{plaintext}")))
            }
            _ => Ok(EncodeOutcome::Encoded(plaintext.to_string())),
        }
    }

    fn decode(
        &self,
        key: &ConversationKey,
        ciphertext: &str,
    ) -> Result<DecodeOutcome, EngineError> {
        self.record(EngineCall::Decode(key.clone()));
        if ciphertext.starts_with(CONTROL_PREFIX) {
            return Ok(DecodeOutcome::Control);
        }
        match ciphertext.strip_prefix(WIRE_PREFIX) {
            Some("") => Ok(DecodeOutcome::Plaintext(None)),
            Some(body) => Ok(DecodeOutcome::Plaintext(Some(body.to_string()))),
            None => Ok(DecodeOutcome::Plaintext(Some(ciphertext.to_string()))),
        }
    }

    fn start_session(&self, key: &ConversationKey) -> Result<(), EngineError> {
        self.record(EngineCall::StartSession(key.clone()));
        self.set_state(key, MessageState::Encrypting);
        Ok(())
    }

    fn end_session(&self, key: &ConversationKey) -> Result<(), EngineError> {
        self.record(EngineCall::EndSession(key.clone()));
        if self.end_session_failures.lock().unwrap().contains(key) {
            return Err(EngineError::Crypto("scripted end_session failure".to_string()));
        }
        self.set_state(key, MessageState::Plaintext);
        Ok(())
    }

    fn expire_session(&self, key: &ConversationKey) -> Result<(), EngineError> {
        self.record(EngineCall::ExpireSession(key.clone()));
        self.set_state(key, MessageState::Plaintext);
        Ok(())
    }

    fn message_state(&self, key: &ConversationKey) -> MessageState {
        self.states
            .lock()
            .unwrap()
            .get(key)
            .copied()
            .unwrap_or(MessageState::Plaintext)
    }

    fn is_verified(&self, key: &ConversationKey) -> bool {
        self.verified.lock().unwrap().get(key).copied().unwrap_or(false)
    }

    fn session_id(&self, key: &ConversationKey) -> Option<String> {
        self.session_ids.lock().unwrap().get(key).cloned()
    }

    fn fingerprint(&self, account: &str) -> Option<String> {
        self.fingerprints.lock().unwrap().get(account).cloned()
    }

    fn set_policy(&self, policy: OtrPolicy) {
        self.record(EngineCall::SetPolicy(policy));
        *self.policy.lock().unwrap() = policy;
    }

    fn policy(&self) -> OtrPolicy {
        *self.policy.lock().unwrap()
    }

    fn begin_smp(&self, key: &ConversationKey, secret: &SmpSecret) -> Result<(), EngineError> {
        self.record(EngineCall::BeginSmp(key.clone(), secret.method()));
        Ok(())
    }

    fn respond_smp(&self, key: &ConversationKey, answer: &str) -> Result<(), EngineError> {
        self.record(EngineCall::RespondSmp(key.clone(), answer.to_string()));
        Ok(())
    }

    fn abort_smp(&self, key: &ConversationKey) -> Result<(), EngineError> {
        self.record(EngineCall::AbortSmp(key.clone()));
        Ok(())
    }
}

/// Collects status lines per conversation.
#[derive(Default)]
pub struct MockDisplay {
    events: Mutex<Vec<(ConversationKey, String)>>,
}

impl MockDisplay {
    pub fn events(&self) -> Vec<(ConversationKey, String)> {
        self.events.lock().unwrap().clone()
    }

    pub fn lines_for(&self, key: &ConversationKey) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl DisplayHandler for MockDisplay {
    async fn append_status_event(
        &self,
        key: &ConversationKey,
        text: &str,
    ) -> Result<(), OtrError> {
        self.events
            .lock()
            .unwrap()
            .push((key.clone(), text.to_string()));
        Ok(())
    }
}

/// Collects authentication prompts.
#[derive(Default)]
pub struct MockAuthUi {
    prompts: Mutex<Vec<(ConversationKey, SmpPrompt)>>,
}

impl MockAuthUi {
    pub fn prompts(&self) -> Vec<(ConversationKey, SmpPrompt)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthenticationHandler for MockAuthUi {
    async fn on_smp_request(
        &self,
        key: &ConversationKey,
        prompt: SmpPrompt,
    ) -> Result<(), OtrError> {
        self.prompts.lock().unwrap().push((key.clone(), prompt));
        Ok(())
    }
}

/// Collects bodies handed to the wire.
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<(ConversationKey, String)>>,
}

impl MockTransport {
    pub fn sent(&self) -> Vec<(ConversationKey, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(&self, key: &ConversationKey, body: &str) -> Result<(), OtrError> {
        self.sent
            .lock()
            .unwrap()
            .push((key.clone(), body.to_string()));
        Ok(())
    }
}

/// Everything a test needs, wired together.
pub struct Harness {
    pub engine: Arc<MockEngine>,
    pub display: Arc<MockDisplay>,
    pub auth: Arc<MockAuthUi>,
    pub transport: Arc<MockTransport>,
    pub coordinator: Coordinator,
}

pub fn harness() -> Harness {
    harness_with_config(OtrConfig::default())
}

pub fn harness_with_config(config: OtrConfig) -> Harness {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = Arc::new(MockEngine::new());
    let display = Arc::new(MockDisplay::default());
    let auth = Arc::new(MockAuthUi::default());
    let transport = Arc::new(MockTransport::default());
    let coordinator = Coordinator::new(
        engine.clone(),
        display.clone(),
        auth.clone(),
        transport.clone(),
        config,
    );
    Harness {
        engine,
        display,
        auth,
        transport,
        coordinator,
    }
}

pub fn key() -> ConversationKey {
    ConversationKey::new("alice@example.net", "bob@example.org")
}
