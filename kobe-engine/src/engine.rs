use crate::session::{ChatSession, SessionConfig, ms};
use crate::timeout::{
    OPENING_TIMEOUT_MESSAGE, OPENING_TURN_TIMEOUT, TRANSLATE_TIMEOUT, TRANSLATE_TIMEOUT_MESSAGE,
    TURN_TIMEOUT, TURN_TIMEOUT_MESSAGE, with_timeout,
};
use crate::traits::{ChatTransport, ChatTurn, GenerateRequest};
use kobe_core::decode::decode_turn;
use kobe_core::instructions::{
    InstructionInput, build_system_instruction, response_schema, translation_prompt,
};
use kobe_core::persona::Persona;
use kobe_core::transcript::TranscriptEntry;
use kobe_core::turn::{TurnRequest, TurnResponse};
use kobe_core::types::{ChatMode, GrammarTopic, Language, SessionId};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const TRANSLATION_FAILED: &str = "Translation failed.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("API key missing. Please set an API key before starting a chat.")]
    MissingCredential,
    #[error("Session lost. Please re-enter chat.")]
    SessionLost,
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTimeouts {
    pub opening: Duration,
    pub turn: Duration,
    pub translate: Duration,
}

impl Default for TurnTimeouts {
    fn default() -> Self {
        Self {
            opening: OPENING_TURN_TIMEOUT,
            turn: TURN_TIMEOUT,
            translate: TRANSLATE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    // Shared scene identifiers offered to the model.
    pub scenes: Vec<String>,
    pub temperature: f32,
    pub timeouts: TurnTimeouts,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scenes: vec![],
            temperature: DEFAULT_TEMPERATURE,
            timeouts: TurnTimeouts::default(),
        }
    }
}

/// Everything a chat session is bound to.
#[derive(Clone)]
pub struct ChatSetup {
    pub persona: Persona,
    pub mode: ChatMode,
    pub goal: String,
    pub topic: GrammarTopic,
    pub language: Language,
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for ChatSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSetup")
            .field("persona", &self.persona.id)
            .field("mode", &self.mode)
            .field("goal", &self.goal)
            .field("topic", &self.topic)
            .field("language", &self.language)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

/// Holds at most one live chat session and runs turns against it.
///
/// Every engine owns its own session slot, so independent engines never share state.
pub struct ChatEngine {
    cfg: EngineConfig,
    transport: Arc<dyn ChatTransport>,
    slot: Mutex<Option<ChatSession>>,
}

impl ChatEngine {
    pub fn new(cfg: EngineConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            cfg,
            transport,
            slot: Mutex::new(None),
        }
    }

    /// Binds a fresh session to `setup`, discarding any session held before.
    ///
    /// With a non-empty `prior_history` the session is treated as resumed and no opening
    /// turn is sent. Otherwise the opening turn is sent right away; a transport failure on
    /// that turn is turned into a single displayable error page instead of an error.
    pub async fn start_chat(
        &self,
        setup: ChatSetup,
        prior_history: &[TranscriptEntry],
    ) -> Result<TurnResponse, EngineError> {
        if setup.api_key.trim().is_empty() {
            return Err(EngineError::MissingCredential);
        }

        let system_instruction = build_system_instruction(&InstructionInput {
            persona: &setup.persona,
            mode: setup.mode,
            goal: &setup.goal,
            topic: setup.topic,
            language: setup.language,
            scenes: &self.cfg.scenes,
        });

        let session = ChatSession::new(SessionConfig {
            persona_name: setup.persona.display_name.clone(),
            language: setup.language,
            system_instruction,
            response_schema: response_schema(),
            temperature: self.cfg.temperature,
            model: setup.model.clone(),
            api_key: setup.api_key.clone(),
        });

        log::info!(
            "starting chat: persona={} mode={} topic={:?} lang={} model={}",
            setup.persona.id.as_str(),
            setup.mode.label(),
            setup.topic,
            setup.language.code(),
            setup.model
        );

        if self.lock_slot().replace(session.clone()).is_some() {
            log::debug!("previous chat session discarded");
        }

        if !prior_history.is_empty() {
            log::info!(
                "resuming with {} prior messages; skipping opening turn",
                prior_history.len()
            );
            return Ok(TurnResponse::empty());
        }

        match self
            .exchange(
                &session,
                &TurnRequest::Opening,
                self.cfg.timeouts.opening,
                OPENING_TIMEOUT_MESSAGE,
            )
            .await
        {
            Ok(turn) => Ok(turn),
            Err(e) => {
                log::warn!("opening turn failed: {e}");
                Ok(TurnResponse::error_page(format!("Error: {e}")))
            }
        }
    }

    pub async fn send_message(&self, text: &str) -> Result<TurnResponse, EngineError> {
        self.send_turn(TurnRequest::user(text)).await
    }

    /// Sends one turn on the held session. Transport failures and timeouts propagate.
    pub async fn send_turn(&self, request: TurnRequest) -> Result<TurnResponse, EngineError> {
        let session = self
            .lock_slot()
            .as_ref()
            .cloned()
            .ok_or(EngineError::SessionLost)?;

        self.exchange(
            &session,
            &request,
            self.cfg.timeouts.turn,
            TURN_TIMEOUT_MESSAGE,
        )
        .await
        .inspect_err(|e| log::warn!("turn failed: {e}"))
    }

    /// One-shot translation outside of any session.
    pub async fn translate(
        &self,
        text: &str,
        target: Language,
        api_key: &str,
        model: &str,
    ) -> Result<String, EngineError> {
        if api_key.trim().is_empty() {
            return Err(EngineError::MissingCredential);
        }

        let request = GenerateRequest {
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_instruction: None,
            response_schema: None,
            temperature: None,
            contents: vec![ChatTurn::user(translation_prompt(text, target))],
        };

        let reply = with_timeout(
            self.transport.generate(&request),
            self.cfg.timeouts.translate,
            TRANSLATE_TIMEOUT_MESSAGE,
        )
        .await
        .inspect_err(|e| log::warn!("translation failed: {e}"))?;

        let reply = reply.trim();
        if reply.is_empty() {
            Ok(TRANSLATION_FAILED.to_string())
        } else {
            Ok(reply.to_string())
        }
    }

    pub fn has_session(&self) -> bool {
        self.lock_slot().is_some()
    }

    pub fn end_chat(&self) {
        if self.lock_slot().take().is_some() {
            log::info!("chat session ended");
        }
    }

    async fn exchange(
        &self,
        session: &ChatSession,
        request: &TurnRequest,
        limit: Duration,
        timeout_message: &str,
    ) -> Result<TurnResponse, EngineError> {
        let prompt = request.prompt_text(session.config().language);
        let call = session.request_for(&prompt);

        let t0 = Instant::now();
        let reply = with_timeout(self.transport.generate(&call), limit, timeout_message).await?;
        log::info!(
            "turn completed in {}ms (synthetic={}, history={})",
            ms(t0.elapsed()),
            request.is_synthetic(),
            session.history().len()
        );

        let turn = decode_turn(&reply);
        self.record(session.id(), prompt, reply);
        Ok(turn)
    }

    fn record(&self, id: &SessionId, prompt: String, reply: String) {
        let mut slot = self.lock_slot();
        match slot.as_mut() {
            Some(current) if current.id() == id => current.record_exchange(prompt, reply),
            _ => log::debug!("session replaced while a turn was in flight; exchange not recorded"),
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<ChatSession>> {
        // The slot holds plain data; a panic elsewhere cannot leave it half-written.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
