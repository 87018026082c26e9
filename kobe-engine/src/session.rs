use crate::traits::{ChatTurn, GenerateRequest};
use kobe_core::types::{Language, SessionId};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Fixed configuration of one chat session. Does not change between turns.
#[derive(Clone)]
pub struct SessionConfig {
    pub persona_name: String,
    pub language: Language,
    pub system_instruction: String,
    pub response_schema: Value,
    pub temperature: f32,
    pub model: String,
    pub api_key: String,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("persona_name", &self.persona_name)
            .field("language", &self.language)
            .field("system_instruction_len", &self.system_instruction.len())
            .field("temperature", &self.temperature)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Client-side handle of one provider conversation.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: SessionId,
    config: Arc<SessionConfig>,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: SessionId::new(),
            config: Arc::new(config),
            history: vec![],
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Request for sending `prompt` as the next user turn.
    pub fn request_for(&self, prompt: &str) -> GenerateRequest {
        let mut contents = self.history.clone();
        contents.push(ChatTurn::user(prompt));

        GenerateRequest {
            api_key: self.config.api_key.clone(),
            model: self.config.model.clone(),
            system_instruction: Some(self.config.system_instruction.clone()),
            response_schema: Some(self.config.response_schema.clone()),
            temperature: Some(self.config.temperature),
            contents,
        }
    }

    pub fn record_exchange(&mut self, prompt: impl Into<String>, reply: impl Into<String>) {
        self.history.push(ChatTurn::user(prompt));
        self.history.push(ChatTurn::model(reply));
    }
}

pub fn ms(d: Duration) -> u64 {
    d.as_millis().try_into().unwrap_or(u64::MAX)
}
