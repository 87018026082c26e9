use async_trait::async_trait;
use kobe_core::transcript::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// One call against the external AI provider.
///
/// The provider is stateless; conversation state travels in `contents`.
#[derive(Clone, PartialEq)]
pub struct GenerateRequest {
    pub api_key: String,
    pub model: String,
    pub system_instruction: Option<String>,
    pub response_schema: Option<Value>,
    pub temperature: Option<f32>,
    pub contents: Vec<ChatTurn>,
}

impl std::fmt::Debug for GenerateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateRequest")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field(
                "system_instruction_len",
                &self.system_instruction.as_ref().map(|s| s.len()),
            )
            .field("structured", &self.response_schema.is_some())
            .field("temperature", &self.temperature)
            .field("turns", &self.contents.len())
            .finish()
    }
}

impl GenerateRequest {
    /// The newest user prompt, i.e. the turn being sent.
    pub fn latest_prompt(&self) -> Option<&str> {
        self.contents
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.text.as_str())
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Returns the raw model text. Expected, but not guaranteed, to be schema-conformant JSON.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<String>;
}
