use crate::turn::TurnResponse;
use crate::types::MessageId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Caller-side chat history record. The pipeline produces these but never stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub turn: Option<TurnResponse>,
}

impl TranscriptEntry {
    pub fn user(text: impl Into<String>, sender_name: Option<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::User,
            text: text.into(),
            sender_name,
            turn: None,
        }
    }

    pub fn model(turn: TurnResponse, sender_name: Option<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Model,
            text: turn.joined_text(),
            sender_name,
            turn: Some(turn),
        }
    }
}
