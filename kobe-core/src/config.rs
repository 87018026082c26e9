use crate::persona::Persona;
use crate::types::{ChatMode, GrammarTopic, Language};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub language: Language,
    pub model: String,
    pub provider_base_url: String,

    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub learning_goal: String,
    #[serde(default)]
    pub grammar_topic: GrammarTopic,
    #[serde(default)]
    pub chat_mode: ChatMode,
    #[serde(default)]
    pub last_persona_id: Option<String>,

    pub personas: Vec<Persona>,
    pub scenes: Vec<String>,

    // Secrets are stored outside this struct at rest.
    #[serde(default)]
    pub api_key_present: bool,
}

impl AppConfig {
    pub fn persona(&self, id: &str) -> Option<&Persona> {
        self.personas
            .iter()
            .find(|p| p.id.as_str().eq_ignore_ascii_case(id))
    }
}
