use crate::quiz::Quiz;
use crate::types::{Emotion, Language};
use serde::{Deserialize, Serialize};

pub const OPENING_PROMPT: &str = "Start the conversation based on the context.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[default]
    Speech,
    Action,
    Narration,
}

impl PageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Speech => "speech",
            PageKind::Action => "action",
            PageKind::Narration => "narration",
        }
    }

    // Unknown tags are rendered as speech.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "action" => PageKind::Action,
            "narration" => PageKind::Narration,
            _ => PageKind::Speech,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialoguePage {
    #[serde(rename = "type")]
    pub kind: PageKind,
    pub text: String,
}

impl DialoguePage {
    pub fn new(kind: PageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn speech(text: impl Into<String>) -> Self {
        Self::new(PageKind::Speech, text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordReading {
    pub word: String,
    pub reading: String,
}

/// Decoded result of one turn.
///
/// `pages` and `vocabulary` are always present; the remaining fields are optional and
/// their absence is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub pages: Vec<DialoguePage>,
    pub vocabulary: Vec<WordReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    // `Some("")` means the model explicitly asked for the default outfit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl TurnResponse {
    pub fn empty() -> Self {
        Self {
            pages: vec![],
            vocabulary: vec![],
            quiz: None,
            emotion: None,
            outfit: None,
            location: None,
        }
    }

    /// A displayable record carrying an error message as its only page.
    pub fn error_page(message: impl Into<String>) -> Self {
        Self {
            pages: vec![DialoguePage::speech(message)],
            ..Self::empty()
        }
    }

    pub fn joined_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One outbound turn. Synthetic prompts are separate variants so callers never
/// have to encode intent in the text itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnRequest {
    Opening,
    User(String),
    QuizFeedback { correct: bool },
}

impl TurnRequest {
    pub fn user(text: impl Into<String>) -> Self {
        TurnRequest::User(text.into())
    }

    pub fn is_synthetic(&self) -> bool {
        !matches!(self, TurnRequest::User(_))
    }

    pub fn prompt_text(&self, language: Language) -> String {
        match self {
            TurnRequest::Opening => OPENING_PROMPT.to_string(),
            TurnRequest::User(text) => text.clone(),
            TurnRequest::QuizFeedback { correct } => match (language, correct) {
                (Language::Zh, true) => "回答正确！褒奖并继续。".to_string(),
                (Language::Zh, false) => "回答错误。鼓励并解释。".to_string(),
                (Language::En, true) => "Correct! Praise and continue.".to_string(),
                (Language::En, false) => "Incorrect. Encourage and explain.".to_string(),
            },
        }
    }
}
