use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown {kind}: {value}")]
    UnknownLabel { kind: &'static str, value: String },
}

impl CoreError {
    fn unknown(kind: &'static str, value: &str) -> Self {
        CoreError::UnknownLabel {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Language used for explanations and feedback shown to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// Name of the language as written into model instructions.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Zh => "Chinese (Simplified)",
            Language::En => "English",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "chinese" => Ok(Language::Zh),
            "en" | "english" => Ok(Language::En),
            _ => Err(CoreError::unknown("language", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatMode {
    #[default]
    FreeTalk,
    Study,
}

impl ChatMode {
    pub fn label(self) -> &'static str {
        match self {
            ChatMode::FreeTalk => "FREE_TALK",
            ChatMode::Study => "STUDY",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "free_talk" | "free" | "casual" => Ok(ChatMode::FreeTalk),
            "study" | "review" => Ok(ChatMode::Study),
            _ => Err(CoreError::unknown("chat mode", value)),
        }
    }
}

/// JLPT N3 grammar areas a study session can focus on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrammarTopic {
    Passive,
    Causative,
    CausativePassive,
    GivingReceiving,
    Keigo,
    Conjecture,
    #[default]
    General,
}

impl GrammarTopic {
    pub const ALL: [GrammarTopic; 7] = [
        GrammarTopic::Passive,
        GrammarTopic::Causative,
        GrammarTopic::CausativePassive,
        GrammarTopic::GivingReceiving,
        GrammarTopic::Keigo,
        GrammarTopic::Conjecture,
        GrammarTopic::General,
    ];

    /// Full label, Japanese term followed by the English name.
    pub fn label(self) -> &'static str {
        match self {
            GrammarTopic::Passive => "受身形 (Passive Form)",
            GrammarTopic::Causative => "使役形 (Causative Form)",
            GrammarTopic::CausativePassive => "使役受身 (Causative-Passive)",
            GrammarTopic::GivingReceiving => "授受表現 (Giving & Receiving)",
            GrammarTopic::Keigo => "敬語 (Honorifics)",
            GrammarTopic::Conjecture => "様態・推量 (Conjecture/Appearance)",
            GrammarTopic::General => "综合复习 (General N3 Review)",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            GrammarTopic::Passive => "Passive Form",
            GrammarTopic::Causative => "Causative Form",
            GrammarTopic::CausativePassive => "Causative-Passive",
            GrammarTopic::GivingReceiving => "Giving & Receiving",
            GrammarTopic::Keigo => "Honorifics",
            GrammarTopic::Conjecture => "Conjecture/Appearance",
            GrammarTopic::General => "General N3 Review",
        }
    }

    fn key(self) -> &'static str {
        match self {
            GrammarTopic::Passive => "passive",
            GrammarTopic::Causative => "causative",
            GrammarTopic::CausativePassive => "causative_passive",
            GrammarTopic::GivingReceiving => "giving_receiving",
            GrammarTopic::Keigo => "keigo",
            GrammarTopic::Conjecture => "conjecture",
            GrammarTopic::General => "general",
        }
    }

    /// Accepts the short key (`passive`), the English name (`Passive Form`) or the full label.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let trimmed = value.trim();
        let key = trimmed.to_ascii_lowercase().replace(['-', ' '], "_");
        GrammarTopic::ALL
            .into_iter()
            .find(|t| {
                t.key() == key
                    || t.english_name().eq_ignore_ascii_case(trimmed)
                    || t.label() == trimmed
            })
            .ok_or_else(|| CoreError::unknown("grammar topic", value))
    }
}

/// Sprite expression requested by the model for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Angry,
    Sad,
    Shy,
    Surprised,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Angry,
        Emotion::Sad,
        Emotion::Shy,
        Emotion::Surprised,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Angry => "angry",
            Emotion::Sad => "sad",
            Emotion::Shy => "shy",
            Emotion::Surprised => "surprised",
        }
    }

    /// Case-insensitive match; labels outside the fixed set yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_topic_accepts_key_english_and_label() {
        assert_eq!(GrammarTopic::parse("passive").unwrap(), GrammarTopic::Passive);
        assert_eq!(
            GrammarTopic::parse("Passive Form").unwrap(),
            GrammarTopic::Passive
        );
        assert_eq!(
            GrammarTopic::parse("giving-receiving").unwrap(),
            GrammarTopic::GivingReceiving
        );
        assert_eq!(
            GrammarTopic::parse("敬語 (Honorifics)").unwrap(),
            GrammarTopic::Keigo
        );
        assert!(GrammarTopic::parse("subjunctive").is_err());
    }

    #[test]
    fn emotion_parse_is_case_insensitive_and_closed() {
        assert_eq!(Emotion::parse("Happy"), Some(Emotion::Happy));
        assert_eq!(Emotion::parse(" shy "), Some(Emotion::Shy));
        assert_eq!(Emotion::parse("furious"), None);
    }

    #[test]
    fn mode_and_language_parse() {
        assert_eq!(ChatMode::parse("STUDY").unwrap(), ChatMode::Study);
        assert_eq!(ChatMode::parse("free-talk").unwrap(), ChatMode::FreeTalk);
        assert_eq!(Language::parse("EN").unwrap(), Language::En);

        let err = Language::parse("fr").unwrap_err();
        assert_eq!(err.to_string(), "unknown language: fr");
    }
}
