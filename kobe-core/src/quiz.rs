use serde::{Deserialize, Deserializer, Serialize};

/// A single multiple-choice question attached to a study-mode turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    #[serde(deserialize_with = "index_from_number")]
    pub correct_index: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub correct: bool,
    pub feedback: String,
}

impl Quiz {
    pub fn is_playable(&self) -> bool {
        !self.question.trim().is_empty()
            && !self.options.is_empty()
            && self.correct_index < self.options.len()
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }

    pub fn grade(&self, choice: usize) -> QuizOutcome {
        let correct = choice == self.correct_index;
        let feedback = if correct {
            format!("✅ {}", self.explanation)
        } else {
            format!(
                "❌ {}... {}",
                self.correct_option().unwrap_or_default(),
                self.explanation
            )
        };
        QuizOutcome { correct, feedback }
    }
}

// The provider schema types this field as a number, so `2.0` must be accepted as well as `2`.
fn index_from_number<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0 && raw <= u32::MAX as f64 {
        Ok(raw as usize)
    } else {
        Err(serde::de::Error::custom(format!(
            "correctIndex must be a non-negative integer, got {raw}"
        )))
    }
}
