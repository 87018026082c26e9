use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonaId(pub String);

impl PersonaId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Static character data supplied by configuration. Read-only to the chat pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub display_name: String,
    pub system_prompt: String,

    // Outfit codes the model may pick from. The empty code (default outfit) is always allowed.
    #[serde(default)]
    pub outfits: Vec<String>,
}

impl Persona {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: PersonaId::new(id),
            display_name: display_name.into(),
            system_prompt: system_prompt.into(),
            outfits: vec![],
        }
    }

    pub fn with_outfits<I, S>(mut self, outfits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outfits = outfits.into_iter().map(Into::into).collect();
        self
    }

    pub fn allows_outfit(&self, code: &str) -> bool {
        code.is_empty() || self.outfits.iter().any(|o| o == code)
    }
}
