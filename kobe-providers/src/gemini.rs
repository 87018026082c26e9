use crate::request::HttpRequest;
use serde_json::{Value, json};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone, PartialEq, Eq)]
pub struct GeminiChatConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for GeminiChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiChatConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRole {
    User,
    Model,
}

impl ContentRole {
    fn as_str(self) -> &'static str {
        match self {
            ContentRole::User => "user",
            ContentRole::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub role: ContentRole,
    pub text: String,
}

/// Everything that goes into one `generateContent` call besides auth and model.
#[derive(Debug, Clone, Default)]
pub struct GenerateContent<'a> {
    pub system_instruction: Option<&'a str>,
    pub response_schema: Option<&'a Value>,
    pub temperature: Option<f32>,
    pub contents: &'a [Content],
}

pub fn build_generate_content_request(
    cfg: &GeminiChatConfig,
    content: &GenerateContent<'_>,
) -> HttpRequest {
    let url = join_url(
        &cfg.base_url,
        &format!("/models/{}:generateContent", cfg.model),
    );

    let mut payload = json!({
        "contents": content
            .contents
            .iter()
            .map(|c| json!({"role": c.role.as_str(), "parts": [{"text": c.text}]}))
            .collect::<Vec<_>>(),
    });

    if let Some(system) = content.system_instruction.filter(|s| !s.trim().is_empty()) {
        payload["systemInstruction"] = json!({"parts": [{"text": system}]});
    }

    let mut generation = serde_json::Map::new();
    if let Some(t) = content.temperature {
        generation.insert("temperature".into(), json!(t));
    }
    if let Some(schema) = content.response_schema {
        generation.insert("responseMimeType".into(), json!("application/json"));
        generation.insert("responseSchema".into(), schema.clone());
    }
    if !generation.is_empty() {
        payload["generationConfig"] = Value::Object(generation);
    }

    HttpRequest::post_json(url, &payload).with_header("x-goog-api-key", cfg.api_key.clone())
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
