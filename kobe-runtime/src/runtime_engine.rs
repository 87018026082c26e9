use std::sync::Arc;

use anyhow::Context;
use kobe_core::config::AppConfig;
use kobe_engine::engine::{ChatEngine, ChatSetup, EngineConfig};
use kobe_engine::traits::ChatTransport;

use crate::defaults::DEFAULT_PERSONA;
use crate::llm::GeminiChatTransport;
use crate::secrets::{SecretKey, get_secret};

/// Build a runnable chat engine from config.
///
/// The credential is not baked in; it travels with each `ChatSetup`.
pub fn build_engine_from_config(cfg: &AppConfig) -> ChatEngine {
    let transport: Arc<dyn ChatTransport> =
        Arc::new(GeminiChatTransport::new(cfg.provider_base_url.clone()));

    let engine_cfg = EngineConfig {
        scenes: cfg.scenes.clone(),
        ..Default::default()
    };

    ChatEngine::new(engine_cfg, transport)
}

/// Picks the API key: an explicit value wins, otherwise the OS keyring.
pub fn resolve_api_key(explicit: Option<String>) -> anyhow::Result<String> {
    if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
        return Ok(key);
    }
    Ok(get_secret(SecretKey::GeminiApiKey)?.unwrap_or_default())
}

/// Session setup for `persona_id` (or the last used persona) with the config's
/// mode, topic, goal, language and model.
pub fn chat_setup_from_config(
    cfg: &AppConfig,
    persona_id: Option<&str>,
    api_key: String,
) -> anyhow::Result<ChatSetup> {
    let id = persona_id
        .or(cfg.last_persona_id.as_deref())
        .unwrap_or(DEFAULT_PERSONA);
    let persona = cfg
        .persona(id)
        .cloned()
        .with_context(|| format!("unknown character: {id}"))?;

    Ok(ChatSetup {
        persona,
        mode: cfg.chat_mode,
        goal: cfg.learning_goal.clone(),
        topic: cfg.grammar_topic,
        language: cfg.language,
        api_key,
        model: cfg.model.clone(),
    })
}
