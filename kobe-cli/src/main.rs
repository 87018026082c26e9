use anyhow::Context;
use kobe_core::persona::Persona;
use kobe_core::quiz::Quiz;
use kobe_core::transcript::{Role, TranscriptEntry};
use kobe_core::turn::{PageKind, TurnRequest, TurnResponse};
use kobe_core::types::{ChatMode, GrammarTopic, Language};
use kobe_engine::EngineError;
use kobe_runtime::ConfigStore;
use kobe_runtime::defaults::default_app_config;
use kobe_runtime::runtime_engine::{
    build_engine_from_config, chat_setup_from_config, resolve_api_key,
};
use kobe_runtime::secrets::{SecretKey, delete_secret, set_secret};
use tokio::io::{AsyncBufReadExt, BufReader};

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn render_turn(persona: &Persona, turn: &TurnResponse) -> String {
    let speaker = &persona.display_name;
    let mut out = String::new();
    for page in &turn.pages {
        let line = match page.kind {
            PageKind::Speech => format!("{speaker}: {}", page.text),
            PageKind::Action => format!("  *{}*", page.text),
            PageKind::Narration => format!("  {}", page.text),
        };
        out.push_str(&line);
        out.push('\n');
    }
    if !turn.vocabulary.is_empty() {
        let words: Vec<String> = turn
            .vocabulary
            .iter()
            .map(|w| format!("{}【{}】", w.word, w.reading))
            .collect();
        out.push_str(&format!("  vocab: {}\n", words.join(" ")));
    }
    if let Some(emotion) = turn.emotion {
        out.push_str(&format!("  [emotion: {}]", emotion.as_str()));
    }
    if let Some(outfit) = &turn.outfit {
        let label = match outfit.as_str() {
            "" => "default".to_string(),
            code if persona.allows_outfit(code) => code.to_string(),
            code => format!("{code} (not in wardrobe)"),
        };
        out.push_str(&format!("  [outfit: {label}]"));
    }
    if let Some(location) = &turn.location {
        out.push_str(&format!("  [location: {location}]"));
    }
    if turn.emotion.is_some() || turn.outfit.is_some() || turn.location.is_some() {
        out.push('\n');
    }
    out
}

fn render_quiz(quiz: &Quiz) -> String {
    let mut out = format!("  QUIZ: {}\n", quiz.question);
    for (i, option) in quiz.options.iter().enumerate() {
        out.push_str(&format!("    {}) {option}\n", i + 1));
    }
    out.push_str("  (answer with the option number)\n");
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let store = env("KOBE_CONFIG").map(ConfigStore::at_path);
    let mut cfg = match &store {
        Some(store) => store.load_or_default()?,
        None => default_app_config(),
    };

    if let Some(model) = env("GEMINI_MODEL") {
        cfg.model = model;
    }
    if let Some(url) = env("GEMINI_BASE_URL") {
        cfg.provider_base_url = url;
    }
    if let Some(mode) = env("KOBE_MODE") {
        cfg.chat_mode = ChatMode::parse(&mode)?;
    }
    if let Some(topic) = env("KOBE_TOPIC") {
        cfg.grammar_topic = GrammarTopic::parse(&topic)?;
    }
    if let Some(lang) = env("KOBE_LANG") {
        cfg.language = Language::parse(&lang)?;
    }
    if let Some(goal) = env("KOBE_GOAL") {
        cfg.learning_goal = goal;
    }

    log::debug!(
        "config: model={} base_url={} personas={} scenes={}",
        cfg.model,
        cfg.provider_base_url,
        cfg.personas.len(),
        cfg.scenes.len()
    );

    let mut api_key = resolve_api_key(env("GEMINI_API_KEY")).context("read API key")?;
    let character = env("KOBE_CHARACTER");
    let setup = chat_setup_from_config(&cfg, character.as_deref(), api_key.clone())?;
    let persona = setup.persona.clone();
    let speaker = persona.display_name.clone();
    let player = Some(cfg.player_name.clone()).filter(|n| !n.is_empty());

    println!(
        "== {speaker} | {} | {} | model={} ==",
        setup.mode.label(),
        setup.topic.label(),
        setup.model
    );
    println!("Commands: /translate <text>, /key <api key>, /forget-key, /history, /quit");

    if let Some(store) = &store {
        let id = persona.id.as_str().to_string();
        store
            .update(|c| c.last_persona_id = Some(id))
            .context("remember character")?;
    }

    let engine = build_engine_from_config(&cfg);
    let mut transcript: Vec<TranscriptEntry> = vec![];

    let opening = engine.start_chat(setup, &[]).await?;
    print!("{}", render_turn(&persona, &opening));
    let mut pending_quiz = opening.quiz.clone();
    transcript.push(TranscriptEntry::model(opening, Some(speaker.clone())));
    if let Some(quiz) = &pending_quiz {
        print!("{}", render_quiz(quiz));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "/quit" {
            break;
        }
        if line == "/history" {
            for entry in &transcript {
                let who = match entry.role {
                    Role::User => entry.sender_name.as_deref().unwrap_or("You"),
                    Role::Model => entry.sender_name.as_deref().unwrap_or(&speaker),
                };
                println!("  {who}: {}", entry.text);
            }
            continue;
        }
        if let Some(key) = line.strip_prefix("/key ") {
            let key = key.trim();
            if key.is_empty() {
                println!("  usage: /key <api key>");
                continue;
            }
            set_secret(SecretKey::GeminiApiKey, key).context("store API key")?;
            if let Some(store) = &store {
                store.update(|c| c.api_key_present = true)?;
            }
            api_key = key.to_string();
            println!("  API key saved. It applies to translations now and to the next chat.");
            continue;
        }
        if line == "/forget-key" {
            delete_secret(SecretKey::GeminiApiKey).context("remove API key")?;
            if let Some(store) = &store {
                store.update(|c| c.api_key_present = false)?;
            }
            println!("  API key removed from the keyring.");
            continue;
        }
        if let Some(text) = line.strip_prefix("/translate") {
            match engine
                .translate(text.trim(), cfg.language, &api_key, &cfg.model)
                .await
            {
                Ok(translation) => println!("  => {translation}"),
                Err(e) => println!("  translation error: {e}"),
            }
            continue;
        }

        let request = match pending_quiz.as_ref().zip(line.parse::<usize>().ok()) {
            Some((quiz, n)) if (1..=quiz.options.len()).contains(&n) => {
                let outcome = quiz.grade(n - 1);
                println!("  {}", outcome.feedback);
                TurnRequest::QuizFeedback {
                    correct: outcome.correct,
                }
            }
            _ => {
                transcript.push(TranscriptEntry::user(line, player.clone()));
                TurnRequest::user(line)
            }
        };
        pending_quiz = None;

        match engine.send_turn(request).await {
            Ok(turn) => {
                print!("{}", render_turn(&persona, &turn));
                if let Some(quiz) = &turn.quiz {
                    print!("{}", render_quiz(quiz));
                }
                pending_quiz = turn.quiz.clone();
                transcript.push(TranscriptEntry::model(turn, Some(speaker.clone())));
            }
            Err(EngineError::SessionLost) => {
                println!("  {}", EngineError::SessionLost);
                break;
            }
            Err(e) => println!("  Error: {e}"),
        }
    }

    engine.end_chat();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kobe_core::turn::DialoguePage;
    use kobe_core::types::Emotion;

    fn asuka() -> Persona {
        Persona::new("asuka", "Asuka", "ROLE: Asuka").with_outfits(["casual", "maid"])
    }

    #[test]
    fn renders_pages_by_kind() {
        let turn = TurnResponse {
            pages: vec![
                DialoguePage::new(PageKind::Action, "（机を叩く）"),
                DialoguePage::speech("遅いわよ！"),
            ],
            emotion: Some(Emotion::Angry),
            ..TurnResponse::empty()
        };
        let out = render_turn(&asuka(), &turn);
        assert!(out.contains("  *（机を叩く）*\n"));
        assert!(out.contains("Asuka: 遅いわよ！\n"));
        assert!(out.contains("[emotion: angry]"));
    }

    #[test]
    fn flags_outfits_outside_the_wardrobe() {
        let mut turn = TurnResponse::empty();
        let persona = asuka();

        turn.outfit = Some(String::new());
        assert!(render_turn(&persona, &turn).contains("[outfit: default]"));

        turn.outfit = Some("maid".into());
        assert!(render_turn(&persona, &turn).contains("[outfit: maid]"));

        turn.outfit = Some("prince".into());
        assert!(render_turn(&persona, &turn).contains("[outfit: prince (not in wardrobe)]"));
    }
}
