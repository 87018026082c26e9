use kobe_core::transcript::TranscriptEntry;
use kobe_core::turn::DialoguePage;
use kobe_core::types::{ChatMode, Emotion, GrammarTopic, Language};
use kobe_engine::EngineError;
use kobe_runtime::defaults::default_app_config;
use kobe_runtime::runtime_engine::{build_engine_from_config, chat_setup_from_config};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ASUKA_REPLY: &str = r#"{"pages":[{"type":"speech","text":"こんにちは"}],"vocabulary":[{"word":"今日","reading":"きょう"}],"emotion":"happy","location":"classroom"}"#;

fn study_config(base_url: String) -> kobe_core::config::AppConfig {
    let mut cfg = default_app_config();
    cfg.provider_base_url = base_url;
    cfg.chat_mode = ChatMode::Study;
    cfg.grammar_topic = GrammarTopic::Passive;
    cfg.language = Language::Zh;
    cfg
}

#[tokio::test]
async fn fenced_reply_is_decoded_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("responseSchema"))
        .and(body_string_contains("STUDY Mode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": format!("```json\n{ASUKA_REPLY}\n```")}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = study_config(server.uri());
    let engine = build_engine_from_config(&cfg);
    let setup = chat_setup_from_config(&cfg, Some("asuka"), "test-key".into()).unwrap();

    let turn = engine.start_chat(setup, &[]).await.unwrap();
    assert_eq!(turn.pages, vec![DialoguePage::speech("こんにちは")]);
    assert_eq!(turn.vocabulary.len(), 1);
    assert_eq!(turn.emotion, Some(Emotion::Happy));
    assert_eq!(turn.location.as_deref(), Some("classroom"));
}

#[tokio::test]
async fn provider_error_on_later_turn_carries_its_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
        ))
        .mount(&server)
        .await;

    let cfg = study_config(server.uri());
    let engine = build_engine_from_config(&cfg);
    let setup = chat_setup_from_config(&cfg, Some("rei"), "bad-key".into()).unwrap();
    engine
        .start_chat(setup, &[TranscriptEntry::user("x", None)])
        .await
        .unwrap();

    match engine.send_message("hello").await {
        Err(EngineError::Transport(msg)) => {
            assert!(msg.contains("INVALID_ARGUMENT: API key not valid."), "{msg}");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn opening_provider_error_becomes_error_page() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string(
            r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#,
        ))
        .mount(&server)
        .await;

    let cfg = study_config(server.uri());
    let engine = build_engine_from_config(&cfg);
    let setup = chat_setup_from_config(&cfg, None, "test-key".into()).unwrap();

    let turn = engine.start_chat(setup, &[]).await.unwrap();
    assert_eq!(turn.pages.len(), 1);
    assert!(turn.pages[0].text.starts_with("Error: "));
    assert!(turn.pages[0].text.contains("UNAVAILABLE: The model is overloaded."));
    assert!(engine.has_session());
}
