use crate::quiz::Quiz;
use crate::turn::{DialoguePage, PageKind, TurnResponse, WordReading};
use crate::types::Emotion;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

/// Page used when the reply parsed but carried no usable `pages`.
pub const MISSING_PAGES_FILLER: &str = "（静かに頷く）";

/// Page used when the reply was not valid JSON at all.
pub const UNPARSEABLE_FILLER: &str = "...";

fn code_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // ```json\n{...}\n```  or  ```{...}```  (language tag optional). A reply cut off
        // before its closing fence still loses the opening one.
        Regex::new(r"(?s)\A```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)\r?\n?(?:```)?\z")
            .expect("valid code fence regex")
    })
}

/// Removes a surrounding triple-backtick fence, with or without a language tag.
/// A missing closing fence is tolerated.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match code_fence_re().captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => trimmed,
    }
}

#[derive(Debug, Deserialize)]
struct WirePage {
    #[serde(rename = "type")]
    kind: String,
    text: String,
}

// Every field is kept raw and decoded on its own, so one malformed field never
// costs the turn its dialogue.
#[derive(Debug, Deserialize)]
struct WireTurn {
    #[serde(default)]
    pages: Option<Value>,
    #[serde(default)]
    vocabulary: Option<Value>,
    #[serde(default)]
    quiz: Option<Value>,
    #[serde(default)]
    emotion: Option<Value>,
    #[serde(default)]
    outfit: Option<Value>,
    #[serde(default)]
    location: Option<Value>,
}

/// Converts raw model output into a [`TurnResponse`]. Never fails.
///
/// Only a reply that is not a JSON object falls back wholesale. Inside an object each
/// field is decoded independently: a missing, empty or malformed `pages` value becomes
/// a single filler page, and a malformed optional field is simply absent.
pub fn decode_turn(raw: &str) -> TurnResponse {
    let body = strip_code_fence(raw);
    // The provider sometimes returns no text at all; treat that like an empty object.
    let body = if body.is_empty() { "{}" } else { body };

    let wire = match parse_wire(body) {
        Ok(w) => w,
        Err(e) => {
            log::warn!("failed to decode model reply as turn JSON: {e}");
            log::debug!("raw model reply: {raw}");
            return unparseable_fallback();
        }
    };

    let pages = match wire.pages.and_then(decode_pages) {
        Some(pages) => pages,
        None => {
            log::warn!("model reply had no usable pages; substituting filler");
            vec![DialoguePage::speech(MISSING_PAGES_FILLER)]
        }
    };

    TurnResponse {
        pages,
        vocabulary: wire.vocabulary.map(decode_vocabulary).unwrap_or_default(),
        quiz: wire.quiz.and_then(decode_quiz),
        emotion: wire.emotion.as_ref().and_then(Value::as_str).and_then(Emotion::parse),
        outfit: wire.outfit.and_then(into_string),
        location: wire
            .location
            .and_then(into_string)
            .filter(|l| !l.trim().is_empty()),
    }
}

fn parse_wire(body: &str) -> serde_json::Result<WireTurn> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom("turn reply must be a JSON object"));
    }
    WireTurn::deserialize(value)
}

fn into_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

// Malformed entries are dropped one by one; a non-array yields nothing.
fn decode_vocabulary(value: Value) -> Vec<WordReading> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return vec![],
        _ => {
            log::warn!("model reply vocabulary was not a list; ignoring it");
            return vec![];
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<WordReading>(item) {
            Ok(w) => Some(w),
            Err(e) => {
                log::debug!("dropping malformed vocabulary entry: {e}");
                None
            }
        })
        .collect()
}

fn decode_quiz(value: Value) -> Option<Quiz> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value::<Quiz>(value) {
        Ok(quiz) if quiz.is_playable() => Some(quiz),
        Ok(_) => {
            log::warn!("model reply quiz is not playable; dropping it");
            None
        }
        Err(e) => {
            log::warn!("model reply quiz is malformed; dropping it: {e}");
            None
        }
    }
}

fn decode_pages(value: Value) -> Option<Vec<DialoguePage>> {
    let pages: Vec<WirePage> = serde_json::from_value(value).ok()?;
    if pages.is_empty() {
        return None;
    }

    Some(
        pages
            .into_iter()
            .map(|p| DialoguePage::new(PageKind::from_tag(&p.kind), p.text))
            .collect(),
    )
}

fn unparseable_fallback() -> TurnResponse {
    TurnResponse {
        pages: vec![DialoguePage::speech(UNPARSEABLE_FILLER)],
        vocabulary: vec![],
        quiz: None,
        emotion: Some(Emotion::Neutral),
        outfit: None,
        location: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unparseable_fallback(r: &TurnResponse) {
        assert_eq!(r.pages, vec![DialoguePage::speech(UNPARSEABLE_FILLER)]);
        assert!(r.vocabulary.is_empty());
        assert_eq!(r.emotion, Some(Emotion::Neutral));
        assert!(r.quiz.is_none());
        assert!(r.outfit.is_none());
        assert!(r.location.is_none());
    }

    #[test]
    fn well_formed_pages_are_kept_in_order() {
        let raw = r#"{"pages":[
            {"type":"narration","text":"放課後の教室。"},
            {"type":"action","text":"（机を叩く）"},
            {"type":"speech","text":"遅いわよ！"}
        ],"vocabulary":[]}"#;
        let r = decode_turn(raw);
        assert_eq!(
            r.pages,
            vec![
                DialoguePage::new(PageKind::Narration, "放課後の教室。"),
                DialoguePage::new(PageKind::Action, "（机を叩く）"),
                DialoguePage::speech("遅いわよ！"),
            ]
        );
    }

    #[test]
    fn fenced_and_unfenced_decode_identically() {
        let plain = r#"{"pages":[{"type":"speech","text":"やあ"}],"vocabulary":[{"word":"今日","reading":"きょう"}],"emotion":"happy"}"#;
        let tagged = format!("```json\n{plain}\n```");
        let untagged = format!("  ```\n{plain}\n```  ");
        let inline = format!("```{plain}```");

        let expected = decode_turn(plain);
        assert_eq!(decode_turn(&tagged), expected);
        assert_eq!(decode_turn(&untagged), expected);
        assert_eq!(decode_turn(&inline), expected);
    }

    #[test]
    fn malformed_json_yields_fixed_fallback() {
        assert_unparseable_fallback(&decode_turn("not json at all"));
        assert_unparseable_fallback(&decode_turn(r#"{"pages":[{"type":"speech","text":"途中"#));
        assert_unparseable_fallback(&decode_turn("[1, 2, 3]"));
    }

    #[test]
    fn malformed_optional_fields_keep_the_dialogue() {
        let speech = vec![DialoguePage::speech("受身形を練習しよう")];
        for raw in [
            r#"{"pages":[{"type":"speech","text":"受身形を練習しよう"}],"vocabulary":[],"quiz":{}}"#,
            r#"{"pages":[{"type":"speech","text":"受身形を練習しよう"}],"vocabulary":"oops"}"#,
            r#"{"pages":[{"type":"speech","text":"受身形を練習しよう"}],"emotion":3,"location":["park"],"outfit":false}"#,
            r#"{"pages":[{"type":"speech","text":"受身形を練習しよう"}],
                "quiz":{"question":"q","options":["a","b"],"correctIndex":-1,"explanation":"e"}}"#,
        ] {
            let r = decode_turn(raw);
            assert_eq!(r.pages, speech, "{raw}");
            assert!(r.vocabulary.is_empty());
            assert!(r.quiz.is_none());
            assert!(r.emotion.is_none());
            assert!(r.outfit.is_none());
            assert!(r.location.is_none());
        }
    }

    #[test]
    fn malformed_vocabulary_entries_are_dropped_individually() {
        let r = decode_turn(
            r#"{"pages":[{"type":"speech","text":"猫がいる"}],
                "vocabulary":[{"word":"猫"},{"word":"今日","reading":"きょう"},"犬"],
                "emotion":"happy"}"#,
        );
        assert_eq!(r.pages, vec![DialoguePage::speech("猫がいる")]);
        assert_eq!(r.vocabulary.len(), 1);
        assert_eq!(r.vocabulary[0].word, "今日");
        assert_eq!(r.emotion, Some(Emotion::Happy));
    }

    #[test]
    fn unterminated_fence_is_still_stripped() {
        let plain = r#"{"pages":[{"type":"speech","text":"途中まで"}]}"#;
        assert_eq!(strip_code_fence(&format!("```json\n{plain}")), plain);
        assert_eq!(strip_code_fence(&format!("```json\n{plain}\n")), plain);
        assert_eq!(
            decode_turn(&format!("```json\n{plain}")).pages,
            vec![DialoguePage::speech("途中まで")]
        );
    }

    #[test]
    fn missing_or_bad_pages_are_substituted_and_other_fields_kept() {
        for raw in [
            r#"{"vocabulary":[{"word":"猫","reading":"ねこ"}],"emotion":"sad","location":"park"}"#,
            r#"{"pages":"hello","vocabulary":[{"word":"猫","reading":"ねこ"}],"emotion":"sad","location":"park"}"#,
            r#"{"pages":[{"text":"no type"}],"vocabulary":[{"word":"猫","reading":"ねこ"}],"emotion":"sad","location":"park"}"#,
        ] {
            let r = decode_turn(raw);
            assert_eq!(r.pages, vec![DialoguePage::speech(MISSING_PAGES_FILLER)]);
            assert_eq!(r.vocabulary.len(), 1);
            assert_eq!(r.vocabulary[0].reading, "ねこ");
            assert_eq!(r.emotion, Some(Emotion::Sad));
            assert_eq!(r.location.as_deref(), Some("park"));
        }
    }

    #[test]
    fn fenced_empty_pages_yield_single_filler() {
        let r = decode_turn("```json\n{\"pages\":[],\"vocabulary\":[]}\n```");
        assert_eq!(r.pages, vec![DialoguePage::speech(MISSING_PAGES_FILLER)]);
        assert!(r.vocabulary.is_empty());
    }

    #[test]
    fn empty_reply_is_treated_as_empty_object() {
        let r = decode_turn("   ");
        assert_eq!(r.pages, vec![DialoguePage::speech(MISSING_PAGES_FILLER)]);
        assert!(r.emotion.is_none());
    }

    #[test]
    fn normalizes_labels_and_drops_unplayable_quiz() {
        let raw = r#"{
            "pages":[{"type":"Monologue","text":"……"}],
            "vocabulary":null,
            "emotion":"ecstatic",
            "quiz":{"question":"?","options":["a","b"],"correctIndex":3,"explanation":"e"},
            "outfit":""
        }"#;
        let r = decode_turn(raw);
        assert_eq!(r.pages[0].kind, PageKind::Speech);
        assert!(r.vocabulary.is_empty());
        assert!(r.emotion.is_none());
        assert!(r.quiz.is_none());
        assert_eq!(r.outfit.as_deref(), Some(""));
    }

    #[test]
    fn null_quiz_is_absent_and_valid_quiz_is_kept() {
        let free = decode_turn(r#"{"pages":[{"type":"speech","text":"a"}],"vocabulary":[],"quiz":null}"#);
        assert!(free.quiz.is_none());

        let study = decode_turn(
            r#"{"pages":[{"type":"speech","text":"a"}],"vocabulary":[],
                "quiz":{"question":"q","options":["1","2","3","4"],"correctIndex":2,"explanation":"e"}}"#,
        );
        assert_eq!(study.quiz.unwrap().correct_index, 2);
    }
}
