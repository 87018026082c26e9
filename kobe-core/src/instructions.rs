use crate::persona::Persona;
use crate::types::{ChatMode, Emotion, GrammarTopic, Language};
use serde_json::{Value, json};

pub const TARGET_LEVEL: &str = "JLPT N3";
pub const MAX_PAGE_CHARS: usize = 80;

#[derive(Debug, Clone)]
pub struct InstructionInput<'a> {
    pub persona: &'a Persona,
    pub mode: ChatMode,
    pub goal: &'a str,
    pub topic: GrammarTopic,
    pub language: Language,
    // Shared scene identifiers the model may switch `location` to.
    pub scenes: &'a [String],
}

/// Builds the system instruction that configures a new chat session.
///
/// Pure: the same input always produces the same text.
pub fn build_system_instruction(input: &InstructionInput<'_>) -> String {
    let feedback_lang = input.language.display_name();
    let mode_label = match input.mode {
        ChatMode::Study => "STUDY Mode",
        ChatMode::FreeTalk => "FREE_TALK Mode",
    };

    let quiz_rule = match input.mode {
        ChatMode::Study => format!(
            "Quiz (quiz): Include exactly 1 multiple-choice question (4 options) related to the grammar topic \"{}\". The explanation must be in {}.",
            input.topic.label(),
            feedback_lang
        ),
        ChatMode::FreeTalk => {
            "Quiz (quiz): Not needed for FREE_TALK. Set the quiz field to null.".to_string()
        }
    };

    let emotions = Emotion::ALL
        .iter()
        .map(|e| format!("\"{}\"", e.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let outfits = if input.persona.outfits.is_empty() {
        "\"\" (default only)".to_string()
    } else {
        let codes = input
            .persona
            .outfits
            .iter()
            .map(|o| format!("\"{o}\""))
            .collect::<Vec<_>>()
            .join(", ");
        format!("\"\" (default), {codes}")
    };

    let scenes = input
        .scenes
        .iter()
        .map(|s| format!("\"{s}\""))
        .collect::<Vec<_>>()
        .join(", ");

    let mut context = format!(
        "【IMPORTANT: Research Level】\n\
Target Level: {TARGET_LEVEL} Fixed.\n\
Vocabulary: Use {TARGET_LEVEL} level Kanji and vocabulary mainly.\n\
Grammar Focus: {topic}\n\
Current Mode: {mode_label}\n\
User Language: {feedback_lang} (Use this language for explanations/feedback)\n",
        topic = input.topic.label(),
    );

    let goal = input.goal.trim();
    if !goal.is_empty() {
        context.push_str(&format!("Learning Goal: {goal}\n"));
    }

    context.push_str(&format!(
        "\n【Output Format】\n\
You are a visual novel character. Respond with strict JSON only, matching the response schema. Do not wrap it in code fences.\n\n\
1. Pages: Max {MAX_PAGE_CHARS} chars per 'text' page. 3-5 pages total. Put narration, action and speech on separate pages (type \"narration\", \"action\" or \"speech\"); never inline actions inside speech.\n\
2. Furigana: DO NOT include reading in parentheses inside text (e.g. \"漢字(かんじ)\" is BANNED).\n\
3. Vocabulary List: Extract {TARGET_LEVEL} level words from the text with their readings.\n\
4. Emotion: Choose ONE keyword exactly: {emotions}.\n\
5. {quiz_rule}\n\
6. Scene (location): Change only when the story moves somewhere else. Use one of: {scenes}.\n\
7. Outfit (outfit): Change only when the story implies it. Use one of: {outfits}.\n"
    ));

    format!("{}\n{}", input.persona.system_prompt.trim_end(), context)
}

/// Structured-output schema sent with every request of a session.
pub fn response_schema() -> Value {
    let emotions: Vec<&str> = Emotion::ALL.iter().map(|e| e.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "pages": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": {
                            "type": "STRING",
                            "enum": ["speech", "action", "narration"],
                            "description": "'speech', 'action' or 'narration'"
                        },
                        "text": { "type": "STRING", "description": "Dialogue content" }
                    },
                    "required": ["type", "text"]
                }
            },
            "vocabulary": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "word": { "type": "STRING" },
                        "reading": { "type": "STRING" }
                    },
                    "required": ["word", "reading"]
                }
            },
            "emotion": {
                "type": "STRING",
                "enum": emotions,
            },
            "quiz": {
                "type": "OBJECT",
                "nullable": true,
                "properties": {
                    "question": { "type": "STRING" },
                    "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "correctIndex": { "type": "INTEGER" },
                    "explanation": { "type": "STRING" }
                },
                "required": ["question", "options", "correctIndex", "explanation"]
            },
            "outfit": { "type": "STRING", "description": "Outfit code, empty for default" },
            "location": { "type": "STRING", "description": "Scene identifier" }
        },
        "required": ["pages", "vocabulary"]
    })
}

/// Prompt for the one-shot translation helper.
pub fn translation_prompt(text: &str, target: Language) -> String {
    format!(
        "Translate the following Japanese text to {}. Only provide the translation text: \"{}\"",
        target.display_name(),
        text
    )
}
