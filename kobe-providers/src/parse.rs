use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Extracts the text of the first candidate. A reply without any text (e.g. blocked
/// by safety filters) yields an empty string; interpreting that is up to the caller.
pub fn parse_gemini_generate_content(body: &[u8]) -> anyhow::Result<String> {
    let resp: GenerateContentResponse =
        serde_json::from_slice(body).context("decode generateContent JSON")?;

    let text = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    Ok(text)
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Human-readable message for a non-2xx provider reply.
pub fn describe_gemini_error(status: u16, body: &[u8]) -> String {
    let detail = match serde_json::from_slice::<ErrorWrapper>(body) {
        Ok(wrapper) => {
            let msg = wrapper
                .error
                .message
                .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());
            match wrapper.error.status.filter(|s| !s.is_empty()) {
                Some(s) => format!("{s}: {msg}"),
                None => msg,
            }
        }
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    };

    if detail.is_empty() {
        format!("provider request failed: status={status}")
    } else {
        format!("provider request failed: status={status} {detail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let body = br#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"pages\":"},{"text":"[]}"}]}}]}"#;
        assert_eq!(parse_gemini_generate_content(body).unwrap(), r#"{"pages":[]}"#);
    }

    #[test]
    fn missing_text_is_empty() {
        let body = br#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert_eq!(parse_gemini_generate_content(body).unwrap(), "");
        assert_eq!(parse_gemini_generate_content(b"{}").unwrap(), "");
    }

    #[test]
    fn invalid_json_errors() {
        assert!(parse_gemini_generate_content(b"<html>").is_err());
    }

    #[test]
    fn describes_structured_error() {
        let body = br#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            describe_gemini_error(400, body),
            "provider request failed: status=400 INVALID_ARGUMENT: API key not valid."
        );
        assert_eq!(
            describe_gemini_error(502, b""),
            "provider request failed: status=502"
        );
    }
}
