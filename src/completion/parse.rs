//! Parsing of model output into a [`Completion`]
//!
//! Parsing never fails. Output that cannot be read as the expected JSON
//! object degrades to an `Unknown` confidence label so that the resolver
//! classifies it as unanswered instead of aborting the question.

use super::Completion;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::{debug, warn};

const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct AnswerPayload {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    confidence: Option<String>,
    #[serde(default)]
    source_reference: Option<String>,
    #[serde(default)]
    is_answered: Option<bool>,
}

fn fenced_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").expect("static regex"))
}

fn outer_object() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex"))
}

/// Locates the JSON object inside a model response
///
/// Accepts bare objects, objects wrapped in markdown code fences and objects
/// surrounded by prose (outermost braces win).
pub fn extract_json_object(response: &str) -> Option<&str> {
    let trimmed = response.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    if let Some(block) = fenced_block()
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
    {
        let block = block.as_str().trim();
        if block.starts_with('{') && block.ends_with('}') {
            return Some(block);
        }
    }

    outer_object().find(trimmed).map(|m| m.as_str())
}

/// Converts a raw model response into a [`Completion`]
pub fn parse_completion(response: &str) -> Completion {
    let Some(json) = extract_json_object(response) else {
        debug!("No JSON object in response, using raw text");
        let raw = response.trim();
        let succeeded = !raw.to_lowercase().contains("not addressed");
        return Completion::new(raw, UNKNOWN_LABEL, succeeded);
    };

    match serde_json::from_str::<AnswerPayload>(json) {
        Ok(payload) => Completion {
            answer: payload.answer.unwrap_or_default().trim().to_string(),
            confidence_label: payload
                .confidence
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            source_reference: payload.source_reference.unwrap_or_default(),
            succeeded: payload.is_answered.unwrap_or(true),
        },
        Err(e) => {
            warn!("Failed to parse completion JSON: {}", e);
            Completion::new(response.trim(), UNKNOWN_LABEL, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_json() {
        let completion = parse_completion(
            r#"{"answer": "PostgreSQL 15", "confidence": "High", "source_reference": "Alice", "is_answered": true}"#,
        );

        assert_eq!(completion.answer, "PostgreSQL 15");
        assert_eq!(completion.confidence_label, "High");
        assert_eq!(completion.source_reference, "Alice");
        assert!(completion.succeeded);
    }

    #[test]
    fn test_markdown_fenced_json() {
        let response = "Here you go:\n```json\n{\"answer\": \"Kafka\", \"confidence\": \"Medium\", \"is_answered\": true}\n```";
        let completion = parse_completion(response);

        assert_eq!(completion.answer, "Kafka");
        assert_eq!(completion.confidence_label, "Medium");
        assert_eq!(completion.source_reference, "");
    }

    #[test]
    fn test_json_surrounded_by_prose() {
        let response = "Sure. {\"answer\": \"Nightly\", \"confidence\": \"Low\"} Hope that helps.";
        assert_eq!(
            extract_json_object(response),
            Some("{\"answer\": \"Nightly\", \"confidence\": \"Low\"}")
        );

        let completion = parse_completion(response);
        assert_eq!(completion.confidence_label, "Low");
        assert!(completion.succeeded);
    }

    #[test]
    fn test_missing_fields_default() {
        let completion = parse_completion("{}");
        assert_eq!(completion.answer, "");
        assert_eq!(completion.confidence_label, "Unknown");
    }

    #[test]
    fn test_plain_text_response() {
        let completion = parse_completion("The team uses Redis for caching.");
        assert_eq!(completion.answer, "The team uses Redis for caching.");
        assert_eq!(completion.confidence_label, "Unknown");
        assert!(completion.succeeded);
    }

    #[test]
    fn test_plain_text_not_addressed() {
        let completion = parse_completion("Not addressed in transcript.");
        assert!(!completion.succeeded);
    }

    #[test]
    fn test_malformed_json_degrades() {
        let completion = parse_completion("{\"answer\": \"half");
        assert_eq!(completion.confidence_label, "Unknown");

        let completion = parse_completion("{answer: unquoted}");
        assert_eq!(completion.confidence_label, "Unknown");
        assert!(!completion.succeeded);
    }
}
