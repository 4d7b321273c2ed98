// ABOUTME: JSON extraction for the prompt2pptx application
// ABOUTME: Pulls the POM document out of free-form model output and parses it

use crate::errors::{Prompt2PptxError, Result};
use crate::pom::PomNode;
use crate::validate;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// Fenced block whose info string is `json`, e.g. "```json\n[...]\n```"
static JSON_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[ \t]*(?i:json)\b[^\n]*\n(.*?)```").expect("valid JSON fence regex")
});

// Any fenced block, with or without an info string
static ANY_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[^\n]*\n(.*?)```").expect("valid fence regex"));

/// Locate the JSON text inside model output.
///
/// Tries, in order: a fenced block labelled `json`, any fenced block, and
/// finally the whole trimmed text when it starts with `[` or `{`.
pub fn extract_json_text(text: &str) -> Option<&str> {
    if let Some(captures) = JSON_FENCE.captures(text) {
        debug!("Found JSON-labelled fenced block");
        return captures.get(1).map(|m| m.as_str().trim());
    }

    if let Some(captures) = ANY_FENCE.captures(text) {
        debug!("Found unlabelled fenced block");
        return captures.get(1).map(|m| m.as_str().trim());
    }

    let trimmed = text.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        debug!("Treating whole output as bare JSON");
        return Some(trimmed);
    }

    None
}

/// Extract and parse the JSON value carried by model output.
pub fn parse_json(text: &str) -> Result<Value> {
    let json_text = extract_json_text(text).ok_or_else(|| {
        Prompt2PptxError::ParseError("no JSON content found in model output".to_string())
    })?;

    serde_json::from_str(json_text).map_err(|e| Prompt2PptxError::ParseError(e.to_string()))
}

/// Use the `slides` property when the document is wrapped in an object.
pub fn unwrap_slides(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("slides") => {
            map.remove("slides").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Extract, parse and validate a POM document from model output.
pub fn parse_document(text: &str) -> Result<Vec<PomNode>> {
    let value = unwrap_slides(parse_json(text)?);
    validate::validate_document(value)
}
