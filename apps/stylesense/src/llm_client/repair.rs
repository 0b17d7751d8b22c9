//! Response Repair — pulls the JSON object out of free-form model output.
//!
//! The model is asked for JSON only, but routinely wraps it in prose or code
//! fences, leaves trailing commas, or escapes single quotes. This is a
//! best-effort textual repair, not a grammar-aware recovery: only those two
//! malformations are normalized.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// User-facing text for any response that cannot be turned into structured data.
pub const MALFORMED_RESPONSE_MESSAGE: &str =
    "Stylist provided a malformed response. Please try again.";

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern is valid"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepairError {
    #[error("Format error: no data structure found in the response")]
    NoStructuredData,

    #[error("{MALFORMED_RESPONSE_MESSAGE}")]
    Malformed,
}

/// Extracts the candidate JSON object and parses it into a generic value.
pub fn extract_and_clean_json(text: &str) -> Result<Value, RepairError> {
    let candidate = normalize(bound_object(text)?);

    serde_json::from_str(&candidate).map_err(|e| {
        debug!("Repaired response still failed to parse: {e}");
        RepairError::Malformed
    })
}

/// Repairs the response and decodes it into `T`.
/// Explicit `null`s are dropped first so they fall back to the field default.
/// A value that still does not fit `T` is reported as malformed.
pub fn parse_repaired<T: DeserializeOwned>(text: &str) -> Result<T, RepairError> {
    let mut value = extract_and_clean_json(text)?;
    strip_nulls(&mut value);
    serde_json::from_value(value).map_err(|e| {
        debug!("Repaired response did not match the expected shape: {e}");
        RepairError::Malformed
    })
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(strip_nulls);
        }
        _ => {}
    }
}

/// Accepts a score as a JSON number or a numeric string such as `"92"` or
/// `"85%"`. Anything else reads as zero.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(Value),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(text) => {
            let digits = text.trim().trim_end_matches('%').trim();
            digits.parse().unwrap_or_else(|_| {
                debug!("Score {text:?} is not numeric; using 0");
                0.0
            })
        }
        Raw::Other(other) => {
            debug!("Score {other} is not numeric; using 0");
            0.0
        }
    })
}

/// Slices from the first `{` to the last `}` inclusive.
fn bound_object(text: &str) -> Result<&str, RepairError> {
    let start = text.find('{').ok_or(RepairError::NoStructuredData)?;
    let end = text.rfind('}').ok_or(RepairError::NoStructuredData)?;
    if end < start {
        return Err(RepairError::NoStructuredData);
    }
    Ok(&text[start..=end])
}

fn normalize(candidate: &str) -> String {
    TRAILING_COMMA
        .replace_all(candidate, "$1")
        .replace("\\'", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_extracts_object_surrounded_by_prose() {
        let text = "Here is your blueprint:\n```json\n{\"title\": \"Noir\", \"score\": 9}\n```\nEnjoy!";
        let value = extract_and_clean_json(text).unwrap();
        assert_eq!(value, json!({"title": "Noir", "score": 9}));
    }

    #[test]
    fn test_plain_object_is_unchanged() {
        let value = extract_and_clean_json(r#"{"a": [1, 2], "b": {"c": null}}"#).unwrap();
        assert_eq!(value, json!({"a": [1, 2], "b": {"c": null}}));
    }

    #[test]
    fn test_trailing_comma_before_brace_is_repaired() {
        let text = r#"{"title": "Linen Summer", "styleScore": 88,}"#;
        assert!(serde_json::from_str::<Value>(text).is_err());
        let value = extract_and_clean_json(text).unwrap();
        assert_eq!(value["styleScore"], 88);
    }

    #[test]
    fn test_trailing_comma_before_bracket_is_repaired() {
        let text = "{\"palette\": [\"#000000\", \"#FFFFFF\",\n  ],\n}";
        let value = extract_and_clean_json(text).unwrap();
        assert_eq!(value["palette"], json!(["#000000", "#FFFFFF"]));
    }

    #[test]
    fn test_escaped_single_quote_is_unescaped() {
        let text = r#"{"saloonAdvice": "Ask for a \'low taper\' fade"}"#;
        let value = extract_and_clean_json(text).unwrap();
        assert_eq!(value["saloonAdvice"], "Ask for a 'low taper' fade");
    }

    #[test]
    fn test_missing_open_brace_is_no_structured_data() {
        assert_eq!(
            extract_and_clean_json("sorry, I cannot help with that }"),
            Err(RepairError::NoStructuredData)
        );
    }

    #[test]
    fn test_missing_close_brace_is_no_structured_data() {
        assert_eq!(
            extract_and_clean_json("{ \"title\": \"cut off"),
            Err(RepairError::NoStructuredData)
        );
    }

    #[test]
    fn test_reversed_braces_are_no_structured_data() {
        assert_eq!(
            extract_and_clean_json("} nothing here {"),
            Err(RepairError::NoStructuredData)
        );
    }

    #[test]
    fn test_unparseable_candidate_is_malformed_with_user_message() {
        let err = extract_and_clean_json("{ title: unquoted }").unwrap_err();
        assert_eq!(err, RepairError::Malformed);
        assert_eq!(err.to_string(), MALFORMED_RESPONSE_MESSAGE);
    }

    #[test]
    fn test_parse_repaired_shape_mismatch_is_malformed() {
        #[derive(Debug, Deserialize)]
        struct Scored {
            #[allow(dead_code)]
            score: u32,
        }
        let err = parse_repaired::<Scored>(r#"{"score": "high"}"#).unwrap_err();
        assert_eq!(err, RepairError::Malformed);
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct Card {
        title: String,
        tags: Vec<String>,
        #[serde(deserialize_with = "lenient_number")]
        style_score: f64,
    }

    #[test]
    fn test_parse_repaired_treats_null_as_default() {
        let card: Card =
            parse_repaired(r#"{"title": null, "tags": ["bold", null], "styleScore": null}"#)
                .unwrap();
        assert_eq!(card.title, "");
        assert_eq!(card.tags, vec!["bold"]);
        assert_eq!(card.style_score, 0.0);
    }

    #[test]
    fn test_lenient_number_accepts_numeric_strings() {
        let card: Card = parse_repaired(r#"{"styleScore": "92"}"#).unwrap();
        assert_eq!(card.style_score, 92.0);
        let card: Card = parse_repaired(r#"{"styleScore": " 85% "}"#).unwrap();
        assert_eq!(card.style_score, 85.0);
        let card: Card = parse_repaired(r#"{"styleScore": 71.5}"#).unwrap();
        assert_eq!(card.style_score, 71.5);
        let card: Card = parse_repaired(r#"{"styleScore": "very high"}"#).unwrap();
        assert_eq!(card.style_score, 0.0);
    }
}
