//! Tolerant structured-text repair: parse, fix, reparse.
//!
//! The backend is asked for machine-parseable JSON only, but is not
//! guaranteed to deliver it. Direct parse is always attempted first, so
//! already-valid text passes through untouched; only on failure does the
//! fixed sequence of textual repairs run, followed by a reparse of the
//! substring between the first `{` and the last `}` to shed any leading
//! or trailing commentary.

use log::debug;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static TRAILING_COMMA_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*\}").unwrap());
static TRAILING_COMMA_ARRAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*\]").unwrap());
static ESCAPED_SINGLE_QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\'").unwrap());
static ESCAPED_DOUBLE_QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\\""#).unwrap());
static SINGLE_QUOTED_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*'([^']*)'").unwrap());
static BARE_WORD_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*([A-Za-z_][A-Za-z0-9_ -]*?)\s*([,}\]])").unwrap());

/// Parse structured text, repairing common model emission defects on
/// failure. Idempotent on valid input: the direct parse short-circuits.
pub fn parse_or_repair(text: &str) -> Result<Value, serde_json::Error> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    debug!("Attempting to repair malformed structured output");
    let fixed = apply_fixes(text);

    // shed commentary around the object the model was asked for
    let candidate = match (fixed.find('{'), fixed.rfind('}')) {
        (Some(start), Some(end)) if end > start => &fixed[start..=end],
        _ => fixed.as_str(),
    };

    serde_json::from_str(candidate)
}

fn apply_fixes(text: &str) -> String {
    let fixed = TRAILING_COMMA_OBJECT.replace_all(text, "}");
    let fixed = TRAILING_COMMA_ARRAY.replace_all(&fixed, "]");
    let fixed = ESCAPED_SINGLE_QUOTE.replace_all(&fixed, "'");
    let fixed = ESCAPED_DOUBLE_QUOTE.replace_all(&fixed, "\"");
    let fixed = SINGLE_QUOTED_VALUE.replace_all(&fixed, ": \"$1\"");
    let fixed = BARE_WORD_VALUE.replace_all(&fixed, |caps: &regex::Captures| {
        let word = caps[1].trim();
        if matches!(word, "true" | "false" | "null") {
            format!(": {}{}", word, &caps[2])
        } else {
            format!(": \"{}\"{}", word, &caps[2])
        }
    });
    fixed.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_input_parses_unchanged() {
        let text = r#"{"safety": "caution", "score": 3, "tags": ["a", "b"]}"#;
        let direct: Value = serde_json::from_str(text).unwrap();
        let repaired = parse_or_repair(text).unwrap();
        assert_eq!(direct, repaired);
    }

    #[test]
    fn test_trailing_commas_removed() {
        let text = r#"{"items": ["a", "b",], "score": 3,}"#;
        let value = parse_or_repair(text).unwrap();
        assert_eq!(value, json!({"items": ["a", "b"], "score": 3}));
    }

    #[test]
    fn test_single_quoted_values_converted() {
        let text = r#"{"safety": 'caution'}"#;
        let value = parse_or_repair(text).unwrap();
        assert_eq!(value["safety"], "caution");
    }

    #[test]
    fn test_bare_word_values_quoted() {
        let text = r#"{"safety": caution, "ok": true}"#;
        let value = parse_or_repair(text).unwrap();
        assert_eq!(value["safety"], "caution");
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_commentary_stripped() {
        let text = "Here is the analysis you asked for:\n{\"score\": 4}\nLet me know!";
        let value = parse_or_repair(text).unwrap();
        assert_eq!(value["score"], 4);
    }

    #[test]
    fn test_unrepairable_text_fails() {
        assert!(parse_or_repair("no structure here at all").is_err());
    }
}
