//! Shared string-cleanup utilities used by both extraction paths.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());
static DIGITS_PERCENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+%?").unwrap());
static BULLETS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[•\*▪➢–—]").unwrap());
static PUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[:.,]").unwrap());
static SIZE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*(?:ml|fl\.?\s?oz|floz|g|oz)").unwrap());

/// Collapse runs of whitespace (including non-breaking spaces left over
/// from entity decoding) into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Capitalize the first letter of every word, lowercase the rest.
/// Word boundaries are any non-alphabetic character, so hyphenated
/// names come out as "Cocamidopropyl-Betaine".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Remove duplicates case-insensitively while preserving first-seen order.
pub fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect()
}

/// Strip parenthetical asides. Preservative notes are kept since they
/// carry ingredient information rather than marketing copy.
pub fn strip_parentheticals(text: &str) -> String {
    PARENTHETICAL
        .replace_all(text, |caps: &regex::Captures| {
            let inner = &caps[0];
            if inner.to_lowercase().contains("preservative") {
                inner.to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Strip digits and percentages.
pub fn strip_digits(text: &str) -> String {
    DIGITS_PERCENT.replace_all(text, "").into_owned()
}

/// Convert bullet glyphs and dash separators to commas.
pub fn bullets_to_commas(text: &str) -> String {
    BULLETS.replace_all(text, ",").into_owned()
}

/// Strip residual punctuation left over after splitting.
pub fn strip_punctuation(text: &str) -> String {
    PUNCT.replace_all(text, "").into_owned()
}

/// Strip leftover size tokens like "50ml" or "1.7 fl oz".
pub fn strip_size_tokens(text: &str) -> String {
    SIZE_TOKEN.replace_all(text, "").into_owned()
}
