//! Boilerplate stripping for scraped ingredient blocks.
//!
//! Navigation, legal and marketing text reliably follows the ingredient
//! list in DOM/text order, so truncating at the first stop phrase is a
//! deliberate simplification rather than a full classifier.

use html_escape::decode_html_entities;

use crate::normalize;

/// Phrases that mark the start of non-ingredient boilerplate.
const STOP_KEYWORDS: &[&str] = &[
    "product type",
    "company",
    "shop",
    "medicine",
    "hair care",
    "baby care",
    "cosmetics",
    "contact",
    "terms",
    "refund",
    "policy",
    "track",
    "copyright",
    "cart",
    "mailing list",
];

/// Truncate at the first occurrence of any stop keyword, preserving all
/// text before it.
pub fn truncate_at_stop_phrase(raw: &str) -> String {
    let lower = raw.to_lowercase();
    // lowercasing can shift byte offsets for some scripts; clamp the
    // cutoff back onto a char boundary of the original string
    let mut cutoff = STOP_KEYWORDS
        .iter()
        .filter_map(|keyword| lower.find(keyword))
        .min()
        .unwrap_or(raw.len())
        .min(raw.len());
    while cutoff > 0 && !raw.is_char_boundary(cutoff) {
        cutoff -= 1;
    }
    raw[..cutoff].trim().to_string()
}

/// Full cleanup pass over a raw scraped block: decode HTML entities,
/// truncate boilerplate, collapse whitespace.
pub fn clean_ingredient_block(raw: &str) -> String {
    let decoded = decode_html_entities(raw);
    let truncated = truncate_at_stop_phrase(&decoded);
    normalize::collapse_whitespace(&truncated)
}
