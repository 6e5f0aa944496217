//! Ordered extraction strategies over a parsed product page.
//!
//! Each strategy shares one interface: given the document, return a text
//! block or nothing. They are tried in precision order — explicit
//! structural and semantic markers before the generic full-text regex,
//! which has the highest false-positive rate. Acceptance at every level is
//! gated by the minimum-content heuristic: ingredient lists are
//! comma-delimited, prose is not a reliable proxy otherwise.

use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;

use crate::normalize;

/// A strategy inspects the document and yields a candidate text block.
pub type Strategy = fn(&Html) -> Option<String>;

/// Strategies in precision order, names used for trace logging.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("collapsible-summary", summary_paragraph),
    ("ingredient-class", class_attribute),
    ("heading-scan", heading_scan),
    ("structured-data", structured_data),
    ("ingredient-table", table_rows),
    ("label-regex", full_text_label),
];

/// Heading keywords that open an ingredients section, multi-language.
const HEADING_KEYWORDS: &[&str] = &[
    "ingredients",
    "ingrédients",
    "ingredientes",
    "成分",
    "ingredient list",
    "full ingredients",
    "what's in it",
    "key ingredients",
    "active ingredients",
    "composition",
];

static LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ingredients?\s*[:\-]?\s*(.+)").unwrap());

/// Minimum-content heuristic: long enough AND comma-delimited.
pub fn looks_like_ingredients(text: &str, min_len: usize) -> bool {
    let trimmed = text.trim();
    trimmed.len() > min_len && trimmed.contains(',')
}

fn element_text(element: &ElementRef) -> String {
    normalize::collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Run all strategies in order, returning the first accepted block.
pub fn extract_ingredient_block(document: &Html) -> Option<String> {
    for (name, strategy) in STRATEGIES {
        if let Some(block) = strategy(document) {
            debug!("Extraction strategy '{}' matched", name);
            return Some(block);
        }
    }
    None
}

/// Known structural pattern: a collapsible "see full list" element whose
/// descriptive paragraph carries the ingredient text.
fn summary_paragraph(document: &Html) -> Option<String> {
    let summary_selector =
        Selector::parse(r#"summary[data-closed="See Full Ingredient List"]"#).ok()?;
    let p_selector = Selector::parse("p").ok()?;

    for summary in document.select(&summary_selector) {
        // the paragraph usually follows the summary inside the same details
        for sibling in summary.next_siblings().filter_map(ElementRef::wrap) {
            let paragraph = if sibling.value().name() == "p" {
                Some(sibling)
            } else {
                sibling.select(&p_selector).next()
            };
            if let Some(p) = paragraph {
                let text = element_text(&p);
                if looks_like_ingredients(&text, 20) {
                    return Some(text);
                }
            }
        }
        if let Some(parent) = summary.parent().and_then(ElementRef::wrap) {
            if let Some(p) = parent.select(&p_selector).next() {
                let text = element_text(&p);
                if looks_like_ingredients(&text, 20) {
                    return Some(text);
                }
            }
        }
    }
    None
}

/// Elements whose class or id contains an ingredient-related substring.
fn class_attribute(document: &Html) -> Option<String> {
    for pattern in ["ingredient", "composition"] {
        for attr in ["class", "id"] {
            let selector_str = format!("[{attr}*='{pattern}']");
            let Ok(selector) = Selector::parse(&selector_str) else {
                continue;
            };
            for element in document.select(&selector) {
                let text = element_text(&element);
                // length cap avoids grabbing an entire page wrapper
                if looks_like_ingredients(&text, 50) && text.len() < 5000 {
                    return Some(text);
                }
            }
        }
    }
    None
}

/// Heading keyword search: inspect following siblings, then the nearest
/// ancestor container, gating acceptance at each level.
fn heading_scan(document: &Html) -> Option<String> {
    let heading_selector = Selector::parse("h2, h3, h4, h5, h6, span, div").ok()?;

    for heading in document.select(&heading_selector) {
        let own_text = element_text(&heading);
        // headings are short; long text means we matched a container
        if own_text.len() > 80 || !is_ingredient_heading(&own_text) {
            continue;
        }

        for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
            let text = element_text(&sibling);
            if looks_like_ingredients(&text, 50) {
                return Some(text);
            }
        }

        let mut node = heading.parent();
        while let Some(parent) = node {
            if let Some(container) = ElementRef::wrap(parent) {
                if matches!(container.value().name(), "div" | "section" | "article") {
                    let text = element_text(&container);
                    if looks_like_ingredients(&text, 100) {
                        return Some(text);
                    }
                    break;
                }
            }
            node = parent.parent();
        }
    }
    None
}

fn is_ingredient_heading(text: &str) -> bool {
    let lower = text.to_lowercase();
    HEADING_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
}

/// Structured-data blocks that declare ingredients explicitly: microdata
/// itemprops, ingredient-named meta tags, and JSON-LD product markup.
fn structured_data(document: &Html) -> Option<String> {
    for selector_str in ["[itemprop='ingredients']", "[itemprop='activeIngredient']"] {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = match element.value().attr("content") {
                Some(content) => normalize::collapse_whitespace(content),
                None => element_text(&element),
            };
            if looks_like_ingredients(&text, 20) {
                return Some(text);
            }
        }
    }

    for selector_str in ["meta[name*='ingredient']", "meta[property*='ingredient']"] {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            if let Some(content) = element.value().attr("content") {
                let text = normalize::collapse_whitespace(content);
                if looks_like_ingredients(&text, 20) {
                    return Some(text);
                }
            }
        }
    }

    let script_selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    for script in document.select(&script_selector) {
        let raw = script.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        if let Some(text) = find_ingredient_value(&value) {
            if looks_like_ingredients(&text, 20) {
                return Some(text);
            }
        }
    }
    None
}

/// Depth-first scan of a JSON-LD value for an ingredient-declaring key.
fn find_ingredient_value(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            for key in ["ingredients", "activeIngredient", "ingredient"] {
                match map.get(key) {
                    Some(Value::String(s)) => return Some(s.clone()),
                    Some(Value::Array(items)) => {
                        let joined = items
                            .iter()
                            .filter_map(|item| item.as_str())
                            .collect::<Vec<_>>()
                            .join(", ");
                        if !joined.is_empty() {
                            return Some(joined);
                        }
                    }
                    _ => {}
                }
            }
            map.values().find_map(find_ingredient_value)
        }
        Value::Array(items) => items.iter().find_map(find_ingredient_value),
        _ => None,
    }
}

/// Table rows under a header containing "ingredient": join the first
/// column into a comma-separated block.
fn table_rows(document: &Html) -> Option<String> {
    let table_selector = Selector::parse("table").ok()?;
    let header_selector = Selector::parse("th").ok()?;
    let row_selector = Selector::parse("tr").ok()?;
    let cell_selector = Selector::parse("td").ok()?;

    for table in document.select(&table_selector) {
        let header_matches = table
            .select(&header_selector)
            .any(|th| element_text(&th).to_lowercase().contains("ingredient"));
        if !header_matches {
            continue;
        }

        let names: Vec<String> = table
            .select(&row_selector)
            .filter_map(|row| row.select(&cell_selector).next())
            .map(|cell| element_text(&cell))
            .filter(|text| !text.is_empty())
            .collect();

        let joined = names.join(", ");
        if looks_like_ingredients(&joined, 20) {
            return Some(joined);
        }
    }
    None
}

/// Last resort: regex match for an "ingredients:" label in the full page
/// text. Highest false-positive rate, so it runs last and with the
/// strictest length gate.
fn full_text_label(document: &Html) -> Option<String> {
    let body_text = normalize::collapse_whitespace(
        &document.root_element().text().collect::<Vec<_>>().join(" "),
    );
    let caps = LABEL_PATTERN.captures(&body_text)?;
    let candidate = caps.get(1)?.as_str();
    if looks_like_ingredients(candidate, 50) {
        return Some(candidate.to_string());
    }
    None
}
