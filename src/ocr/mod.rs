//! Ingredient extraction from product label photos.
//!
//! The image is preprocessed, sent to the OCR service, and the decoded text
//! is segmented down to a clean ingredient list: locate the ingredients
//! section, walk it line by line until an end-of-list signal, clean each
//! line, then dedup and correct known misreadings.

mod corrections;
mod preprocess;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, error};
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;

use crate::config::OcrConfig;
use crate::error::SkinsightError;
use crate::model::IngredientList;
use crate::normalize;

/// Header tokens that open an ingredients section, multi-language.
static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\b(?:ingredients|ingrédients|ingredientes|成分|composition|composants|active ingredients|contains)\b[:\s]*(.*?)(?:\n\s*\n|$)",
    )
    .unwrap()
});

/// Signals that the ingredient list has ended and marketing/legal text follows.
static END_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r" {2,}",
        r"(?i)\b(?:distribut|product of|made in|www\.|http|ml|fl\.?\s?oz|floz|oz)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Extracts ingredient lists from product label images via OCR.
pub struct ImageIngredientExtractor {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl ImageIngredientExtractor {
    /// Create an extractor from configuration.
    ///
    /// Fails immediately when the OCR credential is missing; a silent
    /// degrade here would turn every image request into a late failure.
    pub fn new(config: &OcrConfig, timeout: Duration) -> Result<Self, SkinsightError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OCR_SPACE_API_KEY").ok())
            .ok_or(SkinsightError::MissingCredential("OCR_SPACE_API_KEY"))?;

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            endpoint: config.endpoint.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint,
        }
    }

    /// Extract a clean ingredient list from a label photo.
    pub async fn extract(&self, image_bytes: &[u8]) -> Result<IngredientList, SkinsightError> {
        let raw_text = self.extract_raw_text(image_bytes).await?;
        let ingredients = process_ingredients_text(&raw_text);
        if ingredients.is_empty() {
            return Err(SkinsightError::ImageUnreadable);
        }
        Ok(ingredients)
    }

    /// Extract the raw decoded text without ingredient post-processing.
    ///
    /// Used by the agent path, which classifies the text before deciding
    /// how to process it.
    pub async fn extract_raw_text(&self, image_bytes: &[u8]) -> Result<String, SkinsightError> {
        let optimized = preprocess::optimize(image_bytes);
        let encoded = STANDARD.encode(&optimized);

        let form = [
            ("base64Image", format!("data:image/jpeg;base64,{}", encoded)),
            ("language", "eng".to_string()),
            ("isOverlayRequired", "false".to_string()),
            ("filetype", "JPG".to_string()),
            ("OCREngine", "2".to_string()),
            ("scale", "true".to_string()),
            ("detectOrientation", "true".to_string()),
        ];

        debug!("Sending OCR request ({} bytes optimized)", optimized.len());

        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            error!("OCR service returned {}", status);
            return Err(SkinsightError::Ocr(format!("service returned {}", status)));
        }

        let body: Value = response.json().await?;
        if body["IsErroredOnProcessing"].as_bool().unwrap_or(true) {
            let message = ocr_error_message(&body);
            error!("OCR error: {}", message);
            return Err(SkinsightError::Ocr(message));
        }

        let text = body["ParsedResults"][0]["ParsedText"]
            .as_str()
            .ok_or_else(|| SkinsightError::Ocr("no parsed text in response".to_string()))?;

        debug!("OCR decoded {} characters", text.len());
        Ok(text.to_string())
    }
}

fn ocr_error_message(body: &Value) -> String {
    match &body["ErrorMessage"] {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        _ => "unknown OCR error".to_string(),
    }
}

/// Turn raw OCR text into a clean ingredient list.
pub fn process_ingredients_text(full_text: &str) -> IngredientList {
    let section = extract_ingredients_section(full_text);

    let mut fragments = Vec::new();
    for line in section.lines() {
        if is_end_of_list(line) {
            break;
        }
        fragments.extend(clean_ingredient_line(line));
    }

    let cleaned = normalize::dedup_preserving_order(fragments)
        .into_iter()
        .map(|name| {
            let corrected = corrections::apply(&name);
            let corrected = normalize::strip_punctuation(&corrected);
            normalize::strip_size_tokens(&corrected).trim().to_string()
        })
        .filter(|name| name.len() > 2)
        .collect();

    IngredientList::from_names(cleaned)
}

/// Locate the ingredients section, falling back to the whole text when no
/// header matches.
fn extract_ingredients_section(text: &str) -> String {
    if let Some(caps) = SECTION_HEADER.captures(text) {
        if let Some(section) = caps.get(1) {
            return section.as_str().trim().to_string();
        }
    }
    text.to_string()
}

fn is_end_of_list(line: &str) -> bool {
    line.trim().is_empty() || END_MARKERS.iter().any(|marker| marker.is_match(line))
}

/// Clean a single line into candidate ingredient fragments.
fn clean_ingredient_line(line: &str) -> Vec<String> {
    let line = normalize::strip_parentheticals(line);
    let line = normalize::strip_digits(&line);
    let line = normalize::bullets_to_commas(&line);

    line.split(',')
        .map(str::trim)
        .filter(|fragment| fragment.len() >= 3)
        .map(normalize::title_case)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_localization() {
        let text = "Brand X Gentle Cleanser\nIngredients: Water, Glycerin\n\nMade in France";
        let section = extract_ingredients_section(text);
        assert_eq!(section, "Water, Glycerin");
    }

    #[test]
    fn test_section_fallback_to_full_text() {
        let text = "Water, Glycerin, Niacinamide";
        assert_eq!(extract_ingredients_section(text), text);
    }

    #[test]
    fn test_end_of_list_truncation() {
        let text = "Water, Glycerin\n\nDistributed by Acme Corp www.acme.com";
        let list = process_ingredients_text(text);
        assert_eq!(list.names(), ["Water", "Glycerin"]);
    }

    #[test]
    fn test_end_markers() {
        assert!(is_end_of_list(""));
        assert!(is_end_of_list("Distributed by Acme Corp"));
        assert!(is_end_of_list("visit www.example.com"));
        assert!(is_end_of_list("two  spaces"));
        assert!(!is_end_of_list("Water, Glycerin"));
    }

    #[test]
    fn test_clean_ingredient_line() {
        let fragments = clean_ingredient_line("Aqua (Water), Glycerin 5%, • Niacinamide");
        assert_eq!(fragments, ["Aqua", "Glycerin", "Niacinamide"]);
    }

    #[test]
    fn test_corrections_applied() {
        let list = process_ingredients_text("Ingredients: Glydern, Fanthenol");
        assert_eq!(list.names(), ["Glycerin", "Panthenol"]);
    }

    #[test]
    fn test_aqua_corrected_to_water() {
        let list = process_ingredients_text("Ingredients: Aqua, Niacinamide");
        assert_eq!(list.names(), ["Water", "Niacinamide"]);
    }

    #[test]
    fn test_short_fragments_discarded() {
        let list = process_ingredients_text("Ingredients: Water, ab, Glycerin");
        assert_eq!(list.names(), ["Water", "Glycerin"]);
    }

    #[test]
    fn test_dedup_after_correction() {
        // Aqua corrects to Water, which already appears
        let list = process_ingredients_text("Ingredients: Water, Aqua, Glycerin");
        assert_eq!(list.names(), ["Water", "Glycerin"]);
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let config = OcrConfig {
            api_key: None,
            endpoint: "https://api.ocr.space/parse/image".to_string(),
        };
        std::env::remove_var("OCR_SPACE_API_KEY");
        let result = ImageIngredientExtractor::new(&config, Duration::from_secs(5));
        assert!(matches!(
            result,
            Err(SkinsightError::MissingCredential("OCR_SPACE_API_KEY"))
        ));
    }
}
