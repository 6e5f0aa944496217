//! Routing classifier: is a piece of free text a product name or an
//! ingredient list?
//!
//! Two implementations coexist: a dependency-free heuristic scorer and an
//! LLM-backed classifier held to a strict two-value schema. The LLM path
//! takes precedence when a backend is configured; any backend failure or
//! schema violation falls back to treating the input as a product name.

use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;

use crate::llm::{prompt, repair, ChatBackend, CompletionRequest};
use crate::model::Classification;

/// Outcome of the heuristic scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicKind {
    Ingredients,
    ProductName,
    Ambiguous,
}

/// Routes free text to the web resolver or directly to analysis.
pub struct ClassificationRouter {
    backend: Option<Arc<dyn ChatBackend>>,
}

impl ClassificationRouter {
    /// Router with the LLM path enabled.
    pub fn with_backend(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Dependency-free router using only the heuristic scorer.
    pub fn heuristic_only() -> Self {
        Self { backend: None }
    }

    pub async fn classify(&self, text: &str) -> Classification {
        if let Some(backend) = &self.backend {
            return match self.classify_with_backend(backend.as_ref(), text).await {
                Ok(classification) => classification,
                Err(reason) => {
                    warn!(
                        "Classifier backend failed ({}), treating input as product name",
                        reason
                    );
                    Classification::ProductName(text.trim().to_string())
                }
            };
        }

        match classify_heuristic(text) {
            HeuristicKind::Ingredients => Classification::Ingredients(text.trim().to_string()),
            HeuristicKind::ProductName | HeuristicKind::Ambiguous => {
                Classification::ProductName(text.trim().to_string())
            }
        }
    }

    async fn classify_with_backend(
        &self,
        backend: &dyn ChatBackend,
        text: &str,
    ) -> Result<Classification, String> {
        let request = CompletionRequest::new(
            prompt::CLASSIFIER_SYSTEM_ROLE,
            format!("Analyze this text: '{}'", text),
        )
        .temperature(0.0);

        let raw = backend
            .complete(&request)
            .await
            .map_err(|e| format!("backend unavailable: {}", e))?;

        let value =
            repair::parse_or_repair(&raw).map_err(|e| format!("unparseable response: {}", e))?;

        validate_classification(&value)
    }
}

/// Enforce the strict schema: a two-value `type` plus the matching
/// payload field, anything else is a violation.
fn validate_classification(value: &Value) -> Result<Classification, String> {
    let kind = value["type"]
        .as_str()
        .ok_or_else(|| "missing 'type' in response".to_string())?;

    match kind {
        "product" => {
            let name = value["product_name"]
                .as_str()
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| "product type missing product_name".to_string())?;
            debug!("Classified as product name: {}", name);
            Ok(Classification::ProductName(name.trim().to_string()))
        }
        "ingredients" => {
            let ingredients = value["ingredients"]
                .as_str()
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| "ingredients type missing ingredients".to_string())?;
            debug!("Classified as ingredient list");
            Ok(Classification::Ingredients(ingredients.trim().to_string()))
        }
        other => Err(format!("invalid type: {}", other)),
    }
}

/// Keyword/length/pattern scoring over the raw text.
pub fn classify_heuristic(text: &str) -> HeuristicKind {
    let lower = text.to_lowercase();

    let ingredient_keywords = ["ingredients", "ingrédients", "composition", "contains", "ing:"];
    let has_ingredient_header = ingredient_keywords
        .iter()
        .any(|keyword| lower.contains(keyword));

    let common_ingredients = ["aqua", "water", "glycerin", "alcohol", "parfum"];
    let common_hits = common_ingredients
        .iter()
        .filter(|name| lower.contains(*name))
        .count();

    let brand_terms = ["by", "for", "collection", "serum", "cream", "lotion"];
    let brand_hits = brand_terms.iter().filter(|term| lower.contains(*term)).count();

    let is_long_text = text.split_whitespace().count() > 50;

    if has_ingredient_header || common_hits > 3 || is_long_text {
        HeuristicKind::Ingredients
    } else if brand_hits > 2 {
        HeuristicKind::ProductName
    } else {
        HeuristicKind::Ambiguous
    }
}
