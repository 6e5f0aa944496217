use serde::{Deserialize, Serialize};

use crate::normalize;

/// Self-reported skin type used to personalize analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SkinType {
    #[default]
    Normal,
    Dry,
    Oily,
    Combination,
    Sensitive,
}

/// A user's skin profile, supplied externally per request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SkinProfile {
    pub skin_type: SkinType,
    #[serde(default)]
    pub concerns: Vec<String>,
}

impl SkinProfile {
    pub fn new(skin_type: SkinType, concerns: Vec<String>) -> Self {
        Self {
            skin_type,
            concerns,
        }
    }

    /// Comma-joined concerns for prompt embedding, "none" when empty
    pub fn concerns_str(&self) -> String {
        if self.concerns.is_empty() {
            "none".to_string()
        } else {
            self.concerns.join(", ")
        }
    }

    pub fn skin_type_str(&self) -> &'static str {
        match self.skin_type {
            SkinType::Normal => "normal",
            SkinType::Dry => "dry",
            SkinType::Oily => "oily",
            SkinType::Combination => "combination",
            SkinType::Sensitive => "sensitive",
        }
    }
}

/// Ordered, deduplicated sequence of cleaned ingredient names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IngredientList(Vec<String>);

impl IngredientList {
    /// Build a list from raw comma-separated text: split, trim, title-case,
    /// case-insensitive dedup preserving first-seen order.
    pub fn from_raw_text(raw: &str) -> Self {
        let names = raw
            .split(',')
            .map(|s| normalize::title_case(s.trim()))
            .filter(|s| !s.is_empty())
            .collect();
        Self(normalize::dedup_preserving_order(names))
    }

    /// Build a list from already-cleaned names, deduplicating defensively.
    pub fn from_names(names: Vec<String>) -> Self {
        Self(normalize::dedup_preserving_order(names))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined form for prompt embedding
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

/// Safety verdict for a product or a single ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyRating {
    Safe,
    Caution,
    Unsafe,
}

/// Expected effect on the skin barrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarrierImpact {
    Positive,
    Neutral,
    Negative,
}

/// Allergy risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergyRisk {
    Low,
    Medium,
    High,
}

/// Product-level assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallAssessment {
    pub safety_rating: SafetyRating,
    pub barrier_impact: BarrierImpact,
    pub allergy_risk: AllergyRisk,
    pub suitability_score: u8,
    #[serde(default)]
    pub key_concerns: Vec<String>,
    #[serde(default)]
    pub personalized_notes: String,
}

/// Per-ingredient assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientAssessment {
    pub name: String,
    #[serde(default)]
    pub function: String,
    pub safety: SafetyRating,
    pub barrier_impact: BarrierImpact,
    pub allergy_potential: AllergyRisk,
    #[serde(default)]
    pub special_concerns: Vec<String>,
    #[serde(default)]
    pub personalized_notes: String,
}

/// Alternative product suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeProduct {
    pub brand: String,
    pub product: String,
    /// "commercial" or "natural"
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub key_ingredients: Vec<String>,
}

/// Full analysis report for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub overall_assessment: OverallAssessment,
    pub ingredients: Vec<IngredientAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_products: Option<Vec<AlternativeProduct>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// AM or PM routine slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    AM,
    PM,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::AM => "AM",
            TimeOfDay::PM => "PM",
        }
    }
}

/// One step of a generated routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineStep {
    pub step: String,
    pub product: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
}

/// A generated routine; appended to history, never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineDocument {
    pub time_of_day: TimeOfDay,
    pub steps: Vec<RoutineStep>,
}

/// Outcome of a two-product comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonVerdict {
    /// 1 or 2
    pub better_product: u8,
    pub comparison_summary: String,
    #[serde(default)]
    pub key_differences: Vec<String>,
    /// Locally computed per-product metric scores, in input order
    pub product_scores: [u8; 2],
}

/// What a piece of free text turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A product name to resolve on the web
    ProductName(String),
    /// A raw ingredient list, ready for cleanup and analysis
    Ingredients(String),
}
