//! Structured analysis of an ingredient list against a skin profile.
//!
//! The backend is non-deterministic and occasionally malformed, so the
//! client never lets that surface: backend failure and unparseable output
//! both degrade to a schema-valid placeholder report, and a successful
//! parse is diffed against the input list so every ingredient ends up with
//! an assessment entry.

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use crate::llm::{prompt, repair, ChatBackend, CompletionRequest};
use crate::model::{
    AllergyRisk, AnalysisReport, BarrierImpact, ComparisonVerdict, IngredientAssessment,
    IngredientList, OverallAssessment, SafetyRating, SkinProfile,
};

const ANALYSIS_TEMPERATURE: f32 = 0.2;
const ANALYSIS_MAX_TOKENS: u32 = 4000;

/// System role for the comparison call.
const COMPARISON_SYSTEM_ROLE: &str = "You are a skincare expert comparing two products.";

/// Produces schema-conforming analysis reports from the generative backend.
pub struct StructuredAnalysisClient {
    backend: Arc<dyn ChatBackend>,
}

impl StructuredAnalysisClient {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Analyze an ingredient list for one skin profile.
    ///
    /// Never fails: irrecoverable backend problems return a degraded
    /// placeholder report so a report object always exists.
    pub async fn analyze(
        &self,
        ingredients: &IngredientList,
        profile: &SkinProfile,
        source_url: Option<&str>,
    ) -> AnalysisReport {
        let mut report = match self.try_analyze(ingredients, profile).await {
            Ok(mut report) => {
                enforce_completeness(&mut report, ingredients);
                report
            }
            Err(reason) => {
                warn!("Analysis degraded to placeholder report: {}", reason);
                fallback_report()
            }
        };

        report.overall_assessment.suitability_score =
            report.overall_assessment.suitability_score.clamp(1, 5);
        if let Some(url) = source_url {
            report.source_url = Some(url.to_string());
        }
        report
    }

    async fn try_analyze(
        &self,
        ingredients: &IngredientList,
        profile: &SkinProfile,
    ) -> Result<AnalysisReport, String> {
        let request = CompletionRequest::new(
            prompt::ANALYST_SYSTEM_ROLE,
            prompt::build_analysis_prompt(ingredients, profile),
        )
        .temperature(ANALYSIS_TEMPERATURE)
        .max_tokens(ANALYSIS_MAX_TOKENS);

        let raw = self
            .backend
            .complete(&request)
            .await
            .map_err(|e| format!("backend unavailable: {}", e))?;

        let value =
            repair::parse_or_repair(&raw).map_err(|e| format!("unparseable response: {}", e))?;

        serde_json::from_value(value).map_err(|e| format!("schema mismatch: {}", e))
    }

    /// Compare two analyzed products for one profile.
    ///
    /// Per-product metric scores are computed locally so the verdict is
    /// deterministic where it matters; the backend contributes narrative
    /// only, with a local synthesis fallback on failure.
    pub async fn compare(
        &self,
        report_a: &AnalysisReport,
        report_b: &AnalysisReport,
        profile: &SkinProfile,
    ) -> ComparisonVerdict {
        let scores = [metric_score(report_a), metric_score(report_b)];

        if report_a == report_b {
            debug!("Comparing identical reports, skipping backend call");
            return equivalence_verdict(scores);
        }

        match self.try_compare(report_a, report_b, profile).await {
            Ok(raw) => {
                // tolerate both 1 and "1"
                let numeric = raw
                    .better_product
                    .as_u64()
                    .or_else(|| raw.better_product.as_str().and_then(|s| s.parse().ok()));
                let better = match numeric {
                    Some(n @ 1..=2) => n as u8,
                    _ => local_better(scores),
                };
                ComparisonVerdict {
                    better_product: better,
                    comparison_summary: raw.comparison_summary,
                    key_differences: raw.key_differences,
                    product_scores: scores,
                }
            }
            Err(reason) => {
                warn!("Comparison degraded to local verdict: {}", reason);
                local_verdict(scores)
            }
        }
    }

    async fn try_compare(
        &self,
        report_a: &AnalysisReport,
        report_b: &AnalysisReport,
        profile: &SkinProfile,
    ) -> Result<RawComparison, String> {
        let request = CompletionRequest::new(
            COMPARISON_SYSTEM_ROLE,
            prompt::build_comparison_prompt(report_a, report_b, profile),
        );

        let raw = self
            .backend
            .complete(&request)
            .await
            .map_err(|e| format!("backend unavailable: {}", e))?;

        let value =
            repair::parse_or_repair(&raw).map_err(|e| format!("unparseable response: {}", e))?;

        serde_json::from_value(value).map_err(|e| format!("schema mismatch: {}", e))
    }
}

#[derive(Debug, Deserialize)]
struct RawComparison {
    /// Tolerates both numeric and quoted forms before coercion
    #[serde(default)]
    better_product: Value,
    #[serde(default)]
    comparison_summary: String,
    #[serde(default)]
    key_differences: Vec<String>,
}

/// Deterministic per-report score: suitability dominates, safety and
/// allergy risk shift the result by a step.
fn metric_score(report: &AnalysisReport) -> u8 {
    let assessment = &report.overall_assessment;
    let mut score = i32::from(assessment.suitability_score.clamp(1, 5)) * 2;
    score += match assessment.safety_rating {
        SafetyRating::Safe => 2,
        SafetyRating::Caution => 0,
        SafetyRating::Unsafe => -2,
    };
    score += match assessment.allergy_risk {
        AllergyRisk::Low => 1,
        AllergyRisk::Medium => 0,
        AllergyRisk::High => -1,
    };
    score.clamp(0, 13) as u8
}

fn local_better(scores: [u8; 2]) -> u8 {
    if scores[1] > scores[0] {
        2
    } else {
        1
    }
}

fn local_verdict(scores: [u8; 2]) -> ComparisonVerdict {
    let summary = if scores[0] == scores[1] {
        "Both products score equally for this skin profile.".to_string()
    } else {
        format!(
            "Product {} scores better for this skin profile.",
            local_better(scores)
        )
    };
    ComparisonVerdict {
        better_product: local_better(scores),
        comparison_summary: summary,
        key_differences: Vec::new(),
        product_scores: scores,
    }
}

fn equivalence_verdict(scores: [u8; 2]) -> ComparisonVerdict {
    ComparisonVerdict {
        better_product: 1,
        comparison_summary: "The two products are equivalent: their assessments are identical \
             for this skin profile, with no ingredient-level distinction."
            .to_string(),
        key_differences: Vec::new(),
        product_scores: scores,
    }
}

/// Placeholder report used when the backend cannot be used at all.
fn fallback_report() -> AnalysisReport {
    AnalysisReport {
        overall_assessment: OverallAssessment {
            safety_rating: SafetyRating::Caution,
            barrier_impact: BarrierImpact::Neutral,
            allergy_risk: AllergyRisk::Medium,
            suitability_score: 3,
            key_concerns: vec!["Analysis unavailable".to_string()],
            personalized_notes:
                "Could not analyze ingredients. Please try again or check the ingredient list."
                    .to_string(),
        },
        ingredients: vec![IngredientAssessment {
            name: "Unknown".to_string(),
            function: "N/A".to_string(),
            safety: SafetyRating::Caution,
            barrier_impact: BarrierImpact::Neutral,
            allergy_potential: AllergyRisk::Medium,
            special_concerns: vec!["Analysis failed".to_string()],
            personalized_notes: "Analysis unavailable".to_string(),
        }],
        alternative_products: None,
        source_url: None,
    }
}

/// Append a placeholder entry for every input name the model skipped.
fn enforce_completeness(report: &mut AnalysisReport, input: &IngredientList) {
    let analyzed: HashSet<String> = report
        .ingredients
        .iter()
        .map(|entry| entry.name.trim().to_lowercase())
        .collect();

    for name in input.names() {
        if !analyzed.contains(&name.trim().to_lowercase()) {
            warn!("Model skipped '{}', synthesizing placeholder entry", name);
            report.ingredients.push(placeholder_entry(name));
        }
    }
}

fn placeholder_entry(name: &str) -> IngredientAssessment {
    IngredientAssessment {
        name: name.to_string(),
        function: "Unknown".to_string(),
        safety: SafetyRating::Caution,
        barrier_impact: BarrierImpact::Neutral,
        allergy_potential: AllergyRisk::Medium,
        special_concerns: vec!["Analysis incomplete".to_string()],
        personalized_notes: "Could not analyze this ingredient".to_string(),
    }
}
