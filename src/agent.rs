//! Top-level orchestration: route an input to the right extraction path
//! and hand the result to the analysis client.

use log::info;
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::StructuredAnalysisClient;
use crate::classify::ClassificationRouter;
use crate::config::AppConfig;
use crate::error::SkinsightError;
use crate::llm::{ChatBackend, GroqBackend};
use crate::model::{AnalysisReport, Classification, ComparisonVerdict, IngredientList, SkinProfile};
use crate::ocr::ImageIngredientExtractor;
use crate::web::WebIngredientResolver;

/// The input source for one analysis request
#[derive(Debug, Clone)]
pub enum AnalysisInput {
    /// Raw image bytes of a product label
    Image(Vec<u8>),
    /// Free text: a product name or an ingredient list
    Text(String),
}

/// Orchestrates extraction, classification and analysis for one request.
pub struct SkincareAgent {
    extractor: ImageIngredientExtractor,
    resolver: WebIngredientResolver,
    router: ClassificationRouter,
    analyst: StructuredAnalysisClient,
}

impl SkincareAgent {
    /// Construct every component from configuration.
    ///
    /// Fails fast on missing credentials; nothing is deferred to request
    /// time.
    pub fn from_config(config: &AppConfig) -> Result<Self, SkinsightError> {
        let timeout = Duration::from_secs(config.timeout);
        let backend: Arc<dyn ChatBackend> = Arc::new(GroqBackend::new(&config.llm, timeout)?);

        Ok(Self {
            extractor: ImageIngredientExtractor::new(&config.ocr, timeout)?,
            resolver: WebIngredientResolver::new(&config.search, timeout)?,
            router: ClassificationRouter::with_backend(backend.clone()),
            analyst: StructuredAnalysisClient::new(backend),
        })
    }

    #[doc(hidden)]
    pub fn with_components(
        extractor: ImageIngredientExtractor,
        resolver: WebIngredientResolver,
        router: ClassificationRouter,
        analyst: StructuredAnalysisClient,
    ) -> Self {
        Self {
            extractor,
            resolver,
            router,
            analyst,
        }
    }

    /// Process one input end to end and return an analysis report.
    pub async fn process(
        &self,
        input: AnalysisInput,
        profile: &SkinProfile,
    ) -> Result<AnalysisReport, SkinsightError> {
        match input {
            AnalysisInput::Image(bytes) => {
                let raw_text = self.extractor.extract_raw_text(&bytes).await?;
                self.route_text(&raw_text, profile).await
            }
            AnalysisInput::Text(text) => self.route_text(&text, profile).await,
        }
    }

    async fn route_text(
        &self,
        text: &str,
        profile: &SkinProfile,
    ) -> Result<AnalysisReport, SkinsightError> {
        match self.router.classify(text).await {
            Classification::Ingredients(raw) => {
                let ingredients = IngredientList::from_raw_text(&raw);
                if ingredients.is_empty() {
                    return Err(SkinsightError::InvalidInput(
                        "classified as ingredients but none were usable".to_string(),
                    ));
                }
                info!("Analyzing {} ingredients from direct input", ingredients.len());
                Ok(self.analyst.analyze(&ingredients, profile, None).await)
            }
            Classification::ProductName(name) => {
                let resolved = self
                    .resolver
                    .resolve(&name)
                    .await
                    .ok_or_else(|| SkinsightError::ProductNotFound(name.clone()))?;
                info!(
                    "Analyzing {} ingredients resolved from {}",
                    resolved.ingredients.len(),
                    resolved.source_url
                );
                Ok(self
                    .analyst
                    .analyze(&resolved.ingredients, profile, Some(&resolved.source_url))
                    .await)
            }
        }
    }

    /// Analyze two inputs concurrently and compare the results.
    ///
    /// The two analysis calls have no ordering dependency, so they run
    /// joined rather than sequentially.
    pub async fn compare_inputs(
        &self,
        first: AnalysisInput,
        second: AnalysisInput,
        profile: &SkinProfile,
    ) -> Result<ComparisonVerdict, SkinsightError> {
        let (report_a, report_b) = tokio::join!(
            self.process(first, profile),
            self.process(second, profile)
        );
        let (report_a, report_b) = (report_a?, report_b?);
        Ok(self.analyst.compare(&report_a, &report_b, profile).await)
    }
}
