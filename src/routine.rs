//! Routine generation via the shared structured-output protocol.
//!
//! Routine generation is advisory, not safety-critical: callers get `None`
//! on any failure rather than a placeholder document. There is no fixed
//! enumerable set of required steps, so no completeness enforcement runs.

use log::warn;
use serde::Deserialize;
use std::sync::Arc;

use crate::llm::{prompt, repair, ChatBackend, CompletionRequest};
use crate::model::{RoutineDocument, RoutineStep, SkinProfile, TimeOfDay};

const ROUTINE_TEMPERATURE: f32 = 0.0;
const ROUTINE_MAX_TOKENS: u32 = 1500;

#[derive(Debug, Deserialize)]
struct RoutineResponse {
    #[serde(default)]
    routine: Vec<RoutineStep>,
}

/// Generates structured multi-step routines for one profile.
pub struct RoutineSynthesizer {
    backend: Arc<dyn ChatBackend>,
}

impl RoutineSynthesizer {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Generate a routine for the given slot, `None` on any failure.
    pub async fn generate(
        &self,
        time_of_day: TimeOfDay,
        profile: &SkinProfile,
    ) -> Option<RoutineDocument> {
        let request =
            CompletionRequest::new("", prompt::build_routine_prompt(time_of_day, profile))
                .temperature(ROUTINE_TEMPERATURE)
                .max_tokens(ROUTINE_MAX_TOKENS);

        let raw = match self.backend.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Routine generation failed: {}", e);
                return None;
            }
        };

        let value = match repair::parse_or_repair(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Routine response unparseable: {}", e);
                return None;
            }
        };

        let response: RoutineResponse = match serde_json::from_value(value) {
            Ok(response) => response,
            Err(e) => {
                warn!("Routine response shape mismatch: {}", e);
                return None;
            }
        };

        if response.routine.is_empty() {
            warn!("Routine response contained no steps");
            return None;
        }

        Some(RoutineDocument {
            time_of_day,
            steps: response.routine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkinsightError;
    use crate::model::SkinType;
    use async_trait::async_trait;

    struct CannedBackend(Result<String, ()>);

    #[async_trait]
    impl ChatBackend for CannedBackend {
        fn backend_name(&self) -> &str {
            "canned"
        }
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<String, SkinsightError> {
            self.0
                .clone()
                .map_err(|_| SkinsightError::Backend("backend down".to_string()))
        }
    }

    fn profile() -> SkinProfile {
        SkinProfile::new(SkinType::Combination, vec!["dullness".into()])
    }

    #[tokio::test]
    async fn test_generate_parses_steps() {
        let body = r#"{"routine": [
            {"step": "cleanser", "product": "Brand Gel Cleanser",
             "link": "https://brand.com", "description": "Gentle morning cleanse."},
            {"step": "sunscreen", "product": "Brand SPF 50",
             "link": "https://brand.com", "description": "Daily protection."}
        ]}"#;
        let synthesizer = RoutineSynthesizer::new(Arc::new(CannedBackend(Ok(body.to_string()))));

        let routine = synthesizer.generate(TimeOfDay::AM, &profile()).await.unwrap();
        assert_eq!(routine.time_of_day, TimeOfDay::AM);
        assert_eq!(routine.steps.len(), 2);
        assert_eq!(routine.steps[0].step, "cleanser");
    }

    #[tokio::test]
    async fn test_generate_repairs_malformed_json() {
        let body = r#"Here you go!
            {"routine": [
                {"step": "cleanser", "product": "Brand Gel Cleanser",
                 "link": "https://brand.com", "description": "Gentle.",},
            ]}"#;
        let synthesizer = RoutineSynthesizer::new(Arc::new(CannedBackend(Ok(body.to_string()))));

        let routine = synthesizer.generate(TimeOfDay::PM, &profile()).await.unwrap();
        assert_eq!(routine.steps.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_fails_soft_on_backend_error() {
        let synthesizer = RoutineSynthesizer::new(Arc::new(CannedBackend(Err(()))));
        assert!(synthesizer.generate(TimeOfDay::AM, &profile()).await.is_none());
    }

    #[tokio::test]
    async fn test_generate_fails_soft_on_garbage() {
        let synthesizer =
            RoutineSynthesizer::new(Arc::new(CannedBackend(Ok("not json".to_string()))));
        assert!(synthesizer.generate(TimeOfDay::AM, &profile()).await.is_none());
    }

    #[tokio::test]
    async fn test_generate_fails_soft_on_empty_routine() {
        let synthesizer = RoutineSynthesizer::new(Arc::new(CannedBackend(Ok(
            r#"{"routine": []}"#.to_string(),
        ))));
        assert!(synthesizer.generate(TimeOfDay::AM, &profile()).await.is_none());
    }
}
