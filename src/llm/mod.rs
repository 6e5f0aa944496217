//! Generative text backend seam.

mod groq;
pub mod prompt;
pub mod repair;

pub use groq::GroqBackend;

use async_trait::async_trait;

use crate::error::SkinsightError;

/// One bounded completion request to the generative backend.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instructions, empty when the prompt is self-contained
    pub system: String,
    /// User prompt
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the backend for machine-parseable structured text only
    pub json_mode: bool,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.2,
            max_tokens: 4000,
            json_mode: true,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Unified trait for generative text backends
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Get the backend name (e.g., "groq")
    fn backend_name(&self) -> &str;

    /// Run one completion and return the raw response text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, SkinsightError>;
}
