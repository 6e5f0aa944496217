use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::SkinsightError;
use crate::llm::{ChatBackend, CompletionRequest};

/// OpenAI-compatible chat-completions backend (Groq wire shape).
pub struct GroqBackend {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqBackend {
    /// Create a backend from configuration.
    pub fn new(config: &LlmConfig, timeout: Duration) -> Result<Self, SkinsightError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
            .ok_or(SkinsightError::MissingCredential("GROQ_API_KEY"))?;

        Ok(GroqBackend {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        GroqBackend {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }
}

#[async_trait]
impl ChatBackend for GroqBackend {
    fn backend_name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, SkinsightError> {
        let mut messages = Vec::new();
        if !request.system.is_empty() {
            messages.push(json!({"role": "system", "content": request.system}));
        }
        messages.push(json!({"role": "user", "content": request.user}));

        let mut payload = json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });
        if request.json_mode {
            payload["response_format"] = json!({"type": "json_object"});
        }

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                SkinsightError::Backend("no content in backend response".to_string())
            })?
            .to_string();

        Ok(content)
    }
}
