use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SkinsightError;

/// One ranked search result
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "link")]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchHit>,
}

/// Thin client over a Google CSE-shaped search endpoint.
pub struct SearchClient {
    client: Client,
    api_key: String,
    cx: String,
    endpoint: String,
    result_count: u8,
}

impl SearchClient {
    pub fn new(config: &SearchConfig, timeout: Duration) -> Result<Self, SkinsightError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or(SkinsightError::MissingCredential("GOOGLE_API_KEY"))?;
        let cx = config
            .cx
            .clone()
            .or_else(|| std::env::var("GOOGLE_CX").ok())
            .ok_or(SkinsightError::MissingCredential("GOOGLE_CX"))?;

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            cx,
            endpoint: config.endpoint.clone(),
            result_count: config.result_count,
        })
    }

    #[doc(hidden)]
    pub fn with_endpoint(api_key: String, cx: String, endpoint: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            cx,
            endpoint,
            result_count: 3,
        }
    }

    /// Run one search query and return the ranked results.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SkinsightError> {
        debug!("Searching for: {}", query);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cx.as_str()),
                ("q", query),
                ("num", &self.result_count.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        debug!("Search returned {} results", body.items.len());
        Ok(body.items)
    }
}
