//! Ingredient resolution from a free-text product name: web search, page
//! fetch, layered extraction.

mod cleanup;
mod search;
mod strategies;

pub use search::{SearchClient, SearchHit};
pub use strategies::extract_ingredient_block;

use log::{debug, info, warn};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SkinsightError;
use crate::model::IngredientList;
use crate::normalize;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Known brands and their official domains, used to bias the search query
/// toward first-party ingredient pages. Read-only static data.
const BRAND_DOMAINS: &[(&str, &str)] = &[
    ("cerave", "cerave.com"),
    ("cetaphil", "cetaphil.com"),
    ("the ordinary", "theordinary.com"),
    ("neutrogena", "neutrogena.com"),
    ("la roche-posay", "laroche-posay.us"),
    ("paula's choice", "paulaschoice.com"),
    ("olay", "olay.com"),
    ("garnier", "garnier.com"),
    ("vichy", "vichy.com"),
    ("eucerin", "eucerin.com"),
];

/// A successfully resolved ingredient list and the page it came from.
#[derive(Debug, Clone)]
pub struct ResolvedIngredients {
    pub ingredients: IngredientList,
    pub source_url: String,
}

/// Resolves a product name to an ingredient list via web search.
pub struct WebIngredientResolver {
    search: SearchClient,
    client: Client,
}

impl WebIngredientResolver {
    pub fn new(config: &SearchConfig, timeout: Duration) -> Result<Self, SkinsightError> {
        Ok(Self {
            search: SearchClient::new(config, timeout)?,
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()?,
        })
    }

    #[doc(hidden)]
    pub fn with_search_client(search: SearchClient) -> Self {
        Self {
            search,
            client: Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Resolve a product name to its ingredient list.
    ///
    /// Returns `None` on any total miss — no search results, every fetch
    /// failed, no strategy matched. Absence of ingredients is an expected
    /// outcome here, not a defect.
    pub async fn resolve(&self, product_name: &str) -> Option<ResolvedIngredients> {
        let hits = self.run_search(product_name).await;
        if hits.is_empty() {
            warn!("No search results for '{}'", product_name);
            return None;
        }

        for hit in hits {
            let html = match self.fetch_page(&hit.url).await {
                Ok(html) => html,
                Err(e) => {
                    debug!("Fetch failed for {}: {}", hit.url, e);
                    continue;
                }
            };

            let document = Html::parse_document(&html);
            if let Some(raw_block) = strategies::extract_ingredient_block(&document) {
                let block = cleanup::clean_ingredient_block(&raw_block);
                let ingredients = block_to_list(&block);
                if !ingredients.is_empty() {
                    info!("Resolved '{}' via {}", product_name, hit.url);
                    return Some(ResolvedIngredients {
                        ingredients,
                        source_url: hit.url,
                    });
                }
            }
        }

        warn!("No extraction strategy matched for '{}'", product_name);
        None
    }

    /// Biased query first when the name carries a known brand token, one
    /// unbiased retry when that returns nothing.
    async fn run_search(&self, product_name: &str) -> Vec<SearchHit> {
        let base_query = format!("{} ingredients", product_name);

        if let Some(domain) = brand_domain(product_name) {
            let biased = format!("{} site:{}", base_query, domain);
            match self.search.search(&biased).await {
                Ok(hits) if !hits.is_empty() => return hits,
                Ok(_) => debug!("Biased query empty, retrying unbiased"),
                Err(e) => warn!("Biased search failed: {}", e),
            }
        }

        match self.search.search(&base_query).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Search failed for '{}': {}", product_name, e);
                Vec::new()
            }
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String, SkinsightError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Look up the official domain for a recognized brand token in the name.
fn brand_domain(product_name: &str) -> Option<&'static str> {
    let lower = product_name.to_lowercase();
    BRAND_DOMAINS
        .iter()
        .find(|(brand, _)| lower.contains(brand))
        .map(|(_, domain)| *domain)
}

/// Turn a cleaned text block into an ingredient list: normalize bullet
/// separators, strip parentheticals and digits, split on commas, drop
/// short fragments, title-case, dedup.
fn block_to_list(block: &str) -> IngredientList {
    let block = normalize::bullets_to_commas(block);
    let block = normalize::strip_parentheticals(&block);
    let block = normalize::strip_digits(&block);

    let names = block
        .split(',')
        .map(str::trim)
        .filter(|fragment| fragment.len() >= 3)
        .map(normalize::title_case)
        .collect();

    IngredientList::from_names(names)
}
