use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// OCR service configuration
    #[serde(default)]
    pub ocr: OcrConfig,
    /// Web search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Generative backend configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Request timeout in seconds for all outbound calls
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for the OCR service
#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    /// API key for the OCR service (can also be set via OCR_SPACE_API_KEY)
    pub api_key: Option<String>,
    /// Endpoint URL (overridable for tests)
    #[serde(default = "default_ocr_endpoint")]
    pub endpoint: String,
}

/// Configuration for the web search service
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// API key (can also be set via GOOGLE_API_KEY)
    pub api_key: Option<String>,
    /// Custom search engine id (can also be set via GOOGLE_CX)
    pub cx: Option<String>,
    /// Endpoint URL (overridable for tests)
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    /// How many ranked results to request per query
    #[serde(default = "default_result_count")]
    pub result_count: u8,
}

/// Configuration for the generative text backend
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// API key (can also be set via GROQ_API_KEY)
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            search: SearchConfig::default(),
            llm: LlmConfig::default(),
            timeout: default_timeout(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OCR_SPACE_API_KEY").ok(),
            endpoint: default_ocr_endpoint(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("GOOGLE_API_KEY").ok(),
            cx: std::env::var("GOOGLE_CX").ok(),
            endpoint: default_search_endpoint(),
            result_count: default_result_count(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("GROQ_API_KEY").ok(),
            base_url: default_llm_base_url(),
            model: default_model(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_ocr_endpoint() -> String {
    "https://api.ocr.space/parse/image".to_string()
}

fn default_search_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai".to_string()
}

fn default_model() -> String {
    "gemma2-9b-it".to_string()
}

fn default_result_count() -> u8 {
    3
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with SKINSIGHT__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values (which read the conventional bare env vars)
    ///
    /// Environment variable format: SKINSIGHT__LLM__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Use double underscore for nested: SKINSIGHT__SEARCH__API_KEY
            .add_source(
                Environment::with_prefix("SKINSIGHT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
