use thiserror::Error;

/// Errors that can occur during ingredient extraction and analysis
#[derive(Error, Debug)]
pub enum SkinsightError {
    /// Failed to reach an external service
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Required credential is not configured
    #[error("Missing credential: {0} not found in config or environment")]
    MissingCredential(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// OCR service reported a processing failure
    #[error("OCR processing failed: {0}")]
    Ocr(String),

    /// Generative backend returned an unusable response envelope
    #[error("Generative backend error: {0}")]
    Backend(String),

    /// OCR succeeded but no ingredient-bearing text was recoverable
    #[error("Could not read an ingredient list from the image")]
    ImageUnreadable,

    /// Web resolution found no ingredient list for the product
    #[error("Could not find ingredients for product: {0}")]
    ProductNotFound(String),

    /// Input could not be routed to any pipeline
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
