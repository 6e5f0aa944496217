//! Personalized skincare-ingredient analysis.
//!
//! The core pipeline turns a product — a label photo, a product name, or a
//! raw ingredient list — into a structured, profile-specific safety
//! assessment:
//!
//! ```text
//! input -> ClassificationRouter -> { ImageIngredientExtractor
//!                                  | WebIngredientResolver
//!                                  | passthrough } -> StructuredAnalysisClient
//! ```
//!
//! The generative backend is treated as unreliable by construction: its
//! output runs through a repair/validate/complete protocol
//! ([`llm::repair`]) that guarantees a schema-conforming
//! [`model::AnalysisReport`] with one assessment entry per input
//! ingredient, degrading to an explicit placeholder report rather than
//! failing.

pub mod agent;
pub mod analysis;
pub mod classify;
pub mod config;
pub mod error;
pub mod llm;
pub mod model;
pub mod normalize;
pub mod ocr;
pub mod routine;
pub mod store;
pub mod web;

pub use agent::{AnalysisInput, SkincareAgent};
pub use analysis::StructuredAnalysisClient;
pub use classify::ClassificationRouter;
pub use config::AppConfig;
pub use error::SkinsightError;
pub use model::{
    AnalysisReport, Classification, ComparisonVerdict, IngredientList, RoutineDocument,
    SkinProfile, SkinType, TimeOfDay,
};
pub use ocr::ImageIngredientExtractor;
pub use routine::RoutineSynthesizer;
pub use store::{MemoryStore, ReportStore};
pub use web::{ResolvedIngredients, WebIngredientResolver};
