use std::sync::Arc;

use mockito::Server;
use serde_json::json;

use skinsight::analysis::StructuredAnalysisClient;
use skinsight::llm::GroqBackend;
use skinsight::model::{SafetyRating, SkinProfile, SkinType};
use skinsight::IngredientList;

fn client_for(server: &Server) -> StructuredAnalysisClient {
    let backend = GroqBackend::with_base_url(
        "fake_api_key".to_string(),
        server.url(),
        "gemma2-9b-it".to_string(),
    );
    StructuredAnalysisClient::new(Arc::new(backend))
}

fn profile() -> SkinProfile {
    SkinProfile::new(SkinType::Normal, vec![])
}

#[tokio::test]
async fn test_backend_500_returns_placeholder_report() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let ingredients = IngredientList::from_raw_text("Water");
    let report = client_for(&server)
        .analyze(&ingredients, &profile(), None)
        .await;

    assert_eq!(report.ingredients.len(), 1);
    assert_eq!(report.ingredients[0].name, "Unknown");
    assert_eq!(report.ingredients[0].safety, SafetyRating::Caution);
    assert_eq!(report.overall_assessment.safety_rating, SafetyRating::Caution);
}

#[tokio::test]
async fn test_unrepairable_response_returns_placeholder_report() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"choices": [{"message": {"content": "I cannot produce JSON today."}}]})
                .to_string(),
        )
        .create_async()
        .await;

    let ingredients = IngredientList::from_raw_text("Water, Glycerin");
    let report = client_for(&server)
        .analyze(&ingredients, &profile(), None)
        .await;

    // no partial credit: the whole analysis downgrades
    assert_eq!(report.ingredients.len(), 1);
    assert_eq!(report.ingredients[0].name, "Unknown");
}

#[tokio::test]
async fn test_schema_violation_returns_placeholder_report() {
    // parseable JSON, but the enum value is outside the schema
    let bad = json!({
        "overall_assessment": {
            "safety_rating": "mostly-fine",
            "barrier_impact": "neutral",
            "allergy_risk": "low",
            "suitability_score": 4,
            "key_concerns": [],
            "personalized_notes": ""
        },
        "ingredients": []
    })
    .to_string();

    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"message": {"content": bad}}]}).to_string())
        .create_async()
        .await;

    let ingredients = IngredientList::from_raw_text("Water");
    let report = client_for(&server)
        .analyze(&ingredients, &profile(), None)
        .await;

    assert_eq!(report.ingredients[0].name, "Unknown");
}

#[tokio::test]
async fn test_source_url_attached_even_when_degraded() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("down")
        .create_async()
        .await;

    let ingredients = IngredientList::from_raw_text("Water");
    let report = client_for(&server)
        .analyze(&ingredients, &profile(), Some("https://example.com/product"))
        .await;

    assert_eq!(
        report.source_url.as_deref(),
        Some("https://example.com/product")
    );
}
