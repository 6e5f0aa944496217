use std::sync::Arc;

use mockito::Server;
use serde_json::json;

use skinsight::classify::ClassificationRouter;
use skinsight::llm::GroqBackend;
use skinsight::model::Classification;

fn router_for(server: &Server) -> ClassificationRouter {
    let backend = GroqBackend::with_base_url(
        "fake_api_key".to_string(),
        server.url(),
        "llama3-70b-8192".to_string(),
    );
    ClassificationRouter::with_backend(Arc::new(backend))
}

fn chat_body(content: &str) -> String {
    json!({"choices": [{"message": {"content": content}}]}).to_string()
}

#[tokio::test]
async fn test_llm_classifies_product_name() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body(
            r#"{"type": "product", "product_name": "CeraVe Foaming Cleanser"}"#,
        ))
        .create_async()
        .await;

    let classification = router_for(&server)
        .classify("CeraVe Foaming Cleanser 236ml for normal to oily skin")
        .await;
    assert_eq!(
        classification,
        Classification::ProductName("CeraVe Foaming Cleanser".to_string())
    );
}

#[tokio::test]
async fn test_llm_classifies_ingredient_list() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body(
            r#"{"type": "ingredients", "ingredients": "Water, Glycerin, Niacinamide"}"#,
        ))
        .create_async()
        .await;

    let classification = router_for(&server)
        .classify("Aqua, Glycerin 5%, Niacinamide")
        .await;
    assert_eq!(
        classification,
        Classification::Ingredients("Water, Glycerin, Niacinamide".to_string())
    );
}

#[tokio::test]
async fn test_schema_violation_falls_back_to_product_name() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body(r#"{"type": "both", "product_name": "x"}"#))
        .create_async()
        .await;

    let classification = router_for(&server).classify("Mystery input").await;
    assert_eq!(
        classification,
        Classification::ProductName("Mystery input".to_string())
    );
}

#[tokio::test]
async fn test_backend_failure_falls_back_to_product_name() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("down")
        .create_async()
        .await;

    let classification = router_for(&server).classify("Mystery input").await;
    assert_eq!(
        classification,
        Classification::ProductName("Mystery input".to_string())
    );
}
