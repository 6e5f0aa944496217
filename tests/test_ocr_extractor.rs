use mockito::Server;
use serde_json::json;

use skinsight::error::SkinsightError;
use skinsight::ocr::ImageIngredientExtractor;

fn extractor_for(server: &Server) -> ImageIngredientExtractor {
    ImageIngredientExtractor::with_endpoint(
        "fake_key".to_string(),
        format!("{}/parse/image", server.url()),
    )
}

fn ocr_body(text: &str) -> String {
    json!({
        "IsErroredOnProcessing": false,
        "ParsedResults": [{"ParsedText": text}]
    })
    .to_string()
}

#[tokio::test]
async fn test_extract_returns_clean_list() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/parse/image")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ocr_body(
            "Gentle Daily Cleanser\nIngredients: Aqua, Glycerin, Glydern, Niacinamide\n\nDistributed by Acme Corp",
        ))
        .create_async()
        .await;

    let list = extractor_for(&server)
        .extract(b"fake image bytes")
        .await
        .unwrap();

    // Aqua corrected to Water, Glydern corrected to the Glycerin it already
    // duplicates, end markers cut the distributor line
    assert_eq!(list.names(), ["Water", "Glycerin", "Niacinamide"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_errored_flag_is_hard_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/parse/image")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "IsErroredOnProcessing": true,
                "ErrorMessage": ["image too blurry"]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let result = extractor_for(&server).extract(b"fake image bytes").await;
    match result {
        Err(SkinsightError::Ocr(message)) => assert!(message.contains("blurry")),
        other => panic!("expected Ocr error, got {:?}", other.map(|l| l.names().to_vec())),
    }
}

#[tokio::test]
async fn test_non_success_status_is_hard_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/parse/image")
        .with_status(403)
        .with_body("forbidden")
        .create_async()
        .await;

    let result = extractor_for(&server).extract(b"fake image bytes").await;
    assert!(matches!(result, Err(SkinsightError::Ocr(_))));
}

#[tokio::test]
async fn test_text_without_ingredients_is_unreadable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/parse/image")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ocr_body("XY"))
        .create_async()
        .await;

    let result = extractor_for(&server).extract(b"fake image bytes").await;
    assert!(matches!(result, Err(SkinsightError::ImageUnreadable)));
}

#[tokio::test]
async fn test_raw_text_is_not_post_processed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/parse/image")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ocr_body("Some Brand Serum 30ml"))
        .create_async()
        .await;

    let raw = extractor_for(&server)
        .extract_raw_text(b"fake image bytes")
        .await
        .unwrap();
    assert_eq!(raw, "Some Brand Serum 30ml");
}
