//! Integration tests against a live gateway.
//!
//! These tests require a valid AI_GATEWAY_API_KEY (or alias) environment
//! variable. Run with: cargo test -- --ignored

use elizaos_plugin_aigateway::{
    EmbeddingParams, GatewayPlugin, ImageDescriptionParams, TextGenerationParams,
};
use futures::StreamExt;

async fn create_test_plugin() -> GatewayPlugin {
    dotenvy::dotenv().ok();
    GatewayPlugin::from_env()
        .await
        .expect("AI_GATEWAY_API_KEY must be set. Create a .env file with AI_GATEWAY_API_KEY=your-key")
}

#[tokio::test]
#[ignore = "Requires AI_GATEWAY_API_KEY"]
async fn test_generate_text_small() {
    let plugin = create_test_plugin().await;
    let response = plugin
        .generate_text_small("Say hello in exactly 3 words.")
        .await
        .expect("Failed to generate text");

    assert!(!response.is_empty());
    let words: Vec<&str> = response.split_whitespace().collect();
    assert!(words.len() <= 10, "Response too long: {}", response);
}

#[tokio::test]
#[ignore = "Requires AI_GATEWAY_API_KEY"]
async fn test_stream_text() {
    let plugin = create_test_plugin().await;
    let params = TextGenerationParams::new("Count from 1 to 5.").streaming();
    let mut stream = plugin.stream_text(&params).await.expect("Failed to open stream");

    let mut collected = String::new();
    while let Some(chunk) = stream.next().await {
        collected.push_str(&chunk.expect("Stream chunk failed"));
    }
    assert!(!collected.is_empty());
}

#[tokio::test]
#[ignore = "Requires AI_GATEWAY_API_KEY"]
async fn test_create_embedding() {
    let plugin = create_test_plugin().await;
    let embedding = plugin
        .create_embedding("Hello, world!")
        .await
        .expect("Failed to create embedding");

    assert_eq!(embedding.len(), 1536);
    assert!(embedding.iter().all(|v| v.is_finite()));
}

#[tokio::test]
#[ignore = "Requires AI_GATEWAY_API_KEY"]
async fn test_generate_object() {
    let plugin = create_test_plugin().await;
    let object = plugin
        .generate_object_small(
            "Return a JSON object with fields: name (string) and age (number). \
             Use values: name='Test', age=25",
        )
        .await
        .expect("Failed to generate object");

    assert!(object.is_object());
}

#[tokio::test]
#[ignore = "Requires AI_GATEWAY_API_KEY"]
async fn test_describe_image() {
    let plugin = create_test_plugin().await;
    let params = ImageDescriptionParams::new(
        "https://images.unsplash.com/photo-1518791841217-8f162f1e1131?w=400",
    );
    let result = plugin
        .describe_image(&params)
        .await
        .expect("Failed to describe image");

    assert!(!result.title.is_empty());
    assert!(!result.description.is_empty());
}

#[tokio::test]
#[ignore = "Requires AI_GATEWAY_API_KEY"]
async fn test_list_models() {
    let plugin = create_test_plugin().await;
    let models = plugin.list_models(false).await.expect("Failed to list models");
    assert!(!models.is_empty());
}

#[tokio::test]
#[ignore = "Requires AI_GATEWAY_API_KEY"]
async fn test_embedding_via_params() {
    let plugin = create_test_plugin().await;
    let params = EmbeddingParams::new("consistency check").dimensions(1536);
    let embedding = plugin
        .client()
        .create_embedding(&params)
        .await
        .expect("Failed to create embedding");
    assert_eq!(embedding.len(), 1536);
}
