#![allow(clippy::unwrap_used)]

use sitesmith::agents::{Agent, ImageAgent};
use sitesmith::types::ImageSearchParams;
use std::sync::Arc;

use test_utils::{FakeImageSearch, config_with_keys, hit, hits};

#[tokio::test]
async fn test_image_agent_shapes_hits() {
    let search = Arc::new(FakeImageSearch::with_hits(vec![hit(9, 1920, 1080)]));
    let agent = ImageAgent::new(search.clone(), &config_with_keys());

    let result = agent
        .process(ImageSearchParams::new("sunset beach"))
        .await
        .unwrap();

    assert_eq!(result.images.len(), 1);
    let image = &result.images[0];
    assert_eq!(image.url, "https://cdn.pixabay.test/photo-9.jpg");
    assert_eq!(image.alt, "gallery, photo, art");
    assert_eq!(image.source, "Pixabay");
    assert_eq!(image.attribution.as_deref(), Some("Photo by photographer9"));
    assert_eq!(result.meta.query, "sunset beach");
    assert_eq!(result.meta.total, 1);
    assert_eq!(ImageAgent::suggest_image_layout(&result.images), "hero");

    let history = agent.message_history();
    assert_eq!(history[0].kind, "image_search");
    assert_eq!(history[0].agent, "image");
}

#[tokio::test]
async fn test_image_agent_count_defaults_to_config() {
    let search = Arc::new(FakeImageSearch::with_hits(hits(10)));
    let mut config = config_with_keys();
    config.images.max_images = 7;
    let agent = ImageAgent::new(search.clone(), &config);

    let result = agent.process(ImageSearchParams::new("forest")).await.unwrap();
    assert_eq!(result.images.len(), 7);
    assert_eq!(search.calls()[0].count, Some(7));
    assert_eq!(ImageAgent::suggest_image_layout(&result.images), "gallery");
}

#[tokio::test]
async fn test_image_agent_requires_key() {
    let search = Arc::new(FakeImageSearch::without_credentials());
    let agent = ImageAgent::new(search.clone(), &config_with_keys());

    let err = agent
        .process(ImageSearchParams::new("forest"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "API key not found in environment variables");
    assert!(search.calls().is_empty());
}

#[tokio::test]
async fn test_image_agent_passes_upstream_errors_through() {
    let agent = ImageAgent::new(Arc::new(FakeImageSearch::failing(429)), &config_with_keys());

    let err = agent
        .process(ImageSearchParams::new("forest"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Pixabay API error: 429");
}

#[tokio::test]
async fn test_image_agent_zero_count_uses_config() {
    let search = Arc::new(FakeImageSearch::with_hits(hits(8)));
    let agent = ImageAgent::new(search.clone(), &config_with_keys());

    let result = agent
        .process(ImageSearchParams::new("harbor").with_count(Some(0)))
        .await
        .unwrap();
    assert_eq!(search.calls()[0].count, Some(5));
    assert_eq!(result.images.len(), 5);

    agent
        .process(ImageSearchParams::new("harbor").with_count(Some(2)))
        .await
        .unwrap();
    assert_eq!(search.calls()[1].count, Some(2));
}
