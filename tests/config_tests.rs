use sitesmith::config::Config;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_partial_file_keeps_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[openrouter]
model = "openai/gpt-4o-mini"

[rate_limit]
max_requests = 5
"#,
    )
    .expect("Failed to write config file");

    let config = Config::load_from(&path).expect("Failed to load config");

    assert_eq!(config.openrouter.model, "openai/gpt-4o-mini");
    assert_eq!(config.openrouter.base_url, "https://openrouter.ai/api/v1");
    assert_eq!(config.rate_limit.max_requests, 5);
    assert_eq!(config.rate_limit.window_ms, 60_000);
    assert_eq!(config.images.max_images, 5);
    assert_eq!(
        config.messages.rate_limit,
        "Rate limit exceeded. Please try again later"
    );
}

#[test]
fn test_save_and_reload() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join("config.toml");

    let mut config = Config::default();
    config.cache.duration_minutes = 15;
    config.prompts.general = Some("Prefer minimal designs.".to_string());
    config.save_to(&path).expect("Failed to save config");

    let loaded = Config::load_from(&path).expect("Failed to reload config");
    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_file_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "[openrouter\nmodel = ").expect("Failed to write config file");

    let err = Config::load_from(&path).expect_err("broken TOML must not load");
    assert!(err.to_string().contains("broken.toml"));
}
