use crate::log_debug;

use anyhow::{Result, anyhow};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration structure for the Sitesmith application
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// LLM chat-completion endpoint settings
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
    /// Image-search endpoint settings
    #[serde(default)]
    pub images: ImageConfig,
    /// Generated-document cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Request rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Prompt overrides
    #[serde(default)]
    pub prompts: PromptConfig,
    /// User-facing error messages
    #[serde(default)]
    pub messages: ErrorMessages,
    /// Logging behaviour
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OpenRouter chat-completion settings
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct OpenRouterConfig {
    /// Bearer token for the API
    pub api_key: String,
    /// API root; `/chat/completions` is appended
    pub base_url: String,
    /// Model identifier
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Sent as the `HTTP-Referer` header
    pub referer: String,
    /// Sent as the `X-Title` header
    pub title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "anthropic/claude-3-opus-20240229".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            referer: "http://localhost:3000".to_string(),
            title: "Sitesmith".to_string(),
        }
    }
}

/// Image-search API settings
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    pub api_key: String,
    pub base_url: String,
    /// Images requested when the caller gives no count
    pub max_images: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://pixabay.com/api/".to_string(),
            max_images: 5,
        }
    }
}

/// Cache settings
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub duration_minutes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_cache_minutes(),
        }
    }
}

impl CacheConfig {
    /// Maximum age of a cache entry; zero falls back to the default hour
    pub fn max_age(&self) -> Duration {
        let minutes = if self.duration_minutes == 0 {
            default_cache_minutes()
        } else {
            self.duration_minutes
        };
        Duration::from_secs(minutes.saturating_mul(60))
    }
}

/// Sliding-window rate limit settings
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 50,
            window_ms: 60_000,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Prompt overrides
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PromptConfig {
    /// General system prompt, used when no prompt family applies
    pub general: Option<String>,
}

/// User-facing error messages
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ErrorMessages {
    pub api_key: String,
    pub rate_limit: String,
    pub generation: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            api_key: "API key not found in environment variables".to_string(),
            rate_limit: "Rate limit exceeded. Please try again later".to_string(),
            generation: "Error generating content. Please refine your prompt".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether to include HTTP client logs
    pub verbose: bool,
}

/// Default cache lifetime in minutes
fn default_cache_minutes() -> u64 {
    60
}

/// Environment variable names recognised by [`Config::apply_env_overrides`]
pub mod env {
    pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
    pub const PIXABAY_API_KEY: &str = "PIXABAY_API_KEY";
    pub const IMAGE_API_URL: &str = "SITESMITH_IMAGE_API_URL";
    pub const MAX_IMAGES: &str = "SITESMITH_MAX_IMAGES_PER_REQUEST";
    pub const CACHE_DURATION: &str = "SITESMITH_CACHE_DURATION_MINUTES";
    pub const RATE_LIMIT_MAX: &str = "SITESMITH_RATE_LIMIT_MAX_REQUESTS";
    pub const RATE_LIMIT_WINDOW: &str = "SITESMITH_RATE_LIMIT_WINDOW_MS";
    pub const SYSTEM_PROMPT_GENERAL: &str = "SITESMITH_SYSTEM_PROMPT_GENERAL";
    pub const ERROR_MSG_API_KEY: &str = "SITESMITH_ERROR_MSG_API_KEY";
    pub const ERROR_MSG_RATE_LIMIT: &str = "SITESMITH_ERROR_MSG_RATE_LIMIT";
    pub const ERROR_MSG_GENERATION: &str = "SITESMITH_ERROR_MSG_GENERATION";
    pub const SITE_URL: &str = "SITESMITH_SITE_URL";
}

impl Config {
    /// Load the personal configuration file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        log_debug!("Configuration loaded: {:?}", config.redacted());
        Ok(config)
    }

    /// Load an explicit configuration file, then apply environment overrides
    pub fn load_with_path(path: &Path) -> Result<Self> {
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        log_debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML configuration file without consulting the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;

        toml::from_str(&config_str).map_err(|e| {
            anyhow!(
                "Invalid configuration file format: {}. Please check {} for syntax errors.",
                e,
                path.display()
            )
        })
    }

    /// Overlay values from an environment lookup.
    ///
    /// Numeric variables that are missing, unparsable or zero leave the
    /// current value in place.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(env::OPENROUTER_API_KEY) {
            self.openrouter.api_key = key;
        }
        if let Some(key) = non_empty(env::PIXABAY_API_KEY) {
            self.images.api_key = key;
        }
        if let Some(url) = non_empty(env::IMAGE_API_URL) {
            self.images.base_url = url;
        }
        if let Some(url) = non_empty(env::SITE_URL) {
            self.openrouter.referer = url;
        }
        if let Some(max) = parse_positive::<u32>(non_empty(env::MAX_IMAGES)) {
            self.images.max_images = max;
        }
        if let Some(minutes) = parse_positive::<u64>(non_empty(env::CACHE_DURATION)) {
            self.cache.duration_minutes = minutes;
        }
        if let Some(max) = parse_positive::<usize>(non_empty(env::RATE_LIMIT_MAX)) {
            self.rate_limit.max_requests = max;
        }
        if let Some(window) = parse_positive::<u64>(non_empty(env::RATE_LIMIT_WINDOW)) {
            self.rate_limit.window_ms = window;
        }
        if let Some(prompt) = non_empty(env::SYSTEM_PROMPT_GENERAL) {
            self.prompts.general = Some(prompt);
        }
        if let Some(msg) = non_empty(env::ERROR_MSG_API_KEY) {
            self.messages.api_key = msg;
        }
        if let Some(msg) = non_empty(env::ERROR_MSG_RATE_LIMIT) {
            self.messages.rate_limit = msg;
        }
        if let Some(msg) = non_empty(env::ERROR_MSG_GENERATION) {
            self.messages.generation = msg;
        }
    }

    /// Save the configuration to the personal config file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Save the configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_content = toml::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        log_debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let mut path =
            config_dir().ok_or_else(|| anyhow!("Unable to determine config directory"))?;
        path.push("sitesmith");
        fs::create_dir_all(&path)?;
        path.push("config.toml");
        Ok(path)
    }

    /// Copy of the configuration with API keys masked, for display and logs
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.openrouter.api_key = mask_key(&copy.openrouter.api_key);
        copy.images.api_key = mask_key(&copy.images.api_key);
        copy
    }
}

fn parse_positive<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr + Default + PartialEq,
{
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
}

/// Mask all but the last four characters of a key
fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    let visible: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{visible}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.rate_limit.max_requests, 50);
        assert_eq!(config.rate_limit.window(), Duration::from_secs(60));
        assert_eq!(config.cache.max_age(), Duration::from_secs(3600));
        assert_eq!(config.images.max_images, 5);
        assert_eq!(config.openrouter.max_tokens, 4096);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(lookup(&[
            (env::OPENROUTER_API_KEY, "or-key"),
            (env::PIXABAY_API_KEY, "px-key"),
            (env::CACHE_DURATION, "5"),
            (env::MAX_IMAGES, "8"),
            (env::ERROR_MSG_GENERATION, "Nope"),
        ]));

        assert_eq!(config.openrouter.api_key, "or-key");
        assert_eq!(config.images.api_key, "px-key");
        assert_eq!(config.cache.max_age(), Duration::from_secs(300));
        assert_eq!(config.images.max_images, 8);
        assert_eq!(config.messages.generation, "Nope");
    }

    #[test]
    fn test_bad_numbers_keep_defaults() {
        let mut config = Config::default();
        config.apply_env_overrides(lookup(&[
            (env::CACHE_DURATION, "soon"),
            (env::MAX_IMAGES, "0"),
            (env::RATE_LIMIT_WINDOW, ""),
        ]));

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_zero_cache_duration_falls_back() {
        let cache = CacheConfig {
            duration_minutes: 0,
        };
        assert_eq!(cache.max_age(), Duration::from_secs(3600));
    }

    #[test]
    fn test_huge_cache_duration_saturates() {
        let mut config = Config::default();
        config.apply_env_overrides(lookup(&[(env::CACHE_DURATION, "18446744073709551615")]));

        assert_eq!(config.cache.duration_minutes, u64::MAX);
        assert_eq!(config.cache.max_age(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_redacted_masks_keys() {
        let mut config = Config::default();
        config.openrouter.api_key = "sk-or-123456".to_string();
        let redacted = config.redacted();
        assert_eq!(redacted.openrouter.api_key, "****3456");
        assert_eq!(redacted.images.api_key, "");
    }
}
