//! Sliding-window request limiter

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{Result, SiteError};
use crate::log_debug;

/// Key used for every request made from the playground
pub const DEFAULT_KEY: &str = "default";

/// Per-key sliding-window limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    requests: HashMap<String, Vec<Instant>>,
    max_requests: usize,
    window: Duration,
    message: String,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration, message: impl Into<String>) -> Self {
        Self {
            requests: HashMap::new(),
            max_requests,
            window,
            message: message.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.rate_limit.max_requests,
            config.rate_limit.window(),
            config.messages.rate_limit.clone(),
        )
    }

    /// Record a request for `key`, failing when the window is already full
    pub fn check_limit(&mut self, key: &str) -> Result<()> {
        self.check_limit_at(key, Instant::now())
    }

    pub fn check_limit_at(&mut self, key: &str, now: Instant) -> Result<()> {
        let window = self.window;
        let timestamps = self.requests.entry(key.to_string()).or_default();
        timestamps.retain(|ts| now.saturating_duration_since(*ts) < window);

        if timestamps.len() >= self.max_requests {
            log_debug!(
                "Rate limit hit for '{}': {} requests in {:?}",
                key,
                timestamps.len(),
                window
            );
            return Err(SiteError::RateLimited(self.message.clone()));
        }

        timestamps.push(now);
        Ok(())
    }

    pub fn can_make_request(&mut self) -> Result<()> {
        self.check_limit(DEFAULT_KEY)
    }

    pub fn can_make_request_at(&mut self, now: Instant) -> Result<()> {
        self.check_limit_at(DEFAULT_KEY, now)
    }

    /// Requests currently counted against `key`
    pub fn recorded(&self, key: &str) -> usize {
        self.requests.get(key).map_or(0, Vec::len)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
