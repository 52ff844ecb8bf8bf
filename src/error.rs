//! Error types shared by the services, agents and the playground session.

use thiserror::Error;

/// Convenience alias used throughout the library
pub type Result<T> = std::result::Result<T, SiteError>;

/// Every failure the generation pipeline can surface.
///
/// The message-carrying variants hold the user-facing text resolved from
/// configuration, so callers can show `to_string()` directly.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A required API key is not configured
    #[error("{0}")]
    MissingApiKey(String),

    /// The sliding-window limiter rejected the request
    #[error("{0}")]
    RateLimited(String),

    /// An upstream API answered with a non-success status
    #[error("{service} API error: {status}")]
    Upstream { service: &'static str, status: u16 },

    /// The HTTP request never produced a response
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream body could not be interpreted
    #[error("{service} returned a malformed response: {reason}")]
    MalformedResponse {
        service: &'static str,
        reason: String,
    },

    /// Catch-all raised by the orchestrator and the generating agents
    #[error("{0}")]
    Generation(String),

    /// The user submitted something that cannot be processed
    #[error("{0}")]
    InvalidInput(String),

    /// A playground action (revision, element edit) failed
    #[error("{0}")]
    ActionFailed(String),
}

impl SiteError {
    /// Build a transport error for the given upstream service
    pub fn transport(service: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { service, source }
    }

    /// Build a malformed-response error for the given upstream service
    pub fn malformed(service: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            service,
            reason: reason.into(),
        }
    }

    /// Whether this error came from the rate limiter
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}
