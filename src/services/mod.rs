//! Stateful helpers and HTTP backends used by the agents and the playground

pub mod cache;
pub mod openrouter;
pub mod parser;
pub mod pixabay;
pub mod rate_limiter;

pub use cache::CacheService;
pub use openrouter::{CompletionClient, OpenRouterService};
pub use parser::CodeBlockParser;
pub use pixabay::{ImageSearch, PixabayClient, PixabayHit, PixabayResponse};
pub use rate_limiter::RateLimiter;
