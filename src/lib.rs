//! Sitesmith - AI website generator playground
//!
//! Turns a natural-language description into a self-contained web page by
//! running an image search, a layout stage and an LLM code generator in
//! sequence, with caching, rate limiting and version history around it.

#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::format_push_string)] // Prompt assembly reads better this way
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough

pub mod agents;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod logger;
pub mod playground;
pub mod prompts;
pub mod services;
pub mod types;
pub mod ui;

// Re-export important structs and functions for easier testing
pub use agents::{Agent, AgentOrchestrator};
pub use config::Config;
pub use error::{Result, SiteError};
pub use history::{Version, VersionManager};
pub use playground::{EditKind, Playground};
pub use types::{GenerationRequest, GenerationResult};
