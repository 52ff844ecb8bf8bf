//! Generation agents
//!
//! The orchestrator drives three stages in order: image search, layout,
//! then code generation. The browser agent classifies raw input.

pub mod browser;
pub mod codegen;
pub mod core;
pub mod image;
pub mod layout;
pub mod orchestrator;

pub use browser::{BrowserAgent, InputAnalysis, InputKind, InputRequirements};
pub use codegen::CodeGenAgent;
pub use core::{Agent, AgentJournal, AgentMessage};
pub use image::ImageAgent;
pub use layout::{LayoutAgent, LayoutKind};
pub use orchestrator::AgentOrchestrator;
