//! Classifies address-bar input before generation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::core::{Agent, AgentJournal};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRequirements {
    pub has_images: bool,
    pub has_interactivity: bool,
    pub has_animation: bool,
    pub layout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAnalysis {
    #[serde(rename = "type")]
    pub kind: InputKind,
    pub content: String,
    pub requirements: InputRequirements,
    pub needs_images: bool,
    pub timestamp: DateTime<Utc>,
}

const IMAGE_WORDS: [&str; 4] = ["image", "picture", "photo", "gallery"];

pub struct BrowserAgent {
    journal: AgentJournal,
}

impl BrowserAgent {
    pub fn new() -> Self {
        Self {
            journal: AgentJournal::new("browser"),
        }
    }

    /// Keyword scan of the input
    pub fn extract_requirements(input: &str) -> InputRequirements {
        let lower = input.to_lowercase();
        InputRequirements {
            has_images: lower.contains("image"),
            has_interactivity: lower.contains("button"),
            has_animation: lower.contains("animate"),
            layout: "standard".to_string(),
        }
    }

    pub fn needs_images(input: &str) -> bool {
        let lower = input.to_lowercase();
        IMAGE_WORDS.iter().any(|word| lower.contains(word))
    }
}

impl Default for BrowserAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for BrowserAgent {
    type Input = String;
    type Output = InputAnalysis;

    fn name(&self) -> &'static str {
        "browser"
    }

    fn journal(&self) -> &AgentJournal {
        &self.journal
    }

    async fn process(&self, input: String) -> Result<InputAnalysis> {
        self.journal
            .record("input", json!({ "type": "input", "content": input }));

        let kind = if input.starts_with("http") {
            InputKind::Url
        } else {
            InputKind::Prompt
        };

        Ok(InputAnalysis {
            kind,
            requirements: Self::extract_requirements(&input),
            needs_images: Self::needs_images(&input),
            content: input,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_classifies_urls() {
        let agent = BrowserAgent::new();
        let analysis = agent
            .process("https://example.com".to_string())
            .await
            .unwrap();
        assert_eq!(analysis.kind, InputKind::Url);

        let analysis = agent.process("a blog".to_string()).await.unwrap();
        assert_eq!(analysis.kind, InputKind::Prompt);
        assert_eq!(agent.message_history().len(), 2);
    }

    #[tokio::test]
    async fn test_keyword_requirements() {
        let analysis = BrowserAgent::new()
            .process("Portfolio with an Image slider, a BUTTON and animated cards".to_string())
            .await
            .unwrap();

        assert!(analysis.requirements.has_images);
        assert!(analysis.requirements.has_interactivity);
        assert!(analysis.requirements.has_animation);
        assert_eq!(analysis.requirements.layout, "standard");
        assert!(analysis.needs_images);
    }

    #[test]
    fn test_needs_images_words() {
        assert!(BrowserAgent::needs_images("a photo gallery"));
        assert!(BrowserAgent::needs_images("Pictures of cats"));
        assert!(!BrowserAgent::needs_images("a pricing table"));
        assert!(!BrowserAgent::extract_requirements("a photo gallery").has_images);
    }
}
