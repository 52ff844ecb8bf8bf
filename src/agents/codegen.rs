//! Code generation stage

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use super::core::{Agent, AgentJournal};
use crate::config::Config;
use crate::error::{Result, SiteError};
use crate::log_error;
use crate::prompts::{PromptFamily, PromptType};
use crate::services::CompletionClient;
use crate::types::{GenerationMeta, GenerationOptions, GenerationResult, GenerationState};

/// Image summary handed to the model
#[derive(Debug, Serialize)]
struct ImageBrief<'a> {
    url: &'a str,
    alt: &'a str,
    dimensions: String,
}

pub struct CodeGenAgent {
    client: Arc<dyn CompletionClient>,
    generation_message: String,
    journal: AgentJournal,
}

impl CodeGenAgent {
    pub fn new(client: Arc<dyn CompletionClient>, config: &Config) -> Self {
        Self {
            client,
            generation_message: config.messages.generation.clone(),
            journal: AgentJournal::new("codeGen"),
        }
    }

    /// Full prompt: composed request, requirements, images and layout hint
    pub fn build_prompt(&self, state: &GenerationState) -> Result<String> {
        let mut prompt = self.construct_prompt(&state.content, PromptType::Initial);

        if let Some(requirements) = &state.requirements {
            let pretty = serde_json::to_string_pretty(requirements)
                .map_err(|e| SiteError::Generation(e.to_string()))?;
            prompt.push_str(&format!("\n\nRequirements:\n{pretty}"));
        }

        if let Some(images) = &state.images
            && !images.processed.is_empty()
        {
            let briefs: Vec<ImageBrief<'_>> = images
                .processed
                .iter()
                .map(|img| ImageBrief {
                    url: &img.url,
                    alt: &img.alt,
                    dimensions: format!("{}x{}", img.width, img.height),
                })
                .collect();
            let pretty = serde_json::to_string_pretty(&briefs)
                .map_err(|e| SiteError::Generation(e.to_string()))?;
            prompt.push_str(&format!("\n\nInclude these images:\n{pretty}"));

            if let Some(layout) = images.layout.as_deref().filter(|l| !l.is_empty()) {
                prompt.push_str(&format!("\n\nUse this layout style: {layout}"));
            }
        }

        Ok(prompt)
    }

    async fn generate(&self, state: &GenerationState) -> Result<GenerationResult> {
        let prompt = self.build_prompt(state)?;
        let code = self
            .client
            .generate_code(&prompt, &GenerationOptions::default())
            .await?;

        let images = state.images.as_ref();
        Ok(GenerationResult {
            html: code.html,
            css: code.css,
            js: code.js,
            meta: GenerationMeta {
                generated_at: Utc::now(),
                image_count: Some(images.map_or(0, |i| i.processed.len())),
                layout: Some(
                    images
                        .and_then(|i| i.layout.clone())
                        .unwrap_or_else(|| "default".to_string()),
                ),
            },
        })
    }
}

#[async_trait]
impl Agent for CodeGenAgent {
    type Input = GenerationState;
    type Output = GenerationResult;

    fn name(&self) -> &'static str {
        "codeGen"
    }

    fn journal(&self) -> &AgentJournal {
        &self.journal
    }

    fn prompt_family(&self) -> PromptFamily {
        PromptFamily::Code
    }

    async fn process(&self, state: GenerationState) -> Result<GenerationResult> {
        let has_images = state
            .images
            .as_ref()
            .is_some_and(|i| !i.processed.is_empty());
        self.journal.record(
            "generation",
            json!({ "type": "generation", "content": state.content, "hasImages": has_images }),
        );

        self.generate(&state).await.map_err(|e| {
            log_error!("Code generation error: {}", e);
            SiteError::Generation(self.generation_message.clone())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{GeneratedCode, ImageData, ProcessedImage, StateRequirements};

    struct EchoClient;

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn generate_code(
            &self,
            prompt: &str,
            _options: &GenerationOptions,
        ) -> Result<GeneratedCode> {
            Ok(GeneratedCode {
                html: "<p>ok</p>".to_string(),
                raw: prompt.to_string(),
                ..GeneratedCode::default()
            })
        }
    }

    struct FailingClient;

    #[async_trait]
    impl CompletionClient for FailingClient {
        async fn generate_code(&self, _: &str, _: &GenerationOptions) -> Result<GeneratedCode> {
            Err(SiteError::Upstream {
                service: "OpenRouter",
                status: 500,
            })
        }
    }

    fn agent(client: Arc<dyn CompletionClient>) -> CodeGenAgent {
        CodeGenAgent::new(client, &Config::default())
    }

    #[test]
    fn test_prompt_sections() {
        let state = GenerationState {
            content: "a bakery".to_string(),
            requirements: Some(StateRequirements::default()),
            images: Some(ImageData {
                processed: vec![ProcessedImage {
                    url: "https://cdn.example/bread.jpg".to_string(),
                    alt: "bread".to_string(),
                    width: 640,
                    height: 480,
                    source: "Pixabay".to_string(),
                    license: "Pixabay License".to_string(),
                    attribution: None,
                }],
                layout: Some("single".to_string()),
            }),
        };
        let prompt = agent(Arc::new(EchoClient)).build_prompt(&state).unwrap();

        assert!(prompt.starts_with("Focus on generating semantic HTML"));
        assert!(prompt.contains("\n\nUser Request: a bakery\n\nRequirements:\n{}"));
        assert!(prompt.contains("\"dimensions\": \"640x480\""));
        assert!(prompt.ends_with("\n\nUse this layout style: single"));
    }

    #[test]
    fn test_prompt_without_images() {
        let state = GenerationState {
            content: "a blog".to_string(),
            ..GenerationState::default()
        };
        let prompt = agent(Arc::new(EchoClient)).build_prompt(&state).unwrap();
        assert!(prompt.ends_with("User Request: a blog"));
    }

    #[tokio::test]
    async fn test_meta_defaults() {
        let agent = agent(Arc::new(EchoClient));
        let result = agent
            .process(GenerationState {
                content: "x".to_string(),
                ..GenerationState::default()
            })
            .await
            .unwrap();

        assert_eq!(result.html, "<p>ok</p>");
        assert_eq!(result.meta.image_count, Some(0));
        assert_eq!(result.meta.layout.as_deref(), Some("default"));
        assert_eq!(agent.message_history()[0].content["hasImages"], false);
    }

    #[tokio::test]
    async fn test_failures_become_generic() {
        let err = agent(Arc::new(FailingClient))
            .process(GenerationState::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error generating content. Please refine your prompt"
        );
    }
}
