//! Runs the image, layout and code generation stages in order

use std::sync::Arc;

use super::codegen::CodeGenAgent;
use super::core::Agent;
use super::image::ImageAgent;
use super::layout::LayoutAgent;
use crate::config::Config;
use crate::error::{Result, SiteError};
use crate::services::{CompletionClient, ImageSearch};
use crate::types::{
    GenerationMeta, GenerationRequest, GenerationResult, GenerationState, ImageData,
    ImageSearchParams, LayoutConstraints, LayoutElement, LayoutRequirements, StateRequirements,
};
use crate::{log_debug, log_error};

pub struct AgentOrchestrator {
    image_agent: ImageAgent,
    layout_agent: LayoutAgent,
    code_agent: CodeGenAgent,
    generation_message: String,
}

impl AgentOrchestrator {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        images: Arc<dyn ImageSearch>,
        config: &Config,
    ) -> Self {
        Self {
            image_agent: ImageAgent::new(images, config),
            layout_agent: LayoutAgent::new(),
            code_agent: CodeGenAgent::new(completion, config),
            generation_message: config.messages.generation.clone(),
        }
    }

    pub fn image_agent(&self) -> &ImageAgent {
        &self.image_agent
    }

    pub fn layout_agent(&self) -> &LayoutAgent {
        &self.layout_agent
    }

    pub fn code_agent(&self) -> &CodeGenAgent {
        &self.code_agent
    }

    /// Generate a page; any stage failure surfaces as the generic generation error
    #[tracing::instrument(name = "pipeline", skip_all, fields(layout = request.layout()))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        self.run(request).await.map_err(|e| {
            log_error!("Generation orchestration error: {}", e);
            SiteError::Generation(self.generation_message.clone())
        })
    }

    async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let image_data = self.fetch_images(request).await?;

        let requested_layout = request
            .layout()
            .map(str::to_string)
            .or_else(|| image_data.as_ref().and_then(|d| d.layout.clone()));

        let layout_result = match requested_layout {
            Some(layout_type) => {
                let requirements = LayoutRequirements {
                    layout_type: Some(layout_type),
                    elements: Self::determine_layout_elements(request, image_data.as_ref()),
                    constraints: Some(LayoutConstraints {
                        responsive: Some(true),
                        ..LayoutConstraints::default()
                    }),
                };
                Some(self.layout_agent.process(requirements).await?)
            }
            None => None,
        };

        let layout_css = layout_result.as_ref().map(|l| l.css.clone());
        let layout_name = layout_result
            .as_ref()
            .map_or_else(|| "standard".to_string(), |l| l.layout.clone());

        let state = GenerationState {
            content: request.content.clone(),
            requirements: Some(StateRequirements::merge(
                request.requirements.as_ref(),
                layout_result,
            )),
            images: image_data,
        };

        let result = self.code_agent.process(state).await?;

        Ok(GenerationResult {
            css: Self::combine_css(&result.css, layout_css.as_deref()),
            html: result.html,
            js: result.js,
            meta: GenerationMeta {
                layout: Some(layout_name),
                ..result.meta
            },
        })
    }

    async fn fetch_images(&self, request: &GenerationRequest) -> Result<Option<ImageData>> {
        let Some(images) = request.image_query() else {
            return Ok(None);
        };

        let params = ImageSearchParams::new(images.query.clone().unwrap_or_default())
            .with_count(images.count)
            .with_image_type(images.image_type);
        let result = self.image_agent.process(params).await?;

        if result.images.is_empty() {
            log_debug!("Image search returned nothing; continuing without images");
            return Ok(None);
        }

        let layout = ImageAgent::suggest_image_layout(&result.images);
        Ok(Some(ImageData {
            processed: result.images,
            layout: Some(layout.to_string()),
        }))
    }

    /// Blocks the page should contain, derived from images and content words
    pub fn determine_layout_elements(
        request: &GenerationRequest,
        image_data: Option<&ImageData>,
    ) -> Vec<LayoutElement> {
        let mut elements = Vec::new();

        if let Some(data) = image_data {
            let kind = if data.processed.len() == 1 {
                "single-image"
            } else {
                "gallery"
            };
            elements.push(LayoutElement::new(kind).with_content("images"));
        }

        let content = request.content.to_lowercase();
        if content.contains("header") {
            elements.push(LayoutElement::new("header"));
        }
        if content.contains("footer") {
            elements.push(LayoutElement::new("footer"));
        }

        elements.push(LayoutElement::new("main-content"));
        elements
    }

    /// Layout CSS first, generated CSS after
    pub fn combine_css(generated: &str, layout: Option<&str>) -> String {
        match layout.filter(|css| !css.trim().is_empty()) {
            Some(layout) => {
                format!("/* Layout Styles */\n{layout}\n\n/* Generated Styles */\n{generated}")
            }
            None => generated.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProcessedImage;

    fn image() -> ProcessedImage {
        ProcessedImage {
            url: "https://cdn.example/a.jpg".to_string(),
            alt: "a".to_string(),
            width: 640,
            height: 480,
            source: "Pixabay".to_string(),
            license: "Pixabay License".to_string(),
            attribution: None,
        }
    }

    #[test]
    fn test_elements_from_content_and_images() {
        let request = GenerationRequest::new("A page with a Header and a FOOTER");
        let data = ImageData {
            processed: vec![image(), image()],
            layout: Some("grid-small".to_string()),
        };

        let types: Vec<String> = AgentOrchestrator::determine_layout_elements(&request, Some(&data))
            .into_iter()
            .map(|e| e.element_type)
            .collect();
        assert_eq!(types, ["gallery", "header", "footer", "main-content"]);
    }

    #[test]
    fn test_single_image_element() {
        let request = GenerationRequest::new("portfolio");
        let data = ImageData {
            processed: vec![image()],
            layout: None,
        };
        let elements = AgentOrchestrator::determine_layout_elements(&request, Some(&data));
        assert_eq!(elements[0].element_type, "single-image");
        assert_eq!(elements[0].content.as_deref(), Some("images"));
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn test_combine_css() {
        assert_eq!(AgentOrchestrator::combine_css("p{}", None), "p{}");
        assert_eq!(AgentOrchestrator::combine_css("p{}", Some("  ")), "p{}");

        let combined = AgentOrchestrator::combine_css("p{}", Some(".grid{}"));
        let layout_at = combined.find(".grid{}").unwrap_or(usize::MAX);
        let generated_at = combined.find("p{}").unwrap_or(0);
        assert!(combined.starts_with("/* Layout Styles */"));
        assert!(combined.contains("/* Generated Styles */"));
        assert!(layout_at < generated_at);
    }
}
