use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::image::{ImageData, ImageType};
use super::layout::LayoutResult;
use crate::prompts::PromptType;

/// One user submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,
}

impl GenerationRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            requirements: None,
        }
    }

    #[must_use]
    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = Some(requirements);
        self
    }

    /// Requested layout name, if any
    pub fn layout(&self) -> Option<&str> {
        self.requirements
            .as_ref()
            .and_then(|r| r.layout.as_deref())
            .filter(|l| !l.is_empty())
    }

    /// Image requirements carrying a non-empty query
    pub fn image_query(&self) -> Option<&ImageRequirements> {
        self.requirements
            .as_ref()
            .and_then(|r| r.images.as_ref())
            .filter(|i| i.query.as_deref().is_some_and(|q| !q.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ImageRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleRequirements>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
}

/// Requirements as handed to code generation: the layout request is
/// replaced by the layout agent's result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ImageRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutResult>,
}

impl StateRequirements {
    /// Merge the request's requirements with a layout result
    pub fn merge(requirements: Option<&Requirements>, layout: Option<LayoutResult>) -> Self {
        Self {
            images: requirements.and_then(|r| r.images.clone()),
            style: requirements.and_then(|r| r.style.clone()),
            layout,
        }
    }
}

/// Input of the code generation agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationState {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<StateRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ImageData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMeta {
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
}

/// Output of the generation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub html: String,
    pub css: String,
    pub js: String,
    pub meta: GenerationMeta,
}

/// Code extracted from one LLM completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub html: String,
    pub css: String,
    pub js: String,
    /// The full completion text
    pub raw: String,
}

/// Knobs for one LLM completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// `code`, `layout`, `image`, or an HTML tag name for element edits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_type: Option<PromptType>,
}

impl GenerationOptions {
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_existing_content(mut self, content: impl Into<String>) -> Self {
        self.existing_content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_element_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_prompt_type(mut self, prompt_type: PromptType) -> Self {
        self.prompt_type = Some(prompt_type);
        self
    }
}
