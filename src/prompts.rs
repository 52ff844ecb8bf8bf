//! Prompt library for the Sitesmith agents and the LLM client.
//!
//! Centralizes every canned prompt: per-family system prompts, per-agent
//! instructions, edit-context hints and the fixed requirement blocks the
//! OpenRouter client appends to each request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prompt families, one per agent plus the general fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptFamily {
    Code,
    Layout,
    Image,
    General,
}

impl PromptFamily {
    /// Map an `element_type` hint (as sent to the LLM client) to a family
    pub fn from_element_type(element_type: Option<&str>) -> Self {
        match element_type {
            Some("code") => Self::Code,
            Some("layout") => Self::Layout,
            Some("image") => Self::Image,
            _ => Self::General,
        }
    }
}

/// The kind of request a prompt is composed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptType {
    #[default]
    Initial,
    Edit,
    Revision,
    ElementEdit,
    StyleEdit,
    Component,
    Gallery,
}

impl PromptType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Initial => "INITIAL",
            Self::Edit => "EDIT",
            Self::Revision => "REVISION",
            Self::ElementEdit => "ELEMENT_EDIT",
            Self::StyleEdit => "STYLE_EDIT",
            Self::Component => "COMPONENT",
            Self::Gallery => "GALLERY",
        }
    }
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PromptType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "INITIAL" => Ok(Self::Initial),
            "EDIT" => Ok(Self::Edit),
            "REVISION" => Ok(Self::Revision),
            "ELEMENT_EDIT" => Ok(Self::ElementEdit),
            "STYLE_EDIT" => Ok(Self::StyleEdit),
            "COMPONENT" => Ok(Self::Component),
            "GALLERY" => Ok(Self::Gallery),
            _ => Err(format!("Unknown prompt type: {s}")),
        }
    }
}

/// The three system prompts of a family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemPrompts<'a> {
    pub initial: &'a str,
    pub edit: &'a str,
    pub revision: &'a str,
}

impl<'a> SystemPrompts<'a> {
    /// Pick the system prompt that governs a prompt type
    pub fn for_type(&self, prompt_type: PromptType) -> &'a str {
        match prompt_type {
            PromptType::Edit | PromptType::ElementEdit | PromptType::StyleEdit => self.edit,
            PromptType::Revision => self.revision,
            PromptType::Initial | PromptType::Component | PromptType::Gallery => self.initial,
        }
    }
}

/// Fixed requirement list appended to every system prompt sent to the LLM
pub const KEY_REQUIREMENTS: &str = "\n
Key requirements:
- Use semantic HTML5 elements
- Implement modern CSS best practices
- Write clean, efficient JavaScript
- Ensure responsive design
- Follow accessibility guidelines
- Create engaging animations
- Use proper error handling
- Implement user feedback
- Optimize performance";

/// Output instructions appended to every user prompt sent to the LLM
pub const OUTPUT_INSTRUCTIONS: &str = "\n
Please provide the code in three distinct sections:
1. HTML: Semantic structure with proper accessibility attributes
2. CSS: Modern styling with responsive design and animations
3. JavaScript: Clean, efficient code with proper event handling

Additional requirements:
- Use CSS Grid and Flexbox for layouts
- Implement smooth transitions and animations
- Add hover states and interactive elements
- Ensure mobile responsiveness
- Include error handling and loading states
- Add appropriate ARIA labels and roles
- Optimize for performance";

/// Static prompt table
pub struct PromptLibrary;

impl PromptLibrary {
    /// System prompts for a family; `general` is the configured general prompt
    pub fn system_prompts(family: PromptFamily, general: Option<&str>) -> SystemPrompts<'_> {
        match family {
            PromptFamily::Code => SystemPrompts {
                initial: "Focus on generating semantic HTML, modern CSS, and vanilla JavaScript. \
                          Ensure all code follows current best practices and WCAG guidelines.",
                edit: "Modify existing code while maintaining structure and functionality. \
                       Focus on the specific element being edited.",
                revision: "Update the existing code based on user feedback while preserving core functionality.",
            },
            PromptFamily::Layout => SystemPrompts {
                initial: "Analyze the user's needs and create appropriate layouts. Consider responsive \
                          design, visual hierarchy, and user experience principles.",
                edit: "Modify the layout while maintaining overall structure and responsiveness.",
                revision: "Adjust the layout based on user feedback while preserving the core design principles.",
            },
            PromptFamily::Image => SystemPrompts {
                initial: "When handling images, ensure proper lazy loading, alt text, and optimized \
                          delivery. Consider art direction and visual impact.",
                edit: "Modify image presentation while maintaining performance and accessibility.",
                revision: "Update image handling based on user feedback while preserving optimization.",
            },
            PromptFamily::General => {
                let general = general.unwrap_or_default();
                SystemPrompts {
                    initial: general,
                    edit: general,
                    revision: general,
                }
            }
        }
    }

    /// Agent instruction for a prompt type, if the family defines one
    fn agent_prompt_entry(family: PromptFamily, prompt_type: PromptType) -> Option<&'static str> {
        use PromptType::{Component, Edit, ElementEdit, Gallery, Initial, StyleEdit};

        match (family, prompt_type) {
            (PromptFamily::Code, Initial) => {
                Some("Generate clean, semantic code with modern best practices.")
            }
            (PromptFamily::Code, Edit) => {
                Some("Modify specific code elements while maintaining consistency.")
            }
            (PromptFamily::Code, ElementEdit) => {
                Some("Update the selected element while preserving context.")
            }
            (PromptFamily::Code, StyleEdit) => {
                Some("Modify styles while maintaining design consistency.")
            }
            (PromptFamily::Layout, Initial) => Some("Create responsive, user-friendly layouts."),
            (PromptFamily::Layout, Edit) => {
                Some("Adjust layout structure while maintaining responsiveness.")
            }
            (PromptFamily::Layout, Component) => {
                Some("Design specific components within the layout.")
            }
            (PromptFamily::Image, Initial) => Some("Select and optimize images for the content."),
            (PromptFamily::Image, Edit) => Some("Modify image presentation and optimization."),
            (PromptFamily::Image, Gallery) => Some("Create image galleries and collections."),
            _ => None,
        }
    }

    /// Agent instruction for a prompt type, falling back to the family's INITIAL entry
    pub fn agent_prompt(family: PromptFamily, prompt_type: PromptType) -> &'static str {
        Self::agent_prompt_entry(family, prompt_type)
            .or_else(|| Self::agent_prompt_entry(family, PromptType::Initial))
            .unwrap_or_default()
    }

    /// Human description of an edit context
    pub fn context_hint(prompt_type: PromptType) -> Option<&'static str> {
        match prompt_type {
            PromptType::ElementEdit => {
                Some("Editing a specific element within the generated content.")
            }
            PromptType::StyleEdit => Some("Modifying styles for a specific element."),
            PromptType::Revision => Some("Making broader changes to the entire content."),
            PromptType::Component => Some("Working with specific components or sections."),
            _ => None,
        }
    }

    /// Compose `<system>\n\n<agent>\n\nUser Request: <prompt>` for an agent family
    pub fn compose(
        family: PromptFamily,
        user_prompt: &str,
        prompt_type: PromptType,
        general: Option<&str>,
    ) -> String {
        let system = Self::system_prompts(family, general).for_type(prompt_type);
        let agent = Self::agent_prompt(family, prompt_type);

        format!("{system}\n\n{agent}\n\nUser Request: {user_prompt}")
    }
}
