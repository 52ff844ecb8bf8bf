//! Layout stage: resolves a layout name and emits its CSS

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use super::core::{Agent, AgentJournal};
use crate::error::Result;
use crate::prompts::PromptFamily;
use crate::types::{LayoutConstraints, LayoutMeta, LayoutRequirements, LayoutResult};

const DEFAULT_MAX_WIDTH: u32 = 1200;
const DEFAULT_SPACING: &str = "1rem";

const LANDING_CSS: &str = "
.hero {
  min-height: 80vh;
  display: flex;
  align-items: center;
  justify-content: center;
  text-align: center;
  padding: 2rem;
}

.features {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
  gap: 2rem;
  padding: 4rem 2rem;
}
";

const DASHBOARD_CSS: &str = "
.dashboard {
  display: grid;
  grid-template-columns: 250px 1fr;
  min-height: 100vh;
}

.sidebar {
  background: #f5f5f5;
  padding: 1rem;
}

.main-content {
  padding: 2rem;
}

@media (max-width: 768px) {
  .dashboard {
    grid-template-columns: 1fr;
  }

  .sidebar {
    display: none;
  }
}
";

const GRID_CSS: &str = "
.grid {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(250px, 1fr));
  gap: 1.5rem;
  padding: 1.5rem;
}

.grid-item {
  background: #fff;
  border-radius: 8px;
  overflow: hidden;
  box-shadow: 0 2px 4px rgba(0,0,0,0.1);
}
";

const STANDARD_CSS: &str = "
.content {
  max-width: 800px;
  margin: 0 auto;
  padding: 2rem;
}

.section {
  margin-bottom: 3rem;
}
";

/// Canned CSS families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Landing,
    Dashboard,
    Grid,
    Standard,
}

impl LayoutKind {
    /// Fold a layout name, including image-layout suggestions, onto a family
    pub fn from_name(name: &str) -> Self {
        match name {
            "landing" | "hero" => Self::Landing,
            "dashboard" => Self::Dashboard,
            "grid" | "gallery" => Self::Grid,
            other if other.starts_with("grid") => Self::Grid,
            _ => Self::Standard,
        }
    }

    const fn css(self) -> &'static str {
        match self {
            Self::Landing => LANDING_CSS,
            Self::Dashboard => DASHBOARD_CSS,
            Self::Grid => GRID_CSS,
            Self::Standard => STANDARD_CSS,
        }
    }
}

pub struct LayoutAgent {
    journal: AgentJournal,
}

impl LayoutAgent {
    pub fn new() -> Self {
        Self {
            journal: AgentJournal::new("layout"),
        }
    }

    /// Explicit type, else inferred from the element types, else `standard`
    pub fn determine_layout_type(requirements: &LayoutRequirements) -> String {
        if let Some(layout) = requirements.layout_type.as_deref()
            && !layout.is_empty()
        {
            return layout.to_string();
        }

        let has = |kind: &str| {
            requirements
                .elements
                .iter()
                .any(|element| element.element_type == kind)
        };

        if has("hero") {
            "landing"
        } else if has("sidebar") {
            "dashboard"
        } else if has("gallery") {
            "grid"
        } else {
            "standard"
        }
        .to_string()
    }

    /// Container rule, optional responsive rule, then the family block
    pub fn generate_layout_css(layout: &str, constraints: Option<&LayoutConstraints>) -> String {
        let max_width = constraints
            .and_then(|c| c.max_width)
            .unwrap_or(DEFAULT_MAX_WIDTH);
        let spacing = constraints
            .and_then(|c| c.spacing.as_deref())
            .unwrap_or(DEFAULT_SPACING);
        let responsive = constraints.and_then(|c| c.responsive).unwrap_or(true);

        let mut css = format!(
            "\n.container {{\n  max-width: {max_width}px;\n  margin: 0 auto;\n  padding: {spacing};\n}}\n"
        );

        if responsive {
            css.push_str(&format!(
                "\n@media (max-width: 768px) {{\n  .container {{\n    padding: calc({spacing} / 2);\n  }}\n}}\n"
            ));
        }

        css.push_str(LayoutKind::from_name(layout).css());
        css
    }
}

impl Default for LayoutAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for LayoutAgent {
    type Input = LayoutRequirements;
    type Output = LayoutResult;

    fn name(&self) -> &'static str {
        "layout"
    }

    fn journal(&self) -> &AgentJournal {
        &self.journal
    }

    fn prompt_family(&self) -> PromptFamily {
        PromptFamily::Layout
    }

    async fn process(&self, requirements: LayoutRequirements) -> Result<LayoutResult> {
        self.journal.record(
            "layout_generation",
            json!({ "type": "layout_generation", "requirements": requirements }),
        );

        let layout = Self::determine_layout_type(&requirements);
        let css = Self::generate_layout_css(&layout, requirements.constraints.as_ref());
        let responsive = requirements
            .constraints
            .as_ref()
            .and_then(|c| c.responsive)
            .unwrap_or(true);

        crate::log_debug!("Layout agent resolved '{}' ({} chars of CSS)", layout, css.len());

        Ok(LayoutResult {
            meta: LayoutMeta {
                layout_type: layout.clone(),
                timestamp: Utc::now(),
                responsive,
            },
            layout,
            css,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::LayoutElement;

    fn requirements(layout: Option<&str>, elements: &[&str]) -> LayoutRequirements {
        LayoutRequirements {
            layout_type: layout.map(str::to_string),
            elements: elements.iter().map(|e| LayoutElement::new(*e)).collect(),
            constraints: None,
        }
    }

    #[test]
    fn test_explicit_type_wins() {
        let req = requirements(Some("dashboard"), &["hero", "gallery"]);
        assert_eq!(LayoutAgent::determine_layout_type(&req), "dashboard");
    }

    #[test]
    fn test_inference_precedence() {
        assert_eq!(
            LayoutAgent::determine_layout_type(&requirements(None, &["gallery", "sidebar", "hero"])),
            "landing"
        );
        assert_eq!(
            LayoutAgent::determine_layout_type(&requirements(None, &["gallery", "sidebar"])),
            "dashboard"
        );
        assert_eq!(
            LayoutAgent::determine_layout_type(&requirements(None, &["gallery"])),
            "grid"
        );
        assert_eq!(
            LayoutAgent::determine_layout_type(&requirements(Some(""), &["header"])),
            "standard"
        );
    }

    #[test]
    fn test_kind_folding() {
        assert_eq!(LayoutKind::from_name("hero"), LayoutKind::Landing);
        assert_eq!(LayoutKind::from_name("grid-medium"), LayoutKind::Grid);
        assert_eq!(LayoutKind::from_name("gallery"), LayoutKind::Grid);
        assert_eq!(LayoutKind::from_name("single"), LayoutKind::Standard);
        assert_eq!(LayoutKind::from_name("default"), LayoutKind::Standard);
    }

    #[test]
    fn test_container_defaults() {
        let css = LayoutAgent::generate_layout_css("standard", None);
        assert!(css.contains("max-width: 1200px;"));
        assert!(css.contains("padding: 1rem;"));
        assert!(css.contains("padding: calc(1rem / 2);"));
        assert!(css.contains(".content {"));
    }

    #[test]
    fn test_constraints_shape_container() {
        let constraints = LayoutConstraints {
            max_width: Some(960),
            responsive: Some(false),
            spacing: Some("2rem".to_string()),
        };
        let css = LayoutAgent::generate_layout_css("dashboard", Some(&constraints));
        assert!(css.contains("max-width: 960px;"));
        assert!(css.contains("padding: 2rem;"));
        assert!(!css.contains("calc(2rem / 2)"));
        assert!(css.contains(".sidebar {"));
    }

    #[tokio::test]
    async fn test_process_result_meta() {
        let agent = LayoutAgent::new();
        let mut req = requirements(Some("grid-small"), &["gallery", "main-content"]);
        req.constraints = Some(LayoutConstraints {
            responsive: Some(true),
            ..LayoutConstraints::default()
        });

        let result = agent.process(req).await.unwrap();
        assert_eq!(result.layout, "grid-small");
        assert_eq!(result.meta.layout_type, "grid-small");
        assert!(result.meta.responsive);
        assert!(result.css.contains(".grid-item {"));
        assert_eq!(agent.message_history()[0].kind, "layout_generation");
    }
}
