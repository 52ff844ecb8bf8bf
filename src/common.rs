use crate::config::Config;
use crate::types::{
    GenerationRequest, ImageRequirements, ImageType, Requirements, StyleRequirements,
};
use clap::Args;

/// Images fetched per page when no count is given
pub const DEFAULT_IMAGE_COUNT: u32 = 3;

#[derive(Args, Clone, Default, Debug)]
pub struct GenerationParams {
    /// Layout style (landing, dashboard, grid, standard, ...)
    #[arg(long, help = "Layout style (landing, dashboard, grid, standard)")]
    pub layout: Option<String>,

    /// Image search query; defaults to the prompt itself
    #[arg(long, help = "Image search query (defaults to the prompt)")]
    pub image_query: Option<String>,

    /// Number of images to fetch
    #[arg(long, help = "Number of images to fetch")]
    pub image_count: Option<u32>,

    /// Image type filter
    #[arg(long, help = "Image type: all, photo, illustration, vector")]
    pub image_type: Option<ImageType>,

    /// Skip the image search entirely
    #[arg(long, help = "Generate without stock images")]
    pub no_images: bool,

    /// Visual theme hint
    #[arg(long, help = "Visual theme hint passed to the generator")]
    pub theme: Option<String>,

    /// Color scheme hint
    #[arg(long, help = "Color scheme hint passed to the generator")]
    pub color_scheme: Option<String>,

    /// Override the LLM model
    #[arg(long, help = "Override the LLM model")]
    pub model: Option<String>,
}

impl GenerationParams {
    /// Apply per-run overrides; returns whether anything changed
    pub fn apply_to_config(&self, config: &mut Config) -> bool {
        let mut changes_made = false;

        if let Some(model) = &self.model
            && config.openrouter.model != *model
        {
            config.openrouter.model.clone_from(model);
            changes_made = true;
        }

        changes_made
    }

    /// Build the generation request for `prompt`
    pub fn to_request(&self, prompt: &str) -> GenerationRequest {
        let images = (!self.no_images).then(|| ImageRequirements {
            query: Some(
                self.image_query
                    .clone()
                    .unwrap_or_else(|| prompt.to_string()),
            ),
            count: Some(self.image_count.unwrap_or(DEFAULT_IMAGE_COUNT)),
            image_type: Some(self.image_type.unwrap_or(ImageType::Photo)),
        });

        let style = (self.theme.is_some() || self.color_scheme.is_some()).then(|| {
            StyleRequirements {
                theme: self.theme.clone(),
                color_scheme: self.color_scheme.clone(),
            }
        });

        GenerationRequest::new(prompt).with_requirements(Requirements {
            layout: self.layout.clone(),
            images,
            style,
        })
    }
}
