//! Image search stage

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use super::core::{Agent, AgentJournal};
use crate::config::Config;
use crate::error::{Result, SiteError};
use crate::log_debug;
use crate::prompts::PromptFamily;
use crate::services::{ImageSearch, PixabayHit, PixabayResponse};
use crate::types::{ImageSearchMeta, ImageSearchParams, ImageSearchResult, ProcessedImage};

const SOURCE: &str = "Pixabay";
const LICENSE: &str = "Pixabay License";

/// Fetches stock images and shapes them for the code generator
pub struct ImageAgent {
    search: Arc<dyn ImageSearch>,
    max_images: u32,
    missing_key_message: String,
    journal: AgentJournal,
}

impl ImageAgent {
    pub fn new(search: Arc<dyn ImageSearch>, config: &Config) -> Self {
        Self {
            search,
            max_images: config.images.max_images,
            missing_key_message: config.messages.api_key.clone(),
            journal: AgentJournal::new("image"),
        }
    }

    /// Layout name suited to a set of images
    pub fn suggest_image_layout(images: &[ProcessedImage]) -> &'static str {
        match images {
            [] => "default",
            [image] => {
                if f64::from(image.width) > f64::from(image.height) * 1.5 {
                    "hero"
                } else {
                    "single"
                }
            }
            _ if images.len() <= 3 => "grid-small",
            _ if images.len() <= 6 => "grid-medium",
            _ => "gallery",
        }
    }

    fn process_hit(hit: &PixabayHit) -> ProcessedImage {
        let alt = hit
            .tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        ProcessedImage {
            url: hit.webformat_url.clone(),
            alt,
            width: hit.webformat_width,
            height: hit.webformat_height,
            source: SOURCE.to_string(),
            license: LICENSE.to_string(),
            attribution: Some(format!("Photo by {}", hit.user)),
        }
    }

    fn process_response(query: &str, response: &PixabayResponse) -> ImageSearchResult {
        ImageSearchResult {
            images: response.hits.iter().map(Self::process_hit).collect(),
            meta: ImageSearchMeta {
                query: query.to_string(),
                timestamp: Utc::now(),
                total: response.total_hits.unwrap_or(0),
            },
        }
    }
}

#[async_trait]
impl Agent for ImageAgent {
    type Input = ImageSearchParams;
    type Output = ImageSearchResult;

    fn name(&self) -> &'static str {
        "image"
    }

    fn journal(&self) -> &AgentJournal {
        &self.journal
    }

    fn prompt_family(&self) -> PromptFamily {
        PromptFamily::Image
    }

    async fn process(&self, params: ImageSearchParams) -> Result<ImageSearchResult> {
        self.journal.record(
            "image_search",
            json!({ "type": "image_search", "params": params }),
        );

        if !self.search.has_credentials() {
            return Err(SiteError::MissingApiKey(self.missing_key_message.clone()));
        }

        // a zero count falls back to the configured maximum
        let params = ImageSearchParams {
            count: params.count.filter(|count| *count > 0).or(Some(self.max_images)),
            ..params
        };

        let response = self.search.search(&params).await?;
        let result = Self::process_response(&params.query, &response);
        log_debug!(
            "Image agent processed {} images for '{}'",
            result.images.len(),
            params.query
        );
        Ok(result)
    }
}
