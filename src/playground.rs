//! Playground session: the address bar, revisions, edits and history
//!
//! Owns the cache, the rate limiter and the version history. Every action
//! either commits fully or leaves the session untouched.

use std::ops::Range;
use std::sync::Arc;

use crate::agents::AgentOrchestrator;
use crate::config::{Config, ErrorMessages};
use crate::document;
use crate::error::{Result, SiteError};
use crate::history::{Version, VersionManager};
use crate::services::{
    CacheService, CompletionClient, ImageSearch, OpenRouterService, PixabayClient, RateLimiter,
};
use crate::types::{
    GeneratedCode, GenerationOptions, GenerationRequest, ImageRequirements, ImageType,
    Requirements,
};
use crate::{log_debug, log_error, log_info};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a description";
pub const REVISION_FAILED_MESSAGE: &str = "Failed to apply revision. Please try again.";
pub const EDIT_FAILED_MESSAGE: &str = "Failed to save changes. Please try again.";
pub const NOTHING_GENERATED_MESSAGE: &str = "Nothing generated yet";
pub const REVISION_CONTEXT: &str = "Revising existing content";

/// Images requested alongside every address-bar submission
const SUBMIT_IMAGE_COUNT: u32 = 3;

/// Edits applied to the rendered page outside the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Duplicated,
    Deleted,
    Content,
    Style,
}

impl EditKind {
    pub const fn description(self) -> &'static str {
        match self {
            Self::Duplicated => "Element duplicated",
            Self::Deleted => "Element deleted",
            Self::Content => "Content edited",
            Self::Style => "Style edited",
        }
    }
}

/// Outcome of an address-bar submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub document: String,
    pub from_cache: bool,
    pub version: usize,
}

pub struct Playground {
    orchestrator: AgentOrchestrator,
    completion: Arc<dyn CompletionClient>,
    cache: CacheService,
    limiter: RateLimiter,
    history: VersionManager,
    messages: ErrorMessages,
}

impl Playground {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        images: Arc<dyn ImageSearch>,
        config: &Config,
    ) -> Self {
        Self {
            orchestrator: AgentOrchestrator::new(Arc::clone(&completion), images, config),
            completion,
            cache: CacheService::from_config(config),
            limiter: RateLimiter::from_config(config),
            history: VersionManager::new(),
            messages: config.messages.clone(),
        }
    }

    /// Session backed by the OpenRouter and Pixabay clients
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(OpenRouterService::new(config)),
            Arc::new(PixabayClient::from_config(config)),
            config,
        )
    }

    /// Generate (or load from cache) a page for the address-bar input
    pub async fn submit(&mut self, input: &str) -> Result<Submission> {
        if input.trim().is_empty() {
            return Err(SiteError::InvalidInput(EMPTY_INPUT_MESSAGE.to_string()));
        }

        if let Some(cached) = self.cache.get(input) {
            log_debug!("Serving cached document for '{}'", input);
            let version = self.commit(cached.clone(), "Loaded from cache");
            return Ok(Submission {
                document: cached,
                from_cache: true,
                version,
            });
        }

        self.limiter.can_make_request()?;

        let request = Self::submission_request(input);
        let result = self.orchestrator.generate(&request).await.map_err(|e| {
            log_error!("Generation error: {}", e);
            SiteError::Generation(self.messages.generation.clone())
        })?;

        let full = document::assemble(&result.html, &result.css, &result.js);
        self.cache.set(input, full.clone());
        let version = self.commit(full.clone(), "Initial generation");
        log_info!("Generated version {} for '{}'", version, input);

        Ok(Submission {
            document: full,
            from_cache: false,
            version,
        })
    }

    /// Request built from raw address-bar text
    pub fn submission_request(input: &str) -> GenerationRequest {
        GenerationRequest::new(input).with_requirements(Requirements {
            images: Some(ImageRequirements {
                query: Some(input.to_string()),
                count: Some(SUBMIT_IMAGE_COUNT),
                image_type: Some(ImageType::Photo),
            }),
            ..Requirements::default()
        })
    }

    /// Regenerate the whole page from a revision prompt
    pub async fn revise(&mut self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(SiteError::InvalidInput(
                "Please describe the revision".to_string(),
            ));
        }

        let mut options = GenerationOptions::default().with_context(REVISION_CONTEXT);
        if let Some(current) = self.current_document() {
            options = options.with_existing_content(current);
        }

        let code = self
            .completion
            .generate_code(prompt, &options)
            .await
            .map_err(|e| {
                log_error!("Revision error: {}", e);
                SiteError::ActionFailed(REVISION_FAILED_MESSAGE.to_string())
            })?;

        let full = document::assemble(&code.html, &code.css, &code.js);
        self.commit(full.clone(), &format!("Revision: {prompt}"));
        Ok(full)
    }

    /// Generate replacement markup for one element; the caller applies it
    /// and records the result with [`Playground::record_edit`]
    pub async fn edit_element(
        &self,
        instruction: &str,
        element_tag: &str,
        existing_html: &str,
    ) -> Result<GeneratedCode> {
        let options = GenerationOptions::default()
            .with_element_type(element_tag.to_lowercase())
            .with_existing_content(existing_html);

        self.completion
            .generate_code(instruction, &options)
            .await
            .map_err(|e| {
                log_error!("Editing save error: {}", e);
                SiteError::ActionFailed(EDIT_FAILED_MESSAGE.to_string())
            })
    }

    /// Rewrite the first `<tag>` of the current page from an instruction
    pub async fn edit_content(&mut self, element_tag: &str, instruction: &str) -> Result<usize> {
        let (page, range) = self.locate(element_tag)?;
        let code = self
            .edit_element(instruction, element_tag, &page[range.clone()])
            .await?;
        if code.html.trim().is_empty() {
            log_error!("Element edit for <{}> returned no HTML", element_tag);
            return Err(SiteError::ActionFailed(EDIT_FAILED_MESSAGE.to_string()));
        }

        let edited = splice(&page, range, &code.html);
        Ok(self.record_edit(edited, EditKind::Content))
    }

    /// Merge `prop: value;` declarations into the first `<tag>`'s inline style
    pub fn style_element(&mut self, element_tag: &str, declarations: &str) -> Result<usize> {
        if document::parse_style_declarations(declarations).is_empty() {
            return Err(SiteError::InvalidInput(
                "Expected declarations like 'color: red; padding: 1rem'".to_string(),
            ));
        }

        let (page, range) = self.locate(element_tag)?;
        let styled = document::apply_inline_style(&page[range.clone()], declarations);
        let edited = splice(&page, range, &styled);
        Ok(self.record_edit(edited, EditKind::Style))
    }

    /// Insert a copy of the first `<tag>` right after it
    pub fn duplicate_element(&mut self, element_tag: &str) -> Result<usize> {
        let (page, range) = self.locate(element_tag)?;
        let element = &page[range.clone()];
        let edited = splice(&page, range, &format!("{element}{element}"));
        Ok(self.record_edit(edited, EditKind::Duplicated))
    }

    /// Remove the first `<tag>` from the current page
    pub fn delete_element(&mut self, element_tag: &str) -> Result<usize> {
        let (page, range) = self.locate(element_tag)?;
        let edited = splice(&page, range, "");
        Ok(self.record_edit(edited, EditKind::Deleted))
    }

    /// Record an externally edited document as the new current version
    pub fn record_edit(&mut self, document: impl Into<String>, kind: EditKind) -> usize {
        self.commit(document.into(), kind.description())
    }

    /// Make version `id` current; unknown ids change nothing
    pub fn restore(&mut self, id: usize) -> Option<&str> {
        self.history.restore(id)
    }

    pub fn current_document(&self) -> Option<&str> {
        self.history.current().map(|version| version.content.as_str())
    }

    pub fn versions(&self) -> &[Version] {
        self.history.versions()
    }

    pub fn current_version(&self) -> Option<usize> {
        self.history.current_version()
    }

    pub fn history(&self) -> &VersionManager {
        &self.history
    }

    pub fn orchestrator(&self) -> &AgentOrchestrator {
        &self.orchestrator
    }

    pub fn cached_documents(&self) -> usize {
        self.cache.len()
    }

    fn commit(&mut self, document: String, description: &str) -> usize {
        self.history.add_version(document, Some(description))
    }

    /// Current page and the byte range of its first `<tag>` element
    fn locate(&self, element_tag: &str) -> Result<(String, Range<usize>)> {
        let page = self
            .current_document()
            .ok_or_else(|| SiteError::InvalidInput(NOTHING_GENERATED_MESSAGE.to_string()))?;
        let range = document::find_element(page, element_tag).ok_or_else(|| {
            SiteError::InvalidInput(format!("No <{}> element in the current page", element_tag.trim()))
        })?;
        Ok((page.to_string(), range))
    }
}

fn splice(page: &str, range: Range<usize>, replacement: &str) -> String {
    format!("{}{replacement}{}", &page[..range.start], &page[range.end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_descriptions() {
        assert_eq!(EditKind::Duplicated.description(), "Element duplicated");
        assert_eq!(EditKind::Deleted.description(), "Element deleted");
        assert_eq!(EditKind::Content.description(), "Content edited");
        assert_eq!(EditKind::Style.description(), "Style edited");
    }

    #[test]
    fn test_submission_request_asks_for_photos() {
        let request = Playground::submission_request("mountain cabin");
        let images = request.image_query().map(Clone::clone).unwrap_or_default();

        assert_eq!(images.query.as_deref(), Some("mountain cabin"));
        assert_eq!(images.count, Some(3));
        assert_eq!(images.image_type, Some(ImageType::Photo));
        assert_eq!(request.layout(), None);
    }

    #[test]
    fn test_splice() {
        assert_eq!(splice("<a><b></b></a>", 3..10, "<i></i>"), "<a><i></i></a>");
        assert_eq!(splice("abc", 1..2, ""), "ac");
    }
}
