//! OpenRouter chat-completion client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::parser::CodeBlockParser;
use crate::config::{Config, OpenRouterConfig};
use crate::error::{Result, SiteError};
use crate::log_debug;
use crate::prompts::{KEY_REQUIREMENTS, OUTPUT_INSTRUCTIONS, PromptFamily, PromptLibrary};
use crate::types::{GeneratedCode, GenerationOptions};

const SERVICE: &str = "OpenRouter";

/// LLM backend that turns a prompt into HTML, CSS and JavaScript
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate_code(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GeneratedCode>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: String) -> Self {
        Self {
            role: role.to_string(),
            content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageBody,
}

#[derive(Debug, Deserialize)]
struct ChatMessageBody {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenRouterService {
    client: Client,
    config: OpenRouterConfig,
    general_prompt: Option<String>,
    missing_key_message: String,
    parser: CodeBlockParser,
}

impl OpenRouterService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            config: config.openrouter.clone(),
            general_prompt: config.prompts.general.clone(),
            missing_key_message: config.messages.api_key.clone(),
            parser: CodeBlockParser::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// System message: family prompt, key requirements, optional style guide
    pub fn build_system_prompt(&self, options: &GenerationOptions) -> String {
        let family = PromptFamily::from_element_type(options.element_type.as_deref());
        let prompt_type = options.prompt_type.unwrap_or_default();
        let base = PromptLibrary::system_prompts(family, self.general_prompt.as_deref())
            .for_type(prompt_type);

        let mut system = format!("{base}{KEY_REQUIREMENTS}");
        if let Some(style) = options.style.as_deref() {
            system.push_str(&format!("\nAdhere to this style guide: {style}"));
        }
        system
    }

    /// User message: context, request, existing content, output instructions
    pub fn build_user_prompt(prompt: &str, options: &GenerationOptions) -> String {
        let mut user = match options.context.as_deref() {
            Some(context) => format!("Context: {context}\n\nRequest: {prompt}"),
            None => prompt.to_string(),
        };
        if let Some(existing) = options.existing_content.as_deref() {
            user.push_str(&format!("\n\nExisting content to modify: {existing}"));
        }
        user.push_str(OUTPUT_INSTRUCTIONS);
        user
    }

    pub fn build_request(&self, prompt: &str, options: &GenerationOptions) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::new("system", self.build_system_prompt(options)),
                ChatMessage::new("user", Self::build_user_prompt(prompt, options)),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterService {
    async fn generate_code(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GeneratedCode> {
        if self.config.api_key.trim().is_empty() {
            return Err(SiteError::MissingApiKey(self.missing_key_message.clone()));
        }

        let request = self.build_request(prompt, options);
        log_debug!(
            "Sending completion request to {} with model {}",
            SERVICE,
            request.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request)
            .send()
            .await
            .map_err(|e| SiteError::transport(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(SiteError::Upstream {
                service: SERVICE,
                status: response.status().as_u16(),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SiteError::malformed(SERVICE, e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| SiteError::malformed(SERVICE, "response has no first choice"))?;

        Ok(self.parser.parse(&content))
    }
}
