//! OpenAI-compatible Chat Completions client
//!
//! Implements the CompletionClient trait for Groq's OpenAI-compatible API (or any
//! other service speaking the same protocol). One blocking request per call: no
//! streaming, no retries, no local timeout.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{CompletionClient, CompletionError, CompletionRequest, Role};
use crate::config::LlmConfig;

/// Path appended to the configured base URL
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Chat Completions API client
pub struct ChatCompletionsClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl ChatCompletionsClient {
    /// Create a client for `base_url` authenticated with `api_key`
    ///
    /// The credential is injected by the caller; this type never reads the environment.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, CompletionError> {
        let api_key = api_key.into();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(%base_url, "ChatCompletionsClient::new: called");

        if api_key.trim().is_empty() {
            return Err(CompletionError::new("Missing API key"));
        }

        let http = Client::builder().build()?;

        Ok(Self { api_key, base_url, http })
    }

    /// Create a client from configuration and an already-resolved credential
    pub fn from_config(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self, CompletionError> {
        debug!(base_url = %config.base_url, "from_config: called");
        Self::new(api_key, config.base_url.clone())
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH)
    }

    /// Build the request body: one user message, generation parameters, no streaming
    fn build_request_body(&self, request: &CompletionRequest) -> ChatCompletionBody {
        debug!(%request.model, %request.max_tokens, "build_request_body: called");
        ChatCompletionBody {
            model: request.model.clone(),
            messages: vec![WireMessage {
                role: Role::User,
                content: request.prompt.clone(),
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            stream: false,
        }
    }

    /// Pull the first completion's text out of the API response
    fn parse_response(&self, api_response: ChatCompletionResponse) -> Result<String, CompletionError> {
        debug!(choice_count = api_response.choices.len(), "parse_response: called");
        if let Some(usage) = &api_response.usage {
            info!(
                "Completion usage: {} prompt tokens, {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::invalid_response("no choices returned"))?;

        if choice.finish_reason.as_deref() == Some("length") {
            warn!("parse_response: completion stopped at max tokens");
        }

        choice
            .message
            .content
            .ok_or_else(|| CompletionError::invalid_response("first choice has no content"))
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        debug!(%request.model, %request.max_tokens, prompt_len = request.prompt.len(), "complete: called");
        request.validate().map_err(CompletionError::invalid_request)?;

        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "complete: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(CompletionError::api(status.as_u16(), &text));
        }

        debug!("complete: success");
        let bytes = response.bytes().await?;
        let api_response: ChatCompletionResponse = serde_json::from_slice(&bytes)?;
        self.parse_response(api_response)
    }
}

// Chat Completions wire types

#[derive(Debug, Serialize)]
struct ChatCompletionBody {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: Role,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
