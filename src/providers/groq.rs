use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use reqwest::{Client, header};
use log::{debug, error};

use crate::app_config::CorrectionConfig;
use crate::errors::ProviderError;
use crate::providers::TextCorrector;

/// Groq client for the OpenAI-compatible chat completions API
#[derive(Debug)]
pub struct Groq {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL, e.g. https://api.groq.com/openai/v1
    endpoint: String,
    /// Model used for every request
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// Upper bound on generated tokens
    max_tokens: u32,
    /// Instruction prepended to each block
    system_prompt: String,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated alternatives; only the first is used
    pub choices: Vec<ChatChoice>,
}

/// One generated alternative
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChatMessage,
}

impl ChatCompletionRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Append a message
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the max tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Messages queued so far
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

impl Groq {
    /// Create a new client from the correction settings and a resolved API key
    pub fn new(config: &CorrectionConfig, api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
        })
    }

    /// Build the request sent for one block
    pub fn build_request(&self, text: &str) -> ChatCompletionRequest {
        ChatCompletionRequest::new(self.model.clone())
            .add_message("system", self.system_prompt.clone())
            .add_message("user", text)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
    }

    /// Send a chat completion request
    pub async fn complete(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let response = self.client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Correction API error ({}): {}", status, message);
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationError(message),
                code => ProviderError::ApiError { status_code: code, message },
            });
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Extract text from the first choice
    pub fn extract_text(response: &ChatCompletionResponse) -> Option<String> {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
    }
}

#[async_trait]
impl TextCorrector for Groq {
    async fn correct(&self, text: &str) -> Result<String, ProviderError> {
        debug!("Sending {} chars to {} ({})", text.len(), self.endpoint, self.model);
        let response = self.complete(self.build_request(text)).await?;
        Self::extract_text(&response)
            .ok_or_else(|| ProviderError::ParseError("response contained no choices".to_string()))
    }

    fn name(&self) -> &str {
        "groq"
    }
}
