//! Chat-completions client for the text-generation backend.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GenerationConfig;
use crate::error::GenerationError;

/// Trait for producing completion text from a prompt.
///
/// This abstraction allows substituting deterministic text in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    /// Send the prompt and return the first completion's text verbatim.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompletionsClient {
    client: Client,
    api_url: Url,
    credential: String,
    model_id: String,
    timeout_secs: u64,
}

impl ChatCompletionsClient {
    /// Create a client from configuration.
    ///
    /// Fails with [`GenerationError::MissingCredential`] when no credential
    /// is configured, before any request can be made.
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let credential = config
            .credential
            .clone()
            .ok_or(GenerationError::MissingCredential)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GenerationError::Client)?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            credential,
            model_id: config.model_id.clone(),
            timeout_secs: config.timeout.as_secs(),
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[async_trait]
impl Generator for ChatCompletionsClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        info!("Requesting completion from {} ({} chars)", self.model_id, prompt.len());

        let response = self
            .client
            .post(self.api_url.clone())
            .bearer_auth(&self.credential)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyResponse)?;

        debug!("Received completion ({} chars)", content.len());
        Ok(content)
    }
}

impl ChatCompletionsClient {
    fn transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout(self.timeout_secs)
        } else {
            GenerationError::Request(e)
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
