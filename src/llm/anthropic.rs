//! Anthropic Messages API, used when every Gradient model has failed.

use crate::llm::error::LlmError;
use crate::llm::{check_status, CallOptions};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    url: String,
    api_key: String,
    model: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
    pub fn new(url: String, api_key: String, model: String, version: String) -> Self {
        Self {
            url,
            api_key,
            model,
            version,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one message and return the text of the first content block.
    pub async fn complete(
        &self,
        http: &Client,
        system_prompt: &str,
        user_message: &str,
        options: &CallOptions,
    ) -> Result<String, LlmError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: options.max_tokens,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: user_message,
            }],
        };

        debug!(model = %self.model, prompt_len = user_message.len(), "Sending Anthropic message");

        let response = http
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.version)
            .timeout(options.timeout)
            .json(&request)
            .send()
            .await?;

        let parsed: MessagesResponse = check_status(response).await?.json().await?;

        parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| LlmError::MalformedResponse("missing content[0].text".to_string()))
    }
}
