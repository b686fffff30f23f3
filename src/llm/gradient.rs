//! Gradient serverless inference (OpenAI-compatible `/v1/chat/completions`).

use crate::llm::error::LlmError;
use crate::llm::{check_status, CallOptions};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gradient endpoint plus the ordered list of models to try.
#[derive(Debug, Clone)]
pub struct GradientProvider {
    url: String,
    api_key: String,
    models: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GradientProvider {
    pub fn new(url: String, api_key: String, models: Vec<String>) -> Self {
        Self {
            url,
            api_key,
            models,
        }
    }

    /// Models in preference order.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Send one chat completion to `model`.
    ///
    /// A 401 maps to [`LlmError::Unauthorized`] so the caller can skip to the
    /// next model without treating it as an outage.
    pub async fn complete(
        &self,
        http: &Client,
        model: &str,
        system_prompt: &str,
        user_message: &str,
        options: &CallOptions,
    ) -> Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model,
            messages: vec![
                Message {
                    role: "system",
                    content: system_prompt,
                },
                Message {
                    role: "user",
                    content: user_message,
                },
            ],
            max_tokens: options.max_tokens,
        };

        debug!(
            model,
            prompt_len = user_message.len(),
            "Sending Gradient chat completion"
        );

        let response = http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .timeout(options.timeout)
            .json(&request)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(LlmError::Unauthorized {
                model: model.to_string(),
            });
        }

        let parsed: ChatCompletionResponse = check_status(response).await?.json().await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                LlmError::MalformedResponse("missing choices[0].message.content".to_string())
            })
    }
}
