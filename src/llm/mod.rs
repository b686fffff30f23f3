//! LLM access with provider and model fallback.
//!
//! Every agent goes through [`LlmClient::call_llm`]. The chain is:
//! Gradient (each configured model in order, skipping models the key is not
//! authorized for), then the Anthropic API, then `None`. Agents turn `None`
//! into their canned stub response.

pub mod anthropic;
pub mod error;
pub mod gradient;

use crate::config::LlmConfig;
use anthropic::AnthropicProvider;
use anyhow::{Context, Result};
use error::LlmError;
use gradient::GradientProvider;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-call limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            timeout: Duration::from_secs(120),
        }
    }
}

impl CallOptions {
    pub fn new(max_tokens: u32, timeout_seconds: u64) -> Self {
        Self {
            max_tokens,
            timeout: Duration::from_secs(timeout_seconds),
        }
    }
}

/// API keys for the providers. A provider without a key is never contacted.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub gradient: Option<String>,
    pub anthropic: Option<String>,
}

impl Credentials {
    /// Build credentials, treating blank keys as missing.
    pub fn new(gradient: Option<String>, anthropic: Option<String>) -> Self {
        Self {
            gradient: non_blank(gradient),
            anthropic: non_blank(anthropic),
        }
    }
}

fn non_blank(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

/// Shared LLM client used by all agents.
pub struct LlmClient {
    http: Client,
    gradient: Option<GradientProvider>,
    anthropic: Option<AnthropicProvider>,
    defaults: CallOptions,
}

impl LlmClient {
    pub fn new(config: &LlmConfig, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        let gradient = credentials.gradient.map(|key| {
            GradientProvider::new(
                config.gradient_url.clone(),
                key,
                config.gradient_models.clone(),
            )
        });

        let anthropic = credentials.anthropic.map(|key| {
            AnthropicProvider::new(
                config.anthropic_url.clone(),
                key,
                config.anthropic_model.clone(),
                config.anthropic_version.clone(),
            )
        });

        Ok(Self {
            http,
            gradient,
            anthropic,
            defaults: CallOptions::new(config.max_tokens, config.timeout_seconds),
        })
    }

    /// Options from `[llm]` config, for agents without their own limits.
    pub fn default_options(&self) -> CallOptions {
        self.defaults
    }

    pub fn has_gradient(&self) -> bool {
        self.gradient.is_some()
    }

    pub fn has_anthropic(&self) -> bool {
        self.anthropic.is_some()
    }

    /// Call the LLM with automatic fallback.
    ///
    /// Returns the response text from the first provider that answers, or
    /// `None` when every configured provider failed (or none is configured).
    pub async fn call_llm(
        &self,
        system_prompt: &str,
        user_message: &str,
        options: CallOptions,
    ) -> Option<String> {
        if let Some(gradient) = &self.gradient {
            for model in gradient.models() {
                match gradient
                    .complete(&self.http, model, system_prompt, user_message, &options)
                    .await
                {
                    Ok(text) => {
                        debug!(model = %model, "Gradient responded");
                        return Some(text);
                    }
                    Err(LlmError::Unauthorized { .. }) => {
                        info!("Model {} not available on tier, trying next...", model);
                    }
                    Err(e) if e.is_timeout() => {
                        warn!(
                            "Gradient {} timed out after {}s",
                            model,
                            options.timeout.as_secs()
                        );
                    }
                    Err(e) => warn!("Gradient {} failed: {}", model, e),
                }
            }
        }

        if let Some(anthropic) = &self.anthropic {
            match anthropic
                .complete(&self.http, system_prompt, user_message, &options)
                .await
            {
                Ok(text) => {
                    debug!(model = %anthropic.model(), "Anthropic responded");
                    return Some(text);
                }
                Err(e) => warn!("Anthropic API failed: {}", e),
            }
        }

        if self.gradient.is_none() && self.anthropic.is_none() {
            debug!("No LLM provider keys configured");
        }

        None
    }
}

/// Pass through a successful response, or turn it into [`LlmError::Status`].
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(LlmError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{anthropic_reply, gradient_reply, test_llm_config, MockServer};
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_blank_credentials_are_missing() {
        let creds = Credentials::new(Some("   ".to_string()), Some(String::new()));
        assert!(creds.gradient.is_none());
        assert!(creds.anthropic.is_none());

        let creds = Credentials::new(Some(" key ".to_string()), None);
        assert_eq!(creds.gradient.as_deref(), Some("key"));
    }

    #[test]
    fn test_default_options_follow_config() {
        let mut config = test_llm_config("http://unused", "http://unused");
        config.max_tokens = 1000;
        config.timeout_seconds = 5;
        let client = LlmClient::new(&config, Credentials::default()).unwrap();
        assert_eq!(client.default_options(), CallOptions::new(1000, 5));
    }

    #[tokio::test]
    async fn test_no_credentials_returns_none() {
        let config = test_llm_config("http://127.0.0.1:9", "http://127.0.0.1:9");
        let client = LlmClient::new(&config, Credentials::default()).unwrap();

        assert!(!client.has_gradient());
        assert!(!client.has_anthropic());
        assert!(client
            .call_llm("sys", "user", CallOptions::default())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_model_is_skipped() {
        let gradient = MockServer::start(|body| {
            if body["model"] == "anthropic-claude-4.6-sonnet" {
                (StatusCode::UNAUTHORIZED, json!({"error": "tier"}))
            } else {
                (StatusCode::OK, gradient_reply("from llama"))
            }
        })
        .await;

        let config = test_llm_config(&gradient.url, "http://127.0.0.1:9");
        let client =
            LlmClient::new(&config, Credentials::new(Some("gk".to_string()), None)).unwrap();

        let text = client
            .call_llm("be helpful", "hello", CallOptions::new(2048, 10))
            .await;
        assert_eq!(text.as_deref(), Some("from llama"));

        let requests = gradient.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].body["model"], "anthropic-claude-4.6-sonnet");
        assert_eq!(requests[1].body["model"], "llama3.3-70b-instruct");
        assert_eq!(requests[1].body["max_tokens"], 2048);
        assert_eq!(requests[1].body["messages"][0]["role"], "system");
        assert_eq!(requests[1].body["messages"][0]["content"], "be helpful");
        assert_eq!(requests[1].body["messages"][1]["content"], "hello");
        assert_eq!(requests[1].header("authorization"), Some("Bearer gk"));
    }

    #[tokio::test]
    async fn test_first_model_success_stops_chain() {
        let gradient =
            MockServer::start(|_| (StatusCode::OK, gradient_reply("first model"))).await;
        let anthropic =
            MockServer::start(|_| (StatusCode::OK, anthropic_reply("never"))).await;

        let config = test_llm_config(&gradient.url, &anthropic.url);
        let client = LlmClient::new(
            &config,
            Credentials::new(Some("gk".to_string()), Some("ak".to_string())),
        )
        .unwrap();

        let text = client.call_llm("s", "u", CallOptions::default()).await;
        assert_eq!(text.as_deref(), Some("first model"));
        assert_eq!(gradient.requests().len(), 1);
        assert!(anthropic.requests().is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_to_anthropic() {
        let gradient = MockServer::start(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "overloaded"}),
            )
        })
        .await;
        let anthropic =
            MockServer::start(|_| (StatusCode::OK, anthropic_reply("from anthropic"))).await;

        let config = test_llm_config(&gradient.url, &anthropic.url);
        let client = LlmClient::new(
            &config,
            Credentials::new(Some("gk".to_string()), Some("ak".to_string())),
        )
        .unwrap();

        let text = client
            .call_llm("system text", "user text", CallOptions::new(512, 10))
            .await;
        assert_eq!(text.as_deref(), Some("from anthropic"));

        // Both Gradient models were tried before falling back.
        assert_eq!(gradient.requests().len(), 2);

        let requests = anthropic.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.header("x-api-key"), Some("ak"));
        assert_eq!(request.header("anthropic-version"), Some("2023-06-01"));
        assert_eq!(request.body["model"], "claude-sonnet-4-6-20250514");
        assert_eq!(request.body["system"], "system text");
        assert_eq!(request.body["max_tokens"], 512);
        assert_eq!(request.body["messages"][0]["role"], "user");
        assert_eq!(request.body["messages"][0]["content"], "user text");
    }

    #[tokio::test]
    async fn test_timed_out_model_is_skipped() {
        let gradient = MockServer::start_with_delay(
            |body| {
                let model = body["model"].as_str().unwrap_or_default();
                (StatusCode::OK, gradient_reply(model))
            },
            |body| {
                if body["model"] == "first" {
                    Duration::from_secs(30)
                } else {
                    Duration::ZERO
                }
            },
        )
        .await;

        let mut config = test_llm_config(&gradient.url, "http://127.0.0.1:9/");
        config.gradient_models = vec!["first".to_string(), "second".to_string()];
        let client =
            LlmClient::new(&config, Credentials::new(Some("gk".to_string()), None)).unwrap();

        let text = client.call_llm("s", "u", CallOptions::new(64, 1)).await;
        assert_eq!(text.as_deref(), Some("second"));

        let requests = gradient.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].body["model"], "first");
        assert_eq!(requests[1].body["model"], "second");
    }

    #[tokio::test]
    async fn test_empty_text_is_a_successful_answer() {
        let gradient = MockServer::start(|_| (StatusCode::OK, gradient_reply(""))).await;
        let anthropic =
            MockServer::start(|_| (StatusCode::OK, anthropic_reply("never"))).await;

        let config = test_llm_config(&gradient.url, &anthropic.url);
        let client = LlmClient::new(
            &config,
            Credentials::new(Some("gk".to_string()), Some("ak".to_string())),
        )
        .unwrap();

        let text = client.call_llm("s", "u", CallOptions::default()).await;
        assert_eq!(text.as_deref(), Some(""));
        assert_eq!(gradient.requests().len(), 1);
        assert!(anthropic.requests().is_empty());
    }

    #[tokio::test]
    async fn test_anthropic_only_when_gradient_key_missing() {
        let gradient =
            MockServer::start(|_| (StatusCode::OK, gradient_reply("unexpected"))).await;
        let anthropic = MockServer::start(|_| (StatusCode::OK, anthropic_reply("ok"))).await;

        let config = test_llm_config(&gradient.url, &anthropic.url);
        let client =
            LlmClient::new(&config, Credentials::new(None, Some("ak".to_string()))).unwrap();

        let text = client.call_llm("s", "u", CallOptions::default()).await;
        assert_eq!(text.as_deref(), Some("ok"));
        assert!(gradient.requests().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_responses_count_as_failures() {
        let gradient = MockServer::start(|_| (StatusCode::OK, json!({"choices": []}))).await;
        let anthropic = MockServer::start(|_| (StatusCode::OK, json!({"content": []}))).await;

        let config = test_llm_config(&gradient.url, &anthropic.url);
        let client = LlmClient::new(
            &config,
            Credentials::new(Some("gk".to_string()), Some("ak".to_string())),
        )
        .unwrap();

        assert!(client
            .call_llm("s", "u", CallOptions::default())
            .await
            .is_none());
        assert_eq!(gradient.requests().len(), 2);
        assert_eq!(anthropic.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_providers_return_none() {
        // Port 9 (discard) is not listening on the loopback interface.
        let config = test_llm_config("http://127.0.0.1:9/", "http://127.0.0.1:9/");
        let client = LlmClient::new(
            &config,
            Credentials::new(Some("gk".to_string()), Some("ak".to_string())),
        )
        .unwrap();

        assert!(client
            .call_llm("s", "u", CallOptions::new(16, 5))
            .await
            .is_none());
    }
}
