//! Provider error type.

use reqwest::StatusCode;
use thiserror::Error;

/// Why a single provider attempt failed.
///
/// These never escape [`crate::llm::LlmClient::call_llm`]; the fallback chain
/// logs them and moves on to the next model or provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The key is valid but the model is not available on this tier (HTTP 401).
    #[error("model {model} is not available for this key")]
    Unauthorized { model: String },

    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Connection, timeout, or body read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response arrived but did not carry any text.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// True when the failure was a timeout rather than a refused connection or bad status.
    pub fn is_timeout(&self) -> bool {
        matches!(self, LlmError::Transport(e) if e.is_timeout())
    }
}
