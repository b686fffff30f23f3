//! Test helpers: an in-process mock LLM provider.

use crate::config::LlmConfig;
use crate::llm::{Credentials, LlmClient};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

type Responder = Arc<dyn Fn(&Value) -> (StatusCode, Value) + Send + Sync>;
type Delay = Arc<dyn Fn(&Value) -> Duration + Send + Sync>;

/// A request captured by [`MockServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub headers: HeaderMap,
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct MockState {
    responder: Responder,
    delay: Delay,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// HTTP server on an ephemeral loopback port that answers every POST with
/// whatever the responder returns for the JSON body.
pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Value) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        Self::start_with_delay(responder, |_| Duration::ZERO).await
    }

    /// Like [`MockServer::start`], but holds each reply back for whatever
    /// `delay` returns for the body. The request is recorded before waiting.
    pub async fn start_with_delay<F, D>(responder: F, delay: D) -> Self
    where
        F: Fn(&Value) -> (StatusCode, Value) + Send + Sync + 'static,
        D: Fn(&Value) -> Duration + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            responder: Arc::new(responder),
            delay: Arc::new(delay),
            requests: requests.clone(),
        };

        let app = Router::new().route("/", post(handle)).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let (status, reply) = (state.responder)(&body);
    let delay = (state.delay)(&body);
    state
        .requests
        .lock()
        .unwrap()
        .push(RecordedRequest { headers, body });

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    (status, Json(reply))
}

/// Chat-completions body carrying `text`.
pub fn gradient_reply(text: &str) -> Value {
    json!({
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": text}}
        ]
    })
}

/// Anthropic Messages body carrying `text`.
pub fn anthropic_reply(text: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}]
    })
}

/// Default `[llm]` settings pointed at the given endpoints.
pub fn test_llm_config(gradient_url: &str, anthropic_url: &str) -> LlmConfig {
    LlmConfig {
        gradient_url: gradient_url.to_string(),
        anthropic_url: anthropic_url.to_string(),
        ..LlmConfig::default()
    }
}

/// Client with no keys: every call falls straight through to `None`.
pub fn offline_client() -> LlmClient {
    LlmClient::new(&LlmConfig::default(), Credentials::default()).unwrap()
}

/// Client whose only provider is a mock Gradient endpoint that always answers `text`.
pub async fn replying_client(text: &str) -> (LlmClient, MockServer) {
    let reply = gradient_reply(text);
    let server = MockServer::start(move |_| (StatusCode::OK, reply.clone())).await;
    let config = test_llm_config(&server.url, "http://127.0.0.1:9/");
    let client =
        LlmClient::new(&config, Credentials::new(Some("test-key".to_string()), None)).unwrap();
    (client, server)
}
