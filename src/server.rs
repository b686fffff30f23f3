//! HTTP surface for the router.
//!
//! ```text
//! GET  /health   liveness, agent list, configured providers
//! POST /         router payload -> router response
//! POST /route    same as POST /
//! ```

use crate::agents::{self, Agent};
use crate::llm::LlmClient;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub fn build_router(llm: Arc<LlmClient>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", post(route))
        .route("/route", post(route))
        .with_state(llm)
}

/// Serve until Ctrl-C.
pub async fn serve(bind: &str, llm: Arc<LlmClient>) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    info!("Router listening on {}", bind);

    axum::serve(listener, build_router(llm))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Router shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn health(State(llm): State<Arc<LlmClient>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "agents": Agent::names(),
        "providers": {
            "gradient": llm.has_gradient(),
            "anthropic": llm.has_anthropic(),
        }
    }))
}

async fn route(State(llm): State<Arc<LlmClient>>, Json(payload): Json<Value>) -> Response {
    let response = agents::route_request(&payload, &llm).await;

    let status = if agents::is_error(&response) {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };

    (status, Json(response)).into_response()
}
