//! Specialist agents and the request router.
//!
//! A router payload looks like `{"agent": "coach", "input": {...}}`. The
//! router decodes `input` for the named agent, runs it, and wraps the output
//! as `{"agent": ..., "result": ...}`. Unknown agents and malformed inputs
//! produce `{"error": ...}` instead.

pub mod coach;
pub mod content;
pub mod text;
pub mod transcript;
pub mod workflow;

use crate::llm::LlmClient;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// The agents the router can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agent {
    Coach,
    Transcript,
    Content,
    Workflow,
}

impl Agent {
    /// All agents, in dispatch-table order.
    pub const ALL: [Agent; 4] = [
        Agent::Coach,
        Agent::Transcript,
        Agent::Content,
        Agent::Workflow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Agent::Coach => "coach",
            Agent::Transcript => "transcript",
            Agent::Content => "content",
            Agent::Workflow => "workflow",
        }
    }

    /// One-line description for `--list-agents`.
    pub fn description(&self) -> &'static str {
        match self {
            Agent::Coach => "Storytelling coach for the current production stage",
            Agent::Transcript => "Story angles, key quotes, emotional arc and filler words",
            Agent::Content => "Air break, podcast, social, web, newsletter and press copy",
            Agent::Workflow => "Next actions and topic overlaps after a status change",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Agent::name).collect()
    }

    /// Decode `input` and run the agent.
    pub async fn handle(self, input: Value, llm: &LlmClient) -> Result<Value> {
        let result = match self {
            Agent::Coach => coach::run(decode(input)?, llm).await,
            Agent::Transcript => transcript::run(decode(input)?, llm).await,
            Agent::Content => content::run(decode(input)?, llm).await,
            Agent::Workflow => workflow::run(decode(input)?, llm).await,
        };
        Ok(result)
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Agent {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Agent::ALL.into_iter().find(|a| a.name() == s).ok_or(())
    }
}

fn decode<T: DeserializeOwned>(input: Value) -> Result<T> {
    let input = match input {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(input).context("input does not match the agent's fields")
}

/// Route a payload to its agent.
pub async fn route_request(payload: &Value, llm: &LlmClient) -> Value {
    let agent_name = match payload.get("agent") {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    let input = payload
        .get("input")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    let agent = match agent_name.parse::<Agent>() {
        Ok(agent) => agent,
        Err(()) => {
            info!("Rejected request for unknown agent {:?}", agent_name);
            return json!({
                "error": format!("Unknown agent: {}. Available: {:?}", agent_name, Agent::names())
            });
        }
    };

    debug!(agent = %agent, "Dispatching request");

    match agent.handle(input, llm).await {
        Ok(result) => json!({ "agent": agent.name(), "result": result }),
        Err(e) => {
            info!("Rejected {} request: {:#}", agent, e);
            json!({ "error": format!("Invalid input for agent {}: {:#}", agent, e) })
        }
    }
}

/// True when a router response is an error payload.
pub fn is_error(response: &Value) -> bool {
    response.get("error").is_some()
}
