//! Workflow agent: next actions, topic overlaps and scheduling conflicts
//! after a story status change.

use crate::agents::text::{parse_json, prompt_json, truncate_chars};
use crate::llm::{CallOptions, LlmClient};
use crate::models::{WorkflowInput, WorkflowResult};
use serde_json::Value;
use tracing::{error, warn};

const WORKFLOW_SYSTEM_PROMPT: &str = r#"You are a radio production workflow manager. Analyze story status changes and organizational context to:

1. Suggest next actions for the producer
2. Detect topic overlaps with other stories in the organization
3. Flag potential scheduling conflicts

Return ONLY valid JSON with keys:
- "actions": list of { "type": string, "description": string, "priority": "high"|"medium"|"low" }
- "overlaps": list of { "story_title": string, "overlap_reason": string }
- "message": brief summary string"#;

const MAX_STORY_CHARS: usize = 2000;
const MAX_ORG_STORIES: usize = 10;
const MAX_ORG_STORIES_CHARS: usize = 3000;

/// Analyze a workflow event.
///
/// Whatever JSON the model returns is passed through unchanged.
pub async fn run(input: WorkflowInput, llm: &LlmClient) -> Value {
    let user_message = build_user_message(&input);

    let text = match llm
        .call_llm(WORKFLOW_SYSTEM_PROMPT, &user_message, CallOptions::new(2048, 60))
        .await
    {
        Some(text) => text,
        None => {
            warn!("All LLM providers failed, returning stub workflow");
            return to_value(&WorkflowResult::stub(&input.event));
        }
    };

    match parse_json(&text) {
        Some(value) => value,
        None => {
            error!(
                "Failed to parse workflow JSON: {}",
                truncate_chars(text.trim(), 200)
            );
            to_value(&WorkflowResult::unparsed(&input.event))
        }
    }
}

fn build_user_message(input: &WorkflowInput) -> String {
    let shown = input.org_stories.len().min(MAX_ORG_STORIES);

    format!(
        "Workflow event: {}\n\nCurrent story: {}\n\nOther stories in organization ({} total):\n{}\n\nAnalyze this event and return JSON with: actions, overlaps, message",
        input.event,
        prompt_json(&input.story, MAX_STORY_CHARS),
        input.org_stories.len(),
        prompt_json(&input.org_stories[..shown], MAX_ORG_STORIES_CHARS)
    )
}

fn to_value(result: &WorkflowResult) -> Value {
    serde_json::to_value(result).unwrap_or(Value::Null)
}
