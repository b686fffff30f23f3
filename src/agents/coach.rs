//! Coach agent: storytelling mentor for producers working on a piece.

use crate::agents::text::truncate_chars;
use crate::llm::{CallOptions, LlmClient};
use crate::models::CoachInput;
use serde_json::{json, Value};
use tracing::warn;

const COACHING_SYSTEM_PROMPT: &str = r#"You are an expert radio storytelling coach, drawing on techniques from:
- This American Life (narrative structure, personal storytelling)
- Radiolab (sound design, pacing, wonder)
- Radio Milwaukee / 88Nine (community connection, local voice, music integration)

You help radio producers and DJs craft compelling stories from raw interviews. Your guidance is:
- Specific and actionable (not generic advice)
- Focused on the current production stage
- Encouraging but honest about what needs work
- Rooted in radio craft (sound, pacing, narrative arc)

When reviewing transcripts, identify:
- The strongest narrative thread
- Key emotional moments that could anchor segments
- Quotes that would work well on air
- Pacing suggestions (where to speed up, slow down, add music beds)
- How to open and close the piece

Keep responses concise (2-4 paragraphs). Use radio production terminology naturally."#;

const STUB_ADVICE: &str = "Focus on finding the strongest emotional thread in your transcript. \
Look for the moment where your subject's voice changes — that's usually where the real story lives. \
Lead with that moment, then build context around it.";

const DEFAULT_STEP: &str = "editing";
const MAX_TRANSCRIPT_CHARS: usize = 3000;

/// Handle a coaching request. Returns `{"coaching": "..."}`.
pub async fn run(input: CoachInput, llm: &LlmClient) -> Value {
    let step = current_step(&input).to_string();
    let user_message = build_user_message(&input);

    let coaching = match llm
        .call_llm(COACHING_SYSTEM_PROMPT, &user_message, CallOptions::new(2048, 60))
        .await
    {
        Some(text) => text,
        None => {
            warn!("All LLM providers failed, returning stub coaching");
            stub_coaching(&input.query, &step)
        }
    };

    json!({ "coaching": coaching })
}

fn current_step(input: &CoachInput) -> &str {
    input
        .production_state
        .step
        .as_deref()
        .unwrap_or(DEFAULT_STEP)
}

/// Transcript excerpt, preferring the top-level field over production state.
fn transcript_context(input: &CoachInput) -> &str {
    input
        .transcript_context
        .as_deref()
        .or(input.production_state.transcript_context.as_deref())
        .unwrap_or("")
}

fn build_user_message(input: &CoachInput) -> String {
    let transcript = transcript_context(input);
    let transcript_section = if transcript.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nCurrent transcript (excerpt):\n{}",
            truncate_chars(transcript, MAX_TRANSCRIPT_CHARS)
        )
    };

    // Station guideline retrieval is not wired up, so the context section stays empty.
    let context_section = "";

    format!(
        "Production stage: {}\n{}\n{}\n\nProducer's question: {}",
        current_step(input),
        context_section,
        transcript_section,
        input.query
    )
}

fn stub_coaching(query: &str, step: &str) -> String {
    format!(
        "Great question about '{}'. As you're in the {} stage, {}",
        query, step, STUB_ADVICE
    )
}
