//! Transcript agent: story angles, key quotes, emotional arc and filler words.

use crate::agents::text::{extract_json_object, prompt_json, truncate_chars};
use crate::llm::LlmClient;
use crate::models::{TranscriptAnalysis, TranscriptInput};
use serde_json::{Map, Value};
use tracing::{error, warn};

const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a radio story editor analyzing a corrected interview transcript.

Find what makes this interview worth airing:
1. Story angles: distinct ways the piece could be framed, with a strength score from 0.0 to 1.0
2. Key quotes: lines that would work well on air, with start/end times in seconds when word timestamps are given
3. Emotional arc: how the intensity of the conversation moves over time (0.0 calm to 1.0 peak)
4. Filler words: "um", "uh", "like", "you know" and similar, with their timings so they can be cut

Return ONLY valid JSON with keys:
- "story_angles": list of { "angle": string, "strength": number, "reasoning": string }
- "key_quotes": list of { "text": string, "start": number, "end": number, "theme": string }
- "emotional_arc": list of { "time": number, "intensity": number }
- "filler_words": list of { "word": string, "start": number, "end": number }"#;

const MAX_TRANSCRIPT_CHARS: usize = 12_000;
const MAX_TIMESTAMPS: usize = 200;
const MAX_TIMESTAMP_CHARS: usize = 4000;

/// Analyze a transcript. The result carries the four analysis lists plus
/// `prior_coverage`, which stays empty until story-archive search exists.
pub async fn run(input: TranscriptInput, llm: &LlmClient) -> Value {
    let user_message = build_user_message(&input);

    let mut analysis = match llm
        .call_llm(ANALYSIS_SYSTEM_PROMPT, &user_message, llm.default_options())
        .await
    {
        Some(text) => parse_analysis(&text),
        None => {
            warn!("All LLM providers failed, returning stub transcript analysis");
            to_object(&TranscriptAnalysis::stub())
        }
    };

    analysis.insert("prior_coverage".to_string(), Value::Array(Vec::new()));
    Value::Object(analysis)
}

fn build_user_message(input: &TranscriptInput) -> String {
    let mut message = format!(
        "Transcript:\n{}",
        truncate_chars(&input.transcript, MAX_TRANSCRIPT_CHARS)
    );

    if !input.word_timestamps.is_empty() {
        let shown = input.word_timestamps.len().min(MAX_TIMESTAMPS);
        message.push_str(&format!(
            "\n\nWord timestamps (first {} of {}):\n{}",
            shown,
            input.word_timestamps.len(),
            prompt_json(&input.word_timestamps[..shown], MAX_TIMESTAMP_CHARS)
        ));
    }

    message.push_str(
        "\n\nAnalyze this transcript and return JSON with: story_angles, key_quotes, emotional_arc, filler_words",
    );
    message
}

/// Parse the model's analysis, or fall back to empty lists.
fn parse_analysis(text: &str) -> Map<String, Value> {
    match extract_json_object(text) {
        Some(mut analysis) => {
            for key in ["story_angles", "key_quotes", "emotional_arc", "filler_words"] {
                analysis
                    .entry(key)
                    .or_insert_with(|| Value::Array(Vec::new()));
            }
            analysis
        }
        None => {
            error!(
                "Failed to parse transcript analysis JSON: {}",
                truncate_chars(text, 200)
            );
            to_object(&TranscriptAnalysis::default())
        }
    }
}

fn to_object(analysis: &TranscriptAnalysis) -> Map<String, Value> {
    match serde_json::to_value(analysis) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
