//! Content agent: six publishable formats from a single interview, written
//! in the station's voice and the DJ's personal style.

use crate::agents::text::{extract_json_object, prompt_json, truncate_chars};
use crate::llm::LlmClient;
use crate::models::{ContentFormats, ContentInput, StyleProfile};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

const CONTENT_SYSTEM_PROMPT: &str = r#"You are a public radio content producer. From one interview you write every format the station publishes, in the station's voice and the DJ's personal style.

Formats:
- air_break: a script read live on air, about 90 seconds
- podcast_segment: a longer narrated segment, 5-10 minutes
- social_thread: 3-6 short posts that stand alone
- web_article: an HTML article built around the strongest quotes
- newsletter_copy: a short, warm blurb for the station newsletter
- press_release: a formal announcement in press release style

Return ONLY valid JSON with keys:
- "air_break": { "script": string, "estimated_seconds": number }
- "podcast_segment": { "script": string, "estimated_seconds": number }
- "social_thread": { "posts": list of string }
- "web_article": { "html": string }
- "newsletter_copy": { "text": string }
- "press_release": { "text": string }"#;

const FORMAT_KEYS: [&str; 6] = [
    "air_break",
    "podcast_segment",
    "social_thread",
    "web_article",
    "newsletter_copy",
    "press_release",
];

const MAX_TRANSCRIPT_CHARS: usize = 12_000;
const MAX_TAPE_CHARS: usize = 3000;
const MAX_STEERING_CHARS: usize = 1000;

/// Generate all six content formats.
pub async fn run(input: ContentInput, llm: &LlmClient) -> Value {
    let style = style_profile(&input.style_profile);
    let user_message = build_user_message(&input, &style);

    let formats = match llm
        .call_llm(CONTENT_SYSTEM_PROMPT, &user_message, llm.default_options())
        .await
    {
        Some(text) => parse_formats(&text),
        None => {
            warn!("All LLM providers failed, returning stub content");
            to_object(&ContentFormats::stub())
        }
    };

    Value::Object(formats)
}

/// Style for a DJ profile id.
///
/// Profiles are not stored anywhere yet, so every id gets the default style.
fn style_profile(profile_id: &str) -> StyleProfile {
    if !profile_id.is_empty() {
        debug!(profile_id, "Using default style for profile");
    }
    StyleProfile::default()
}

fn build_user_message(input: &ContentInput, style: &StyleProfile) -> String {
    let mut message = String::new();

    if let Some(ref name) = input.station.name {
        message.push_str(&format!("Station: {}\n", name));
    }
    if !input.station.voice_guide.is_empty() {
        message.push_str(&format!("Station voice guide:\n{}\n\n", input.station.voice_guide));
    }

    message.push_str(&format!(
        "DJ style: tone {}, vocabulary {}, sentence length {}\n",
        style.tone, style.vocabulary, style.sentence_length
    ));

    if !input.steering.is_empty() {
        message.push_str(&format!(
            "Steering: {}\n",
            prompt_json(&input.steering, MAX_STEERING_CHARS)
        ));
    }

    if !input.selected_tape.is_empty() {
        message.push_str(&format!(
            "\nSelected tape ({} segments):\n{}\n",
            input.selected_tape.len(),
            prompt_json(&input.selected_tape, MAX_TAPE_CHARS)
        ));
    }

    message.push_str(&format!(
        "\nTranscript:\n{}\n\nWrite all six formats and return JSON with: {}",
        truncate_chars(&input.transcript, MAX_TRANSCRIPT_CHARS),
        FORMAT_KEYS.join(", ")
    ));

    message
}

/// Parse the model's formats. Missing formats are filled with empty values;
/// an unparseable reply yields all six formats empty.
fn parse_formats(text: &str) -> Map<String, Value> {
    let empty = to_object(&ContentFormats::default());

    match extract_json_object(text) {
        Some(mut formats) => {
            for key in FORMAT_KEYS {
                if !formats.contains_key(key) {
                    if let Some(default) = empty.get(key) {
                        formats.insert(key.to_string(), default.clone());
                    }
                }
            }
            formats
        }
        None => {
            error!("Failed to parse content JSON: {}", truncate_chars(text, 200));
            empty
        }
    }
}

fn to_object(formats: &ContentFormats) -> Map<String, Value> {
    match serde_json::to_value(formats) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
