//! Data models for the agent router.
//!
//! Agent inputs are decoded leniently: every field has a default, and a
//! missing key or an explicit `null` both take it, so a partially filled
//! request still reaches its agent. Outputs produced by the
//! LLM are passed through as JSON; the typed outputs here are the canned stub
//! and failure payloads the agents fall back to.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Explicit `null` decodes to the field's default, same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Input for the coach agent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CoachInput {
    /// The producer's question.
    #[serde(deserialize_with = "null_as_default")]
    pub query: String,
    /// Where the story currently is in production.
    #[serde(deserialize_with = "null_as_default")]
    pub production_state: ProductionState,
    /// Transcript excerpt; overrides `production_state.transcript_context`.
    pub transcript_context: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductionState {
    pub step: Option<String>,
    pub transcript_context: Option<String>,
}

/// Input for the transcript agent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TranscriptInput {
    #[serde(deserialize_with = "null_as_default")]
    pub transcript: String,
    /// Word-level timings from speech-to-text, passed through as-is.
    #[serde(deserialize_with = "null_as_default")]
    pub word_timestamps: Vec<Value>,
}

/// Input for the content agent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentInput {
    #[serde(deserialize_with = "null_as_default")]
    pub transcript: String,
    /// Tape segments the producer picked for the piece.
    #[serde(deserialize_with = "null_as_default")]
    pub selected_tape: Vec<Value>,
    /// Free-form steering controls (tone, length, focus, ...).
    #[serde(deserialize_with = "null_as_default")]
    pub steering: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub station: StationInfo,
    /// Identifier of the DJ's style profile.
    #[serde(deserialize_with = "null_as_default")]
    pub style_profile: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StationInfo {
    pub name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub voice_guide: String,
}

/// Input for the workflow agent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowInput {
    #[serde(deserialize_with = "null_as_default")]
    pub event: String,
    pub story: Value,
    #[serde(deserialize_with = "null_as_default")]
    pub org_stories: Vec<Value>,
}

impl Default for WorkflowInput {
    fn default() -> Self {
        Self {
            event: String::new(),
            story: Value::Object(Map::new()),
            org_stories: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transcript outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryAngle {
    pub angle: String,
    pub strength: f64,
    pub reasoning: String,
}

/// Result of transcript analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptAnalysis {
    pub story_angles: Vec<StoryAngle>,
    pub key_quotes: Vec<Value>,
    pub emotional_arc: Vec<Value>,
    pub filler_words: Vec<Value>,
}

impl TranscriptAnalysis {
    /// Canned analysis used when no LLM provider answers.
    pub fn stub() -> Self {
        Self {
            story_angles: vec![
                StoryAngle {
                    angle: "Community change".to_string(),
                    strength: 0.9,
                    reasoning: "Strong personal narrative with clear arc".to_string(),
                },
                StoryAngle {
                    angle: "Housing policy".to_string(),
                    strength: 0.7,
                    reasoning: "Data points support systemic analysis".to_string(),
                },
            ],
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Content outputs
// ---------------------------------------------------------------------------

/// A script meant to be read on air or recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimedScript {
    pub script: String,
    pub estimated_seconds: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialThread {
    pub posts: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebArticle {
    pub html: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextCopy {
    pub text: String,
}

/// The six formats generated from one interview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentFormats {
    pub air_break: TimedScript,
    pub podcast_segment: TimedScript,
    pub social_thread: SocialThread,
    pub web_article: WebArticle,
    pub newsletter_copy: TextCopy,
    pub press_release: TextCopy,
}

impl ContentFormats {
    /// Placeholder formats used when no LLM provider answers.
    pub fn stub() -> Self {
        Self {
            air_break: TimedScript {
                script: "[ContentAgent stub] Air break script...".to_string(),
                estimated_seconds: 90,
            },
            podcast_segment: TimedScript {
                script: "[ContentAgent stub] Podcast segment...".to_string(),
                estimated_seconds: 480,
            },
            social_thread: SocialThread {
                posts: vec!["[ContentAgent stub] Social post 1".to_string()],
            },
            web_article: WebArticle {
                html: "<p>[ContentAgent stub] Web article...</p>".to_string(),
            },
            newsletter_copy: TextCopy {
                text: "[ContentAgent stub] Newsletter copy...".to_string(),
            },
            press_release: TextCopy {
                text: "[ContentAgent stub] Press release...".to_string(),
            },
        }
    }
}

/// Writing style applied to generated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub tone: String,
    pub vocabulary: String,
    pub sentence_length: String,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            tone: "conversational".to_string(),
            vocabulary: "accessible".to_string(),
            sentence_length: "short".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Workflow outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryOverlap {
    pub story_title: String,
    pub overlap_reason: String,
}

/// Suggested next steps after a workflow event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub actions: Vec<WorkflowAction>,
    pub overlaps: Vec<StoryOverlap>,
    pub message: String,
}

impl WorkflowResult {
    /// Canned result used when no LLM provider answers.
    pub fn stub(event: &str) -> Self {
        Self {
            actions: vec![
                WorkflowAction {
                    action_type: "review".to_string(),
                    description: "Review transcript for accuracy".to_string(),
                    priority: Priority::High,
                },
                WorkflowAction {
                    action_type: "assign".to_string(),
                    description: "Assign to producer for editing".to_string(),
                    priority: Priority::Medium,
                },
            ],
            overlaps: Vec::new(),
            message: format!("Processed event: {}. Transcript ready for review.", event),
        }
    }

    /// Result used when the LLM answered with something that isn't JSON.
    pub fn unparsed(event: &str) -> Self {
        Self {
            message: format!("Processed event: {}", event),
            ..Self::default()
        }
    }
}
