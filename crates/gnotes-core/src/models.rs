//! Domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::error::Error;

/// Embedding vector type (re-exported from pgvector).
pub use pgvector::Vector;

// =============================================================================
// NOTES
// =============================================================================

/// A stored note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Semantic embedding; never sent to API clients.
    #[serde(skip)]
    pub embedding: Option<Vector>,
}

impl Note {
    /// Whether the note carries `tag` (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}

/// A note about to be inserted. The backend assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    /// Explicit creation time; `None` lets the backend use "now".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Replacement fields for an existing note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// A note returned by a similarity match, with its score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteMatch {
    #[serde(flatten)]
    pub note: Note,
    /// Cosine similarity, higher is closer.
    pub similarity: f64,
}

/// Parameters of a nearest-neighbour query.
#[derive(Debug, Clone)]
pub struct MatchQuery {
    pub embedding: Vector,
    /// Only rows with similarity strictly above this are returned.
    pub threshold: f64,
    pub limit: i64,
    /// Exclude this note (used for "related notes").
    pub exclude_id: Option<Uuid>,
}

// =============================================================================
// AI USAGE
// =============================================================================

/// AI-assisted feature, as recorded in the usage log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AiFeature {
    #[serde(rename = "summarize")]
    Summarize,
    #[serde(rename = "autoTitle")]
    AutoTitle,
    #[serde(rename = "generate")]
    Generate,
}

impl AiFeature {
    pub const ALL: [AiFeature; 3] = [AiFeature::Summarize, AiFeature::AutoTitle, AiFeature::Generate];

    /// Name stored in the usage log.
    pub fn as_str(&self) -> &'static str {
        match self {
            AiFeature::Summarize => "summarize",
            AiFeature::AutoTitle => "autoTitle",
            AiFeature::Generate => "generate",
        }
    }

    /// Chart label.
    pub fn label(&self) -> &'static str {
        match self {
            AiFeature::Summarize => "Summarize",
            AiFeature::AutoTitle => "Auto-Title",
            AiFeature::Generate => "Generate",
        }
    }
}

impl fmt::Display for AiFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiFeature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summarize" => Ok(AiFeature::Summarize),
            "autoTitle" => Ok(AiFeature::AutoTitle),
            "generate" => Ok(AiFeature::Generate),
            other => Err(Error::InvalidInput(format!("unknown AI feature: {}", other))),
        }
    }
}

/// One logged AI call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiUsageEvent {
    pub feature: AiFeature,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// CHAT COMPLETION
// =============================================================================

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters for a completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}
