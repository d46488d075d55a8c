//! Collaborator traits.
//!
//! Every consumer receives these as `Arc<dyn Trait>`; the PostgreSQL and
//! OpenAI implementations live in `gnotes-db` and `gnotes-inference`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::*;

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Repository for notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes, newest first.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Fetch one note.
    async fn get(&self, id: Uuid) -> Result<Note>;

    /// Insert a note and return the stored row.
    async fn insert(&self, note: NewNote, embedding: Option<Vector>) -> Result<Note>;

    /// Replace a note's fields and return the stored row.
    ///
    /// The embedding is replaced too; `None` clears it so the note shows up
    /// in [`list_missing_embeddings`](Self::list_missing_embeddings).
    async fn update(&self, id: Uuid, update: NoteUpdate, embedding: Option<Vector>)
        -> Result<Note>;

    /// Delete a note.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Overwrite a note's embedding.
    async fn set_embedding(&self, id: Uuid, embedding: Vector) -> Result<()>;

    /// Notes without an embedding, oldest first.
    async fn list_missing_embeddings(&self) -> Result<Vec<Note>>;

    /// Every note, oldest first.
    async fn list_for_embedding(&self) -> Result<Vec<Note>>;

    /// Nearest notes above `query.threshold`, most similar first.
    async fn match_notes(&self, query: MatchQuery) -> Result<Vec<NoteMatch>>;

    /// Remove every note. Used by the demo seeder.
    async fn clear(&self) -> Result<u64>;
}

/// Append-only log of AI calls.
#[async_trait]
pub trait AiUsageLog: Send + Sync {
    async fn record(&self, feature: AiFeature) -> Result<()>;

    async fn list(&self) -> Result<Vec<AiUsageEvent>>;
}

// =============================================================================
// INFERENCE
// =============================================================================

/// Backend for generating embeddings.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed a batch of texts, one vector per input.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>>;

    /// Embed a single text.
    async fn embed_one(&self, text: &str) -> Result<Vector> {
        self.embed_texts(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse("embedding response was empty".to_string()))
    }

    /// Vector dimension produced by this backend.
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Backend for chat completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Run a chat completion and return the trimmed text of the first choice.
    async fn complete(&self, messages: &[ChatMessage], params: GenerationParams) -> Result<String>;

    fn model_name(&self) -> &str;
}
