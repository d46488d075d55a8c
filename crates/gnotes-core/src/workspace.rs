//! The notes workspace: the cached note collection behind the notes view.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::draft::NoteDraft;
use crate::error::Result;
use crate::models::{Note, Vector};
use crate::tags::{self, TagCount};
use crate::text::embedding_input;
use crate::traits::{EmbeddingBackend, NoteStore};

/// What the notes view renders.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceView {
    pub notes: Vec<Note>,
    pub tags: Vec<TagCount>,
    pub selected_tag: Option<String>,
    /// Size of the whole collection, before filtering.
    pub total: usize,
    /// Shown instead of the list when `notes` is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<String>,
    /// Last load failure, shown with a retry affordance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}

/// In-memory note collection kept in step with a [`NoteStore`].
///
/// Writes go to the store first; the row it returns then replaces or is
/// prepended to the cached collection. Concurrent writers are last write
/// wins.
pub struct NotesWorkspace {
    store: Arc<dyn NoteStore>,
    embedder: Option<Arc<dyn EmbeddingBackend>>,
    notes: RwLock<Vec<Note>>,
    load_error: RwLock<Option<String>>,
}

impl NotesWorkspace {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self {
            store,
            embedder: None,
            notes: RwLock::new(Vec::new()),
            load_error: RwLock::new(None),
        }
    }

    /// Embed notes on create and update.
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingBackend>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn store(&self) -> &Arc<dyn NoteStore> {
        &self.store
    }

    /// Fetch the collection from the store.
    ///
    /// On failure the previous collection is kept and the error message is
    /// remembered for [`view`](Self::view).
    pub async fn load(&self) -> Result<usize> {
        let start = Instant::now();
        match self.store.list().await {
            Ok(notes) => {
                let count = notes.len();
                *self.notes.write().await = notes;
                *self.load_error.write().await = None;
                debug!(
                    subsystem = "workspace",
                    op = "load",
                    result_count = count,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Loaded notes"
                );
                Ok(count)
            }
            Err(e) => {
                warn!(
                    subsystem = "workspace",
                    op = "load",
                    error = %e,
                    "Failed to load notes"
                );
                *self.load_error.write().await = Some(format!("Failed to load notes: {}", e));
                Err(e)
            }
        }
    }

    /// Snapshot of the cached collection, newest first.
    pub async fn notes(&self) -> Vec<Note> {
        self.notes.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<Note> {
        self.notes.read().await.iter().find(|n| n.id == id).cloned()
    }

    /// Filtered view with tag counts and the empty-state message.
    pub async fn view(&self, tag: Option<&str>) -> WorkspaceView {
        let notes = self.notes.read().await;
        let tag = tag.map(str::trim).filter(|t| !t.is_empty());
        let filtered: Vec<Note> = tags::filter_by_tag(&notes, tag)
            .into_iter()
            .cloned()
            .collect();

        let empty_state = if filtered.is_empty() {
            Some(match tag {
                Some(tag) => format!("No notes tagged '{}'.", tag),
                None => "No notes yet.".to_string(),
            })
        } else {
            None
        };

        WorkspaceView {
            tags: tags::tag_counts(&notes),
            total: notes.len(),
            selected_tag: tag.map(str::to_string),
            notes: filtered,
            empty_state,
            load_error: self.load_error.read().await.clone(),
        }
    }

    /// Validate and insert a new note.
    pub async fn create(&self, draft: &NoteDraft) -> Result<Note> {
        let new_note = draft.to_new_note()?;
        let embedding = self.embed(&new_note.title, &new_note.content).await;
        let note = self.store.insert(new_note, embedding).await?;

        info!(
            subsystem = "workspace",
            op = "create",
            note_id = %note.id,
            embedded = note.has_embedding(),
            "Note created"
        );
        self.notes.write().await.insert(0, note.clone());
        Ok(note)
    }

    /// Validate and replace an existing note.
    pub async fn update(&self, id: Uuid, draft: &NoteDraft) -> Result<Note> {
        let update = draft.to_update()?;
        let embedding = self.embed(&update.title, &update.content).await;
        let note = self.store.update(id, update, embedding).await?;

        info!(
            subsystem = "workspace",
            op = "update",
            note_id = %id,
            "Note updated"
        );
        let mut notes = self.notes.write().await;
        match notes.iter_mut().find(|n| n.id == id) {
            Some(slot) => *slot = note.clone(),
            None => notes.insert(0, note.clone()),
        }
        Ok(note)
    }

    /// Create or update depending on the draft's mode; clears it on success.
    pub async fn submit(&self, draft: &mut NoteDraft) -> Result<Note> {
        let note = match draft.editing_id() {
            Some(id) => self.update(id, draft).await?,
            None => self.create(draft).await?,
        };
        draft.clear();
        Ok(note)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.store.delete(id).await?;
        info!(
            subsystem = "workspace",
            op = "delete",
            note_id = %id,
            "Note deleted"
        );
        self.notes.write().await.retain(|n| n.id != id);
        Ok(())
    }

    /// Embedding for a note, or `None` when there is no embedder or it fails.
    async fn embed(&self, title: &str, content: &str) -> Option<Vector> {
        let embedder = self.embedder.as_ref()?;
        match embedder.embed_one(&embedding_input(title, content)).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(
                    subsystem = "workspace",
                    op = "embed",
                    model = embedder.model_name(),
                    error = %e,
                    "Embedding failed; storing note without embedding"
                );
                None
            }
        }
    }
}
