//! Embedding maintenance: backfill, regeneration, and demo data.
//!
//! Used by the `gnotes-embeddings` binary. One note failing does not stop a
//! run; only failing to list the notes is fatal.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use gnotes_core::defaults::BACKFILL_DELAY_MS;
use gnotes_core::{embedding_input, EmbeddingBackend, NewNote, Note, NoteStore, Result};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
    pub total: usize,
}

/// The four notes inserted by `seed`, newest first, an hour apart.
pub fn demo_notes(now: DateTime<Utc>) -> Vec<NewNote> {
    let notes: [(&str, &str, [&str; 2]); 4] = [
        (
            "Welcome to GenAI Notes!",
            "This is a demo note. You can edit or delete it, or create your own.",
            ["demo", "welcome"],
        ),
        (
            "AI Features",
            "Try the AI auto-title and summarization features!",
            ["ai", "features"],
        ),
        (
            "Tag Filtering",
            "Filter notes by tags using the sidebar.",
            ["tags", "filter"],
        ),
        (
            "Analytics",
            "Check out the Analytics page to see note and tag stats.",
            ["analytics", "demo"],
        ),
    ];

    notes
        .into_iter()
        .enumerate()
        .map(|(hours_ago, (title, content, tags))| NewNote {
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: Some(now - ChronoDuration::hours(hours_ago as i64)),
        })
        .collect()
}

pub struct EmbeddingMaintenance {
    store: Arc<dyn NoteStore>,
    embedder: Arc<dyn EmbeddingBackend>,
    delay: Duration,
}

impl EmbeddingMaintenance {
    pub fn new(store: Arc<dyn NoteStore>, embedder: Arc<dyn EmbeddingBackend>) -> Self {
        Self {
            store,
            embedder,
            delay: Duration::from_millis(BACKFILL_DELAY_MS),
        }
    }

    /// Pause between notes.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Embed every note that has no embedding.
    pub async fn backfill(&self) -> Result<RunSummary> {
        let notes = self.store.list_missing_embeddings().await?;
        if notes.is_empty() {
            info!(subsystem = "cli", op = "backfill", "All notes already have embeddings");
        }
        Ok(self.embed_all("backfill", notes).await)
    }

    /// Re-embed every note, oldest first.
    pub async fn regenerate(&self) -> Result<RunSummary> {
        let notes = self.store.list_for_embedding().await?;
        Ok(self.embed_all("regenerate", notes).await)
    }

    /// Insert the demo notes, embedding each one, optionally clearing the
    /// store first.
    pub async fn seed(&self, clear: bool) -> Result<Vec<Note>> {
        if clear {
            let removed = self.store.clear().await?;
            info!(subsystem = "cli", op = "seed", removed, "Cleared existing notes");
        }

        let mut inserted = Vec::new();
        for new_note in demo_notes(Utc::now()) {
            let embedding = match self
                .embedder
                .embed_one(&embedding_input(&new_note.title, &new_note.content))
                .await
            {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(subsystem = "cli", op = "seed", title = %new_note.title, error = %e, "Embedding failed; inserting without embedding");
                    None
                }
            };
            let note = self.store.insert(new_note, embedding).await?;
            info!(subsystem = "cli", op = "seed", note_id = %note.id, title = %note.title, "Inserted demo note");
            inserted.push(note);
        }
        Ok(inserted)
    }

    async fn embed_all(&self, op: &'static str, notes: Vec<Note>) -> RunSummary {
        let start = Instant::now();
        let mut summary = RunSummary {
            total: notes.len(),
            ..RunSummary::default()
        };
        info!(subsystem = "cli", op, total = summary.total, model = self.embedder.model_name(), "Found notes to process");

        for (i, note) in notes.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.embed_note(note).await {
                Ok(()) => {
                    summary.processed += 1;
                    info!(subsystem = "cli", op, note_id = %note.id, title = %note.title, "Updated embedding");
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(subsystem = "cli", op, note_id = %note.id, title = %note.title, error = %e, "Failed to update embedding");
                }
            }
        }

        info!(
            subsystem = "cli",
            op,
            processed = summary.processed,
            failed = summary.failed,
            total = summary.total,
            duration_ms = start.elapsed().as_millis() as u64,
            "Run complete"
        );
        summary
    }

    async fn embed_note(&self, note: &Note) -> Result<()> {
        let vector = self
            .embedder
            .embed_one(&embedding_input(&note.title, &note.content))
            .await?;
        self.store.set_embedding(note.id, vector).await
    }
}
