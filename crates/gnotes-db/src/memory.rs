//! In-memory stores.
//!
//! Behave like the PostgreSQL stores (ordering, `match_notes` threshold and
//! exclusion semantics) without a database. Used by tests and local demos.
//! A failure can be injected to exercise connection and authorization
//! error paths.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use pgvector::Vector;
use uuid::Uuid;

use gnotes_core::{
    cosine_similarity, AiFeature, AiUsageEvent, AiUsageLog, Error, FailureKind, MatchQuery,
    NewNote, Note, NoteMatch, NoteStore, NoteUpdate, Result,
};

fn injected_error(kind: FailureKind) -> Error {
    match kind {
        FailureKind::Network => Error::Database(sqlx::Error::PoolTimedOut),
        FailureKind::Unauthorized => Error::Unauthorized("permission denied".to_string()),
        other => Error::Internal(format!("injected {:?} failure", other)),
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// In-memory NoteStore.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: Mutex<Vec<Note>>,
    failure: Mutex<Option<FailureKind>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `notes`.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: Mutex::new(notes),
            failure: Mutex::new(None),
        }
    }

    /// Make every following call fail with `kind` until cleared with `None`.
    pub fn set_failure(&self, kind: Option<FailureKind>) {
        *lock(&self.failure) = kind;
    }

    pub fn len(&self) -> usize {
        lock(&self.notes).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<()> {
        match *lock(&self.failure) {
            Some(kind) => Err(injected_error(kind)),
            None => Ok(()),
        }
    }

    fn sorted(&self, newest_first: bool) -> Vec<Note> {
        let mut notes = lock(&self.notes).clone();
        notes.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        if newest_first {
            notes.reverse();
        }
        notes
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn list(&self) -> Result<Vec<Note>> {
        self.check()?;
        Ok(self.sorted(true))
    }

    async fn get(&self, id: Uuid) -> Result<Note> {
        self.check()?;
        lock(&self.notes)
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn insert(&self, note: NewNote, embedding: Option<Vector>) -> Result<Note> {
        self.check()?;
        let note = Note {
            id: Uuid::new_v4(),
            title: note.title,
            content: note.content,
            tags: note.tags,
            created_at: note.created_at.unwrap_or_else(Utc::now),
            embedding,
        };
        lock(&self.notes).push(note.clone());
        Ok(note)
    }

    async fn update(&self, id: Uuid, update: NoteUpdate, embedding: Option<Vector>) -> Result<Note> {
        self.check()?;
        let mut notes = lock(&self.notes);
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(Error::NoteNotFound(id))?;
        note.title = update.title;
        note.content = update.content;
        note.tags = update.tags;
        note.embedding = embedding;
        Ok(note.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.check()?;
        let mut notes = lock(&self.notes);
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn set_embedding(&self, id: Uuid, embedding: Vector) -> Result<()> {
        self.check()?;
        let mut notes = lock(&self.notes);
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(Error::NoteNotFound(id))?;
        note.embedding = Some(embedding);
        Ok(())
    }

    async fn list_missing_embeddings(&self) -> Result<Vec<Note>> {
        self.check()?;
        Ok(self
            .sorted(false)
            .into_iter()
            .filter(|n| n.embedding.is_none())
            .collect())
    }

    async fn list_for_embedding(&self) -> Result<Vec<Note>> {
        self.check()?;
        Ok(self.sorted(false))
    }

    async fn match_notes(&self, query: MatchQuery) -> Result<Vec<NoteMatch>> {
        self.check()?;
        let target = query.embedding.as_slice();
        let mut matches: Vec<NoteMatch> = lock(&self.notes)
            .iter()
            .filter(|n| Some(n.id) != query.exclude_id)
            .filter_map(|n| {
                let embedding = n.embedding.as_ref()?;
                let similarity = cosine_similarity(embedding.as_slice(), target);
                (similarity > query.threshold).then(|| NoteMatch {
                    note: Note {
                        embedding: None,
                        ..n.clone()
                    },
                    similarity,
                })
            })
            .collect();
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(query.limit.max(0) as usize);
        Ok(matches)
    }

    async fn clear(&self) -> Result<u64> {
        self.check()?;
        let mut notes = lock(&self.notes);
        let removed = notes.len() as u64;
        notes.clear();
        Ok(removed)
    }
}

/// In-memory AiUsageLog.
#[derive(Default)]
pub struct MemoryAiUsageLog {
    events: Mutex<Vec<AiUsageEvent>>,
    failure: Mutex<Option<FailureKind>>,
}

impl MemoryAiUsageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failure(&self, kind: Option<FailureKind>) {
        *lock(&self.failure) = kind;
    }

    /// Number of recorded calls for `feature`.
    pub fn count(&self, feature: AiFeature) -> usize {
        lock(&self.events)
            .iter()
            .filter(|e| e.feature == feature)
            .count()
    }

    fn check(&self) -> Result<()> {
        match *lock(&self.failure) {
            Some(kind) => Err(injected_error(kind)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AiUsageLog for MemoryAiUsageLog {
    async fn record(&self, feature: AiFeature) -> Result<()> {
        self.check()?;
        lock(&self.events).push(AiUsageEvent {
            feature,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AiUsageEvent>> {
        self.check()?;
        Ok(lock(&self.events).clone())
    }
}
