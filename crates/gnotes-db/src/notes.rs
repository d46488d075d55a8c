//! Note repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use gnotes_core::{Error, MatchQuery, NewNote, Note, NoteMatch, NoteStore, NoteUpdate, Result};

const NOTE_COLUMNS: &str = "id, title, content, tags, created_at, embedding";

/// PostgreSQL implementation of NoteStore.
pub struct PgNoteStore {
    pool: Pool<Postgres>,
}

impl PgNoteStore {
    /// Create a new PgNoteStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn list_ordered(&self, order: &str) -> Result<Vec<Note>> {
        let query = format!("SELECT {} FROM notes ORDER BY created_at {}", NOTE_COLUMNS, order);
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(note_from_row).collect())
    }
}

fn note_from_row(row: &PgRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        tags: row.get("tags"),
        created_at: row.get("created_at"),
        embedding: row.get("embedding"),
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn list(&self) -> Result<Vec<Note>> {
        self.list_ordered("DESC").await
    }

    async fn get(&self, id: Uuid) -> Result<Note> {
        let query = format!("SELECT {} FROM notes WHERE id = $1", NOTE_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;
        Ok(note_from_row(&row))
    }

    async fn insert(&self, note: NewNote, embedding: Option<Vector>) -> Result<Note> {
        let query = format!(
            "INSERT INTO notes (title, content, tags, created_at, embedding)
             VALUES ($1, $2, $3, COALESCE($4, now()), $5)
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(&note.title)
            .bind(&note.content)
            .bind(&note.tags)
            .bind(note.created_at)
            .bind(embedding)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(note_from_row(&row))
    }

    async fn update(&self, id: Uuid, update: NoteUpdate, embedding: Option<Vector>) -> Result<Note> {
        let query = format!(
            "UPDATE notes
             SET title = $2, content = $3, tags = $4, embedding = $5
             WHERE id = $1
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(&update.title)
            .bind(&update.content)
            .bind(&update.tags)
            .bind(embedding)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;
        Ok(note_from_row(&row))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn set_embedding(&self, id: Uuid, embedding: Vector) -> Result<()> {
        let result = sqlx::query("UPDATE notes SET embedding = $2 WHERE id = $1")
            .bind(id)
            .bind(embedding)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn list_missing_embeddings(&self) -> Result<Vec<Note>> {
        let query = format!(
            "SELECT {} FROM notes WHERE embedding IS NULL ORDER BY created_at ASC",
            NOTE_COLUMNS
        );
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn list_for_embedding(&self) -> Result<Vec<Note>> {
        self.list_ordered("ASC").await
    }

    async fn match_notes(&self, query: MatchQuery) -> Result<Vec<NoteMatch>> {
        let start = Instant::now();
        let rows = sqlx::query(
            "SELECT id, title, content, tags, created_at, similarity
             FROM match_notes($1::vector, $2::float8, $3::int, $4::uuid)",
        )
        .bind(&query.embedding)
        .bind(query.threshold)
        .bind(query.limit)
        .bind(query.exclude_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let matches: Vec<NoteMatch> = rows
            .iter()
            .map(|row| NoteMatch {
                note: Note {
                    id: row.get("id"),
                    title: row.get("title"),
                    content: row.get("content"),
                    tags: row.get("tags"),
                    created_at: row.get("created_at"),
                    embedding: None,
                },
                similarity: row.get("similarity"),
            })
            .collect();

        debug!(
            subsystem = "db",
            component = "notes",
            op = "match_notes",
            threshold = query.threshold,
            result_count = matches.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "match_notes complete"
        );
        Ok(matches)
    }

    async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notes")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected())
    }
}
