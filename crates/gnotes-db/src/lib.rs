//! # gnotes-db
//!
//! PostgreSQL + pgvector storage for GenAI Notes.
//!
//! This crate provides:
//! - Connection pool management
//! - `PgNoteStore`: note CRUD, embedding maintenance, and `match_notes`
//!   nearest-neighbour lookups
//! - `PgAiUsageLog`: the append-only AI usage log
//! - In-memory stores with the same semantics for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use gnotes_db::{Database, NewNote, NoteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/gnotes").await?;
//!
//!     let note = db.notes.insert(NewNote {
//!         title: "Hello".to_string(),
//!         content: "Hello, world!".to_string(),
//!         tags: vec!["greeting".to_string()],
//!         created_at: None,
//!     }, None).await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```
pub mod ai_usage;
pub mod memory;
pub mod notes;
pub mod pool;

// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use gnotes_core::*;

pub use ai_usage::PgAiUsageLog;
pub use memory::{MemoryAiUsageLog, MemoryNoteStore};
pub use notes::PgNoteStore;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

use std::sync::Arc;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository.
    pub notes: Arc<PgNoteStore>,
    /// AI usage log.
    pub ai_usage: Arc<PgAiUsageLog>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: Arc::new(PgNoteStore::new(pool.clone())),
            ai_usage: Arc::new(PgAiUsageLog::new(pool.clone())),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Note store as a trait object.
    pub fn note_store(&self) -> Arc<dyn NoteStore> {
        self.notes.clone()
    }

    /// Usage log as a trait object.
    pub fn usage_log(&self) -> Arc<dyn AiUsageLog> {
        self.ai_usage.clone()
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
