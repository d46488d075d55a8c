//! Services behind the handlers and the maintenance CLI.

pub mod embeddings;
pub mod snapshot_cache;

pub use embeddings::{demo_notes, EmbeddingMaintenance, RunSummary};
pub use snapshot_cache::AnalyticsCache;
