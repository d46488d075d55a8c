//! # gnotes-core
//!
//! Core types, traits, and client-side logic for GenAI Notes.
//!
//! This crate holds everything that does not talk to the network directly:
//! the note model, the store and backend traits other crates implement,
//! tag filtering, the note draft (form) model, per-action AI state tracking,
//! analytics aggregation, and the in-memory notes workspace.

pub mod actions;
pub mod analytics;
pub mod defaults;
pub mod draft;
pub mod error;
pub mod logging;
pub mod models;
pub mod similarity;
pub mod tags;
pub mod text;
pub mod traits;
pub mod workspace;

// Re-export commonly used types at crate root
pub use actions::{ActionKey, ActionReport, ActionStatus, ActionTicket, ActionTracker};
pub use analytics::{AiUsageCounts, AnalyticsSnapshot, DayCount};
pub use draft::{DraftField, DraftTicket, NoteDraft, ValidationIssue};
pub use error::{Error, FailureKind, Result};
pub use models::*;
pub use similarity::cosine_similarity;
pub use tags::{filter_by_tag, tag_counts, top_tags, TagCount};
pub use text::{embedding_input, normalize_for_embedding};
pub use traits::*;
pub use workspace::{NotesWorkspace, WorkspaceView};
