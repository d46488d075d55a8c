//! # gnotes-search
//!
//! Semantic search for GenAI Notes.
//!
//! This crate provides:
//! - Query normalization (case folding, stop-word removal)
//! - Semantic search with a strict threshold and a lower fallback threshold
//! - Related-notes lookup
//! - Similarity debugging and search-quality probes
//!
//! ## Example
//!
//! ```ignore
//! use gnotes_search::SemanticSearch;
//!
//! let search = SemanticSearch::new(store, embedder);
//! let outcome = search.search("meeting notes").await?;
//! for hit in outcome.hits {
//!     println!("{} ({:.2})", hit.note.title, hit.similarity);
//! }
//! ```

pub mod diagnostics;
pub mod query;
pub mod semantic;

// Re-export core types
pub use gnotes_core::*;

pub use diagnostics::{ProbeHit, ProbeReport, SimilarityReport, DEFAULT_PROBES};
pub use query::normalize_query;
pub use semantic::{SearchConfig, SearchOutcome, SemanticSearch};
