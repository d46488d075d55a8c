//! Semantic search over note embeddings.
//!
//! Nearest-neighbour ranking is done by the store (`match_notes`); this
//! module prepares the query embedding and applies the threshold fallback.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use gnotes_core::defaults::{
    RELATED_LIMIT, RELATED_THRESHOLD, SEARCH_LIMIT, SEARCH_THRESHOLD_FALLBACK,
    SEARCH_THRESHOLD_STRICT,
};
use gnotes_core::{EmbeddingBackend, Error, MatchQuery, Note, NoteMatch, NoteStore, Result, Vector};

use crate::query::normalize_query;

/// Thresholds and limits for semantic search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Tried first.
    pub strict_threshold: f64,
    /// Tried only when the strict pass returns nothing.
    pub fallback_threshold: f64,
    pub related_threshold: f64,
    pub limit: i64,
    pub related_limit: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strict_threshold: SEARCH_THRESHOLD_STRICT,
            fallback_threshold: SEARCH_THRESHOLD_FALLBACK,
            related_threshold: RELATED_THRESHOLD,
            limit: SEARCH_LIMIT,
            related_limit: RELATED_LIMIT,
        }
    }
}

impl SearchConfig {
    /// Read thresholds from `SEARCH_THRESHOLD_STRICT`,
    /// `SEARCH_THRESHOLD_FALLBACK` and `RELATED_THRESHOLD`.
    pub fn from_env() -> Self {
        fn threshold(var: &str, default: f64) -> f64 {
            std::env::var(var)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();
        Self {
            strict_threshold: threshold("SEARCH_THRESHOLD_STRICT", defaults.strict_threshold),
            fallback_threshold: threshold("SEARCH_THRESHOLD_FALLBACK", defaults.fallback_threshold),
            related_threshold: threshold("RELATED_THRESHOLD", defaults.related_threshold),
            ..defaults
        }
    }
}

/// Result of one search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub normalized_query: String,
    /// Threshold of the pass that produced `hits`.
    pub threshold_used: f64,
    /// Whether the strict pass was empty and the fallback ran.
    pub used_fallback: bool,
    pub hits: Vec<NoteMatch>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Semantic search engine.
pub struct SemanticSearch {
    store: Arc<dyn NoteStore>,
    embedder: Arc<dyn EmbeddingBackend>,
    config: SearchConfig,
}

impl SemanticSearch {
    pub fn new(store: Arc<dyn NoteStore>, embedder: Arc<dyn EmbeddingBackend>) -> Self {
        Self {
            store,
            embedder,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &Arc<dyn NoteStore> {
        &self.store
    }

    /// Embed a query after normalization.
    pub(crate) async fn embed_query(&self, query: &str) -> Result<(String, Vector)> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("Search query is required".to_string()));
        }
        let normalized = normalize_query(query);
        let embedding = self.embedder.embed_one(&normalized).await?;
        Ok((normalized, embedding))
    }

    /// Notes similar to `query`, strict threshold first.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let start = Instant::now();
        let (normalized, embedding) = self.embed_query(query).await?;

        let mut threshold_used = self.config.strict_threshold;
        let mut hits = self
            .store
            .match_notes(MatchQuery {
                embedding: embedding.clone(),
                threshold: threshold_used,
                limit: self.config.limit,
                exclude_id: None,
            })
            .await?;

        let used_fallback = hits.is_empty();
        if used_fallback {
            threshold_used = self.config.fallback_threshold;
            debug!(
                subsystem = "search",
                component = "semantic_search",
                op = "fallback",
                threshold = threshold_used,
                "No results at strict threshold, retrying"
            );
            hits = self
                .store
                .match_notes(MatchQuery {
                    embedding,
                    threshold: threshold_used,
                    limit: self.config.limit,
                    exclude_id: None,
                })
                .await?;
        }

        info!(
            subsystem = "search",
            component = "semantic_search",
            op = "search",
            query = %normalized,
            threshold = threshold_used,
            result_count = hits.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );

        Ok(SearchOutcome {
            query: query.to_string(),
            normalized_query: normalized,
            threshold_used,
            used_fallback,
            hits,
        })
    }

    /// Notes similar to the note `note_id`, excluding itself.
    pub async fn related(&self, note_id: Uuid) -> Result<Vec<NoteMatch>> {
        let note = self.store.get(note_id).await?;
        let embedding = require_embedding(&note)?;

        let hits = self
            .store
            .match_notes(MatchQuery {
                embedding,
                threshold: self.config.related_threshold,
                limit: self.config.related_limit,
                exclude_id: Some(note_id),
            })
            .await?;

        debug!(
            subsystem = "search",
            component = "semantic_search",
            op = "related",
            note_id = %note_id,
            result_count = hits.len(),
            "Related notes found"
        );
        Ok(hits)
    }
}

/// The stored embedding of `note`, or a not-found error naming it.
pub(crate) fn require_embedding(note: &Note) -> Result<Vector> {
    note.embedding
        .clone()
        .ok_or_else(|| Error::NotFound(format!("no embedding available for note {}", note.id)))
}
