//! Search diagnostics: per-note similarity and probe queries.

use serde::Serialize;
use uuid::Uuid;

use gnotes_core::{cosine_similarity, MatchQuery, Result};

use crate::semantic::{require_embedding, SemanticSearch};

/// Queries used when no probes are given.
pub const DEFAULT_PROBES: [&str; 4] = [
    "getting started",
    "artificial intelligence features",
    "organizing notes with tags",
    "usage statistics and charts",
];

/// Similarity between a query and one note.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityReport {
    pub note_id: Uuid,
    pub title: String,
    pub normalized_query: String,
    pub similarity: f64,
    /// Cosine distance, `1 - similarity`.
    pub distance: f64,
}

/// One hit of a probe query.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeHit {
    pub note_id: Uuid,
    pub title: String,
    pub similarity: f64,
}

/// Results of one probe query.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub query: String,
    pub normalized_query: String,
    pub results: Vec<ProbeHit>,
}

impl SemanticSearch {
    /// How close `note_id` is to `query`.
    pub async fn debug_similarity(&self, query: &str, note_id: Uuid) -> Result<SimilarityReport> {
        let note = self.store().get(note_id).await?;
        let stored = require_embedding(&note)?;
        let (normalized_query, embedding) = self.embed_query(query).await?;

        let similarity = cosine_similarity(embedding.as_slice(), stored.as_slice());
        Ok(SimilarityReport {
            note_id,
            title: note.title,
            normalized_query,
            similarity,
            distance: 1.0 - similarity,
        })
    }

    /// Run each probe at the fallback threshold and report the hits.
    ///
    /// An empty `probes` list runs [`DEFAULT_PROBES`].
    pub async fn analyze_quality(&self, probes: &[String]) -> Result<Vec<ProbeReport>> {
        let probes: Vec<String> = if probes.is_empty() {
            DEFAULT_PROBES.iter().map(|p| p.to_string()).collect()
        } else {
            probes.to_vec()
        };

        let mut reports = Vec::with_capacity(probes.len());
        for query in probes {
            let (normalized_query, embedding) = self.embed_query(&query).await?;
            let hits = self
                .store()
                .match_notes(MatchQuery {
                    embedding,
                    threshold: self.config().fallback_threshold,
                    limit: self.config().limit,
                    exclude_id: None,
                })
                .await?;
            reports.push(ProbeReport {
                query,
                normalized_query,
                results: hits
                    .into_iter()
                    .map(|h| ProbeHit {
                        note_id: h.note.id,
                        title: h.note.title,
                        similarity: h.similarity,
                    })
                    .collect(),
            });
        }
        Ok(reports)
    }
}
