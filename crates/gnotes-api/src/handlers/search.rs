//! Semantic search and search diagnostics.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gnotes_search::{ProbeReport, SearchOutcome, SimilarityReport};

use crate::error::ApiError;
use crate::state::AppState;

pub const NO_RESULTS: &str = "No notes found matching your search";

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub outcome: SearchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<&'static str>,
}

/// No matches is a successful, empty response.
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let outcome = state.search.search(&req.query).await?;
    Ok(Json(SearchResponse {
        empty_state: outcome.is_empty().then_some(NO_RESULTS),
        outcome,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct DebugRequest {
    pub query: Option<String>,
    /// Compare `query` against this note only.
    pub note_id: Option<Uuid>,
    /// Probe queries; defaults to `query`, or the built-in probes.
    #[serde(default)]
    pub probes: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DebugResponse {
    Similarity(SimilarityReport),
    Quality { probes: Vec<ProbeReport> },
}

/// With `note_id`: similarity of `query` to that note. Otherwise: the top
/// results of each probe query.
pub async fn search_debug(
    State(state): State<AppState>,
    Json(req): Json<DebugRequest>,
) -> Result<Json<DebugResponse>, ApiError> {
    if let Some(note_id) = req.note_id {
        let query = req
            .query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("query is required with note_id".to_string()))?;
        let report = state.search.debug_similarity(query, note_id).await?;
        return Ok(Json(DebugResponse::Similarity(report)));
    }

    let probes = match (req.probes.is_empty(), req.query) {
        (true, Some(query)) if !query.trim().is_empty() => vec![query],
        _ => req.probes,
    };
    let probes = state.search.analyze_quality(&probes).await?;
    Ok(Json(DebugResponse::Quality { probes }))
}
