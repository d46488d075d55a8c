//! Page-level views: landing, notes workspace, analytics, health.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use gnotes_core::{AiUsageCounts, AnalyticsSnapshot, WorkspaceView};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TagQuery {
    pub tag: Option<String>,
}

pub async fn landing() -> Json<serde_json::Value> {
    Json(json!({
        "name": "GenAI Notes",
        "tagline": "Transform Your Notes with AI",
        "description": "Create, organize, and discover insights from your notes with \
                        intelligent search and smart suggestions.",
        "features": [
            "AI auto-title",
            "Shorthand expansion",
            "Note summaries",
            "Semantic search",
            "Related notes",
            "Tag filtering",
            "Usage analytics"
        ],
        "links": {
            "notes": "/notes",
            "analytics": "/analytics",
            "api": "/api/v1/notes",
            "health": "/health"
        }
    }))
}

/// The notes workspace. The collection is fetched on every visit; a failed
/// fetch is reported in `load_error` next to the last known notes.
pub async fn notes_view(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Json<WorkspaceView> {
    // failure is recorded on the workspace and rendered in the view
    let _ = state.workspace.load().await;
    Json(state.workspace.view(query.tag.as_deref()).await)
}

/// Where the AI usage counts in an analytics response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageSource {
    Live,
    /// Usage log unreadable; counts from the last stored snapshot.
    Cached,
    /// Usage log unreadable and nothing cached; counts are zero.
    Unavailable,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub snapshot: AnalyticsSnapshot,
    pub ai_usage_source: UsageSource,
}

pub async fn analytics(State(state): State<AppState>) -> Result<Json<AnalyticsResponse>, ApiError> {
    let notes = state.store().list().await?;

    let (ai_usage, ai_usage_source) = match state.usage_log.list().await {
        Ok(events) => (AiUsageCounts::from_events(&events), UsageSource::Live),
        Err(e) => {
            warn!(subsystem = "api", op = "analytics", error = %e, "AI usage log unavailable");
            match state.analytics_cache.load().await {
                Some(cached) => (cached.ai_usage, UsageSource::Cached),
                None => (AiUsageCounts::default(), UsageSource::Unavailable),
            }
        }
    };

    let snapshot = AnalyticsSnapshot::compute(&notes, ai_usage, &Local::now());
    if ai_usage_source == UsageSource::Live {
        if let Err(e) = state.analytics_cache.store(&snapshot).await {
            warn!(subsystem = "api", op = "analytics", error = %e, "Failed to store analytics snapshot");
        }
    }

    Ok(Json(AnalyticsResponse {
        snapshot,
        ai_usage_source,
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
