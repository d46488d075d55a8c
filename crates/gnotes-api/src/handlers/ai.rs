//! AI writing aids and their per-action status.
//!
//! Every action is tracked independently: starting one marks it loading and
//! its outcome is recorded only if no newer request for the same action
//! started in the meantime. Calls run on their own task, so a client that
//! disconnects does not leave its action stuck in loading.

use std::future::Future;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use gnotes_core::{ActionKey, ActionReport, AiFeature, Error, Result};

use crate::error::ApiError;
use crate::state::AppState;

async fn tracked<F>(state: &AppState, key: ActionKey, call: F) -> std::result::Result<String, ApiError>
where
    F: Future<Output = Result<String>> + Send + 'static,
{
    let tracker = state.tracker.clone();
    let ticket = tracker.begin(key);
    let task = tokio::spawn({
        let tracker = tracker.clone();
        async move {
            let result = call.await;
            tracker.finish(ticket, &result);
            result
        }
    });

    match task.await {
        Ok(result) => result.map_err(ApiError::Ai),
        Err(join_err) => {
            let failure: Result<String> = Err(Error::Internal(join_err.to_string()));
            tracker.finish(ticket, &failure);
            if join_err.is_panic() {
                std::panic::resume_unwind(join_err.into_panic());
            }
            error!(subsystem = "api", feature = key.feature.as_str(), "AI task aborted");
            failure.map_err(ApiError::Ai)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub note_id: Uuid,
    pub summary: String,
}

pub async fn summarize_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> std::result::Result<Json<SummaryResponse>, ApiError> {
    let note = state.store().get(id).await?;
    let key = ActionKey::for_note(AiFeature::Summarize, id);
    let assistant = state.assistant.clone();
    let summary = tracked(&state, key, async move {
        assistant.summarize(&note.content).await
    })
    .await?;
    Ok(Json(SummaryResponse { note_id: id, summary }))
}

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub title: String,
}

pub async fn auto_title(
    State(state): State<AppState>,
    Json(req): Json<TitleRequest>,
) -> std::result::Result<Json<TitleResponse>, ApiError> {
    let key = ActionKey::new(AiFeature::AutoTitle);
    let assistant = state.assistant.clone();
    let title = tracked(&state, key, async move {
        assistant.auto_title(&req.content).await
    })
    .await?;
    Ok(Json(TitleResponse { title }))
}

#[derive(Debug, Deserialize)]
pub struct ExpandRequest {
    #[serde(default)]
    pub shorthand: String,
}

#[derive(Debug, Serialize)]
pub struct ExpandResponse {
    pub content: String,
}

pub async fn expand_shorthand(
    State(state): State<AppState>,
    Json(req): Json<ExpandRequest>,
) -> std::result::Result<Json<ExpandResponse>, ApiError> {
    let key = ActionKey::new(AiFeature::Generate);
    let assistant = state.assistant.clone();
    let content = tracked(&state, key, async move {
        assistant.expand_shorthand(&req.shorthand).await
    })
    .await?;
    Ok(Json(ExpandResponse { content }))
}

pub async fn ai_status(State(state): State<AppState>) -> Json<Vec<ActionReport>> {
    Json(state.tracker.snapshot())
}
