//! Note CRUD, draft validation, and related notes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gnotes_core::draft::SUBMIT_HINT;
use gnotes_core::{Note, NoteDraft, NoteMatch};

use crate::error::{ApiError, DELETE_CONFIRMATION};
use crate::handlers::views::TagQuery;
use crate::state::AppState;

pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    state.workspace.load().await?;
    Ok(Json(state.workspace.view(query.tag.as_deref()).await.notes))
}

pub async fn create_note(
    State(state): State<AppState>,
    Json(draft): Json<NoteDraft>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let note = state.workspace.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[derive(Debug, Serialize)]
pub struct IssueBody {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub issues: Vec<IssueBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
    pub can_auto_title: bool,
    pub can_expand: bool,
}

/// Validation state of a form without submitting it.
pub async fn validate_note(Json(draft): Json<NoteDraft>) -> Json<ValidationResponse> {
    let issues: Vec<IssueBody> = draft
        .validate()
        .into_iter()
        .map(|issue| IssueBody {
            field: issue.field(),
            message: issue.message(),
        })
        .collect();
    let valid = issues.is_empty();

    Json(ValidationResponse {
        valid,
        issues,
        hint: (!valid).then_some(SUBMIT_HINT),
        can_auto_title: draft.can_auto_title(),
        can_expand: draft.can_expand(),
    })
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.store().get(id).await?))
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<NoteDraft>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.workspace.update(id, &draft).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Delete a note. Requires `?confirm=true`.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    if !query.confirm {
        return Err(ApiError::Conflict(DELETE_CONFIRMATION.to_string()));
    }
    state.workspace.delete(id).await?;
    state.tracker.forget_note(id);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct RelatedResponse {
    pub note_id: Uuid,
    pub results: Vec<NoteMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<&'static str>,
}

pub async fn related_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RelatedResponse>, ApiError> {
    let results = state.search.related(id).await?;
    Ok(Json(RelatedResponse {
        note_id: id,
        empty_state: results.is_empty().then_some("No related notes found"),
        results,
    }))
}
