//! Handlers for keyframe generation, manual upload, and prompt editing.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use shotflow_core::camera::FrameRole;
use shotflow_core::types::{EntityId, ProjectId};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for editing a keyframe's prompt.
#[derive(Debug, Deserialize, Validate)]
pub struct EditPromptRequest {
    #[validate(length(min = 1, max = 10_000))]
    pub prompt: String,
}

/// POST /projects/{project_id}/shots/{shot_id}/keyframes/{role}/generate
///
/// Starts (or restarts) generation for one keyframe. The frame is
/// `generating` from the moment this handler commits, before the image
/// call resolves.
pub async fn generate_keyframe(
    State(state): State<AppState>,
    Path((project_id, shot_id, role)): Path<(ProjectId, EntityId, FrameRole)>,
) -> AppResult<impl IntoResponse> {
    let frame = state.keyframes.generate(project_id, &shot_id, role).await?;
    Ok(Json(DataResponse { data: frame }))
}

/// POST /projects/{project_id}/shots/{shot_id}/keyframes/{role}/upload
///
/// Manually uploads a keyframe image (raw body bytes). Non-image
/// payloads are rejected without touching shot state.
pub async fn upload_keyframe(
    State(state): State<AppState>,
    Path((project_id, shot_id, role)): Path<(ProjectId, EntityId, FrameRole)>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let frame = state
        .keyframes
        .upload(project_id, &shot_id, role, &body)
        .await?;
    Ok(Json(DataResponse { data: frame }))
}

/// PATCH /projects/{project_id}/shots/{shot_id}/keyframes/{role}/prompt
///
/// Pure data mutation: no status change, no generation call.
pub async fn edit_prompt(
    State(state): State<AppState>,
    Path((project_id, shot_id, role)): Path<(ProjectId, EntityId, FrameRole)>,
    Json(body): Json<EditPromptRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let frame = state
        .keyframes
        .edit_prompt(project_id, &shot_id, role, body.prompt)
        .await?;
    Ok(Json(DataResponse { data: frame }))
}
