//! Handler for explicit continuity linking between adjacent shots.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use shotflow_core::types::{EntityId, ProjectId};
use shotflow_pipeline::continuity;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /projects/{project_id}/shots/{shot_id}/copy-previous-end
///
/// Copies the previous shot's completed end keyframe (image and prompt)
/// into this shot's start keyframe. User-invoked only; no implicit
/// copying ever happens.
pub async fn copy_previous_end(
    State(state): State<AppState>,
    Path((project_id, shot_id)): Path<(ProjectId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    let frame =
        continuity::copy_previous_end_frame(&state.store, project_id, &shot_id).await?;
    Ok(Json(DataResponse { data: frame }))
}
