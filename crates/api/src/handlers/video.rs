//! Handler for per-shot video generation.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use shotflow_core::types::{EntityId, ProjectId};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /projects/{project_id}/shots/{shot_id}/video/generate
///
/// Requires a completed start keyframe; a completed end keyframe on the
/// same shot switches the request to dual-image transition mode.
pub async fn generate_video(
    State(state): State<AppState>,
    Path((project_id, shot_id)): Path<(ProjectId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    let interval = state.video.generate(project_id, &shot_id).await?;
    Ok(Json(DataResponse { data: interval }))
}
