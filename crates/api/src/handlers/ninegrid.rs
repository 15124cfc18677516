//! Handlers for the nine-grid storyboard decomposition workflow.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use shotflow_core::types::{EntityId, ProjectId};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for panel selection.
#[derive(Debug, Deserialize)]
pub struct SelectPanelRequest {
    /// Row-major panel index, `0..=8`.
    pub panel_index: usize,
}

/// POST /projects/{project_id}/shots/{shot_id}/ninegrid/plan
///
/// Phase 1: plan exactly nine camera-angle panels. A wrong panel count
/// fails the decomposition without issuing the render call.
pub async fn plan_panels(
    State(state): State<AppState>,
    Path((project_id, shot_id)): Path<(ProjectId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    let grid = state.ninegrid.plan_panels(project_id, &shot_id).await?;
    Ok(Json(DataResponse { data: grid }))
}

/// POST /projects/{project_id}/shots/{shot_id}/ninegrid/render
///
/// Phase 2: render the planned panels as one 3x3 composite image.
pub async fn render_grid(
    State(state): State<AppState>,
    Path((project_id, shot_id)): Path<(ProjectId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    let grid = state.ninegrid.render_grid(project_id, &shot_id).await?;
    Ok(Json(DataResponse { data: grid }))
}

/// POST /projects/{project_id}/shots/{shot_id}/ninegrid/select
///
/// Crops the selected panel out of the composite and adopts it as the
/// shot's start keyframe.
pub async fn select_panel(
    State(state): State<AppState>,
    Path((project_id, shot_id)): Path<(ProjectId, EntityId)>,
    Json(body): Json<SelectPanelRequest>,
) -> AppResult<impl IntoResponse> {
    let frame = state
        .ninegrid
        .select_panel(project_id, &shot_id, body.panel_index)
        .await?;
    Ok(Json(DataResponse { data: frame }))
}

/// POST /projects/{project_id}/shots/{shot_id}/ninegrid/use-whole
///
/// Adopts the full composite as the start keyframe, skipping cropping.
pub async fn use_whole_image(
    State(state): State<AppState>,
    Path((project_id, shot_id)): Path<(ProjectId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    let frame = state.ninegrid.use_whole_image(project_id, &shot_id).await?;
    Ok(Json(DataResponse { data: frame }))
}

/// POST /projects/{project_id}/shots/{shot_id}/ninegrid/regenerate
///
/// Discards the current decomposition and restarts planning.
pub async fn regenerate_grid(
    State(state): State<AppState>,
    Path((project_id, shot_id)): Path<(ProjectId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    let grid = state.ninegrid.regenerate(project_id, &shot_id).await?;
    Ok(Json(DataResponse { data: grid }))
}
