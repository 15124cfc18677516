//! Handlers for project creation, retrieval, progress projection, and
//! snapshot persistence.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use shotflow_core::camera::CameraMovement;
use shotflow_core::prompt::VideoModel;
use shotflow_core::script::ScriptData;
use shotflow_core::style::VisualStyle;
use shotflow_core::types::{EntityId, ProjectId};
use shotflow_store::models::{Project, Shot};
use shotflow_store::snapshot;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for creating a new project with its shot list.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Language tag; defaults to `"en"`.
    #[serde(default = "default_language")]
    pub language: String,
    /// Free-form style keyword.
    #[serde(default)]
    pub visual_style: String,
    #[serde(default)]
    pub script: Option<ScriptData>,
    #[serde(default)]
    pub shots: Vec<CreateShotRequest>,
}

fn default_language() -> String {
    "en".to_string()
}

/// One shot within a project creation request.
#[derive(Debug, Deserialize)]
pub struct CreateShotRequest {
    /// Stable id; generated from the shot's position when omitted.
    #[serde(default)]
    pub id: Option<EntityId>,
    pub scene_id: EntityId,
    pub action_summary: String,
    #[serde(default)]
    pub dialogue: Option<String>,
    #[serde(default)]
    pub camera_movement: Option<String>,
    #[serde(default)]
    pub character_ids: Vec<EntityId>,
    #[serde(default)]
    pub variation_selections: HashMap<EntityId, EntityId>,
    #[serde(default)]
    pub video_model: Option<String>,
}

/// Response payload for snapshot saves.
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub project_id: ProjectId,
    pub path: String,
}

// ---------------------------------------------------------------------------
// POST /projects
// ---------------------------------------------------------------------------

/// Create a project and its shot sequence.
pub async fn create_project(
    State(state): State<AppState>,
    Json(body): Json<CreateProjectRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let style = VisualStyle::parse(&body.visual_style);
    let mut project = Project::new(body.title, body.language, style);
    project.script = body.script;
    project.shots = body
        .shots
        .into_iter()
        .enumerate()
        .map(|(index, req)| {
            let movement = req
                .camera_movement
                .as_deref()
                .map(CameraMovement::parse)
                .unwrap_or(CameraMovement::Static);
            let mut shot = Shot::new(
                req.id.unwrap_or_else(|| format!("shot-{}", index + 1)),
                req.scene_id,
                req.action_summary,
                movement,
            );
            shot.dialogue = req.dialogue;
            shot.character_ids = req.character_ids;
            shot.variation_selections = req.variation_selections;
            shot.video_model = req
                .video_model
                .as_deref()
                .map(VideoModel::parse)
                .unwrap_or_default();
            shot
        })
        .collect();

    tracing::info!(
        project_id = %project.id,
        shot_count = project.shots.len(),
        "Project created",
    );

    let created = project.clone();
    state.store.insert(project).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /projects
// ---------------------------------------------------------------------------

/// List project summaries, newest first.
pub async fn list_projects(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summaries = state.store.list().await;
    Ok(Json(DataResponse { data: summaries }))
}

// ---------------------------------------------------------------------------
// GET /projects/{project_id}
// ---------------------------------------------------------------------------

/// Fetch a full project by id.
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> AppResult<impl IntoResponse> {
    let project = state.store.get(project_id).await?;
    Ok(Json(DataResponse { data: project }))
}

// ---------------------------------------------------------------------------
// GET /projects/{project_id}/progress
// ---------------------------------------------------------------------------

/// Read-only status projection for progress indicators.
pub async fn get_progress(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> AppResult<impl IntoResponse> {
    let projection = state
        .store
        .with_project(project_id, |project| project.status_projection())
        .await?;
    Ok(Json(DataResponse { data: projection }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/snapshot
// ---------------------------------------------------------------------------

/// Persist the project wholesale as a JSON snapshot.
pub async fn save_snapshot(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> AppResult<impl IntoResponse> {
    let project = state.store.get(project_id).await?;
    let path = snapshot::save_snapshot(&state.config.snapshot_dir, &project).await?;
    Ok(Json(DataResponse {
        data: SnapshotResponse {
            project_id,
            path: path.display().to_string(),
        },
    }))
}

// ---------------------------------------------------------------------------
// PUT /projects/{project_id}/snapshot
// ---------------------------------------------------------------------------

/// Load a project snapshot by id, replacing any in-memory copy.
pub async fn load_snapshot(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> AppResult<impl IntoResponse> {
    let project = snapshot::load_snapshot(&state.config.snapshot_dir, project_id).await?;
    let loaded = project.clone();
    state.store.insert(project).await;
    Ok(Json(DataResponse { data: loaded }))
}
