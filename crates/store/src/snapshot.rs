//! JSON snapshot persistence.
//!
//! Projects are saved and loaded wholesale, one file per project id. The
//! migration rule for snapshots predating the render log is carried by
//! `#[serde(default)]` on [`Project::render_log`]; loading never fails on
//! its absence.
//!
//! [`Project::render_log`]: crate::models::Project

use std::path::{Path, PathBuf};

use shotflow_core::types::ProjectId;

use crate::error::StoreError;
use crate::models::Project;

/// File path for a project's snapshot within `dir`.
pub fn snapshot_path(dir: &Path, project_id: ProjectId) -> PathBuf {
    dir.join(format!("{project_id}.json"))
}

/// Write a project snapshot, creating `dir` if needed.
pub async fn save_snapshot(dir: &Path, project: &Project) -> Result<PathBuf, StoreError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = snapshot_path(dir, project.id);
    let bytes = serde_json::to_vec_pretty(project)?;
    tokio::fs::write(&path, bytes).await?;
    tracing::info!(project_id = %project.id, path = %path.display(), "Project snapshot saved");
    Ok(path)
}

/// Load a project snapshot by id.
pub async fn load_snapshot(dir: &Path, project_id: ProjectId) -> Result<Project, StoreError> {
    let path = snapshot_path(dir, project_id);
    let bytes = tokio::fs::read(&path).await?;
    let project = serde_json::from_slice(&bytes)?;
    tracing::info!(project_id = %project_id, "Project snapshot loaded");
    Ok(project)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
