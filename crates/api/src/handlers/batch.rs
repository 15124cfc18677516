//! Handler for rate-paced batch start-frame generation.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use shotflow_core::batch::BatchMode;
use shotflow_core::types::ProjectId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for a batch run.
#[derive(Debug, Deserialize)]
pub struct BatchGenerateRequest {
    pub mode: BatchMode,
}

/// POST /projects/{project_id}/batch-generate
///
/// Processes the selected shots strictly sequentially and returns the
/// per-shot report. Live progress is published on the progress bus after
/// every shot.
pub async fn batch_generate(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<BatchGenerateRequest>,
) -> AppResult<impl IntoResponse> {
    let report = state.batch.run(project_id, body.mode).await?;
    Ok(Json(DataResponse { data: report }))
}
