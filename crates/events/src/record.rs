//! Append-only render-event records.
//!
//! One record is appended to the owning project's log for every keyframe,
//! video, and nine-grid attempt, success or failure. The log is an
//! observability side effect of generation, never control flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shotflow_core::types::EntityId;

/// What kind of generation unit an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    StartFrame,
    EndFrame,
    Video,
    NineGridPlan,
    NineGridImage,
}

/// How the attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderOutcome {
    Succeeded,
    Failed,
}

/// One generation attempt, as recorded in the project's render log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderEvent {
    pub shot_id: EntityId,
    pub kind: RenderKind,
    pub outcome: RenderOutcome,
    /// Failure detail; `None` on success.
    #[serde(default)]
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl RenderEvent {
    /// Record a successful attempt.
    pub fn succeeded(shot_id: impl Into<EntityId>, kind: RenderKind) -> Self {
        Self {
            shot_id: shot_id.into(),
            kind,
            outcome: RenderOutcome::Succeeded,
            detail: None,
            timestamp: Utc::now(),
        }
    }

    /// Record a failed attempt with its failure detail.
    pub fn failed(shot_id: impl Into<EntityId>, kind: RenderKind, detail: impl Into<String>) -> Self {
        Self {
            shot_id: shot_id.into(),
            kind,
            outcome: RenderOutcome::Failed,
            detail: Some(detail.into()),
            timestamp: Utc::now(),
        }
    }
}
