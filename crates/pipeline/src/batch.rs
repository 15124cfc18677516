//! Batch start-frame generation across a project.
//!
//! Shots are processed strictly sequentially; the pacer pauses before
//! every call after the first as rate-limit mitigation, not correctness.
//! Per-shot failures are logged and the run continues; authorization
//! failures abort the whole run immediately. Shots that completed before
//! an abort stay completed.

use std::sync::Arc;

use serde::Serialize;
use shotflow_core::batch::{progress_message, select_batch_targets, BatchMode, BatchShotOutcome};
use shotflow_core::camera::FrameRole;
use shotflow_core::types::{EntityId, ProjectId};
use shotflow_events::bus::{ProgressBus, ProgressEvent};
use shotflow_store::{ProjectStore, StoreError};

use crate::error::{PipelineError, PipelineResult};
use crate::keyframes::KeyframeService;
use crate::pacer::Pacer;

/// Runs batch start-frame generation.
pub struct BatchOrchestrator {
    store: Arc<ProjectStore>,
    keyframes: Arc<KeyframeService>,
    pacer: Arc<dyn Pacer>,
    bus: Arc<ProgressBus>,
}

/// Summary of one finished (or aborted-before-finish) batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub mode: BatchMode,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub shots: Vec<BatchShotReport>,
}

/// Outcome of one shot within a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchShotReport {
    pub shot_id: EntityId,
    pub outcome: BatchShotOutcome,
    /// Failure message for failed shots.
    pub message: Option<String>,
}

impl BatchOrchestrator {
    pub fn new(
        store: Arc<ProjectStore>,
        keyframes: Arc<KeyframeService>,
        pacer: Arc<dyn Pacer>,
        bus: Arc<ProgressBus>,
    ) -> Self {
        Self {
            store,
            keyframes,
            pacer,
            bus,
        }
    }

    /// Generate start keyframes for the shot subset selected by `mode`.
    ///
    /// Returns the per-shot report, or an error when the run aborted on
    /// an authorization-class failure (partial results are preserved in
    /// the store either way).
    pub async fn run(&self, project_id: ProjectId, mode: BatchMode) -> PipelineResult<BatchReport> {
        let (shot_ids, start_completed) = self
            .store
            .with_project(project_id, |project| {
                let ids: Vec<EntityId> = project.shots.iter().map(|s| s.id.clone()).collect();
                let completed: Vec<bool> = project
                    .shots
                    .iter()
                    .map(|s| s.frame_completed(FrameRole::Start))
                    .collect();
                (ids, completed)
            })
            .await?;

        let targets = select_batch_targets(mode, &start_completed);
        let total = targets.len();
        tracing::info!(
            project_id = %project_id,
            mode = mode.label(),
            total,
            "Batch start-frame generation started",
        );

        let mut report = BatchReport {
            mode,
            total,
            succeeded: 0,
            failed: 0,
            shots: Vec::with_capacity(total),
        };

        for (position, &shot_index) in targets.iter().enumerate() {
            self.pacer.pause(position).await;
            let shot_id = &shot_ids[shot_index];

            let (outcome, message) = match self
                .keyframes
                .generate(project_id, shot_id, FrameRole::Start)
                .await
            {
                Ok(_) => (BatchShotOutcome::Succeeded, None),
                // Transient per-shot failure: log and continue.
                Err(PipelineError::Generation { message }) => {
                    tracing::warn!(
                        project_id = %project_id,
                        shot_id,
                        error = %message,
                        "Batch shot failed, continuing",
                    );
                    (BatchShotOutcome::Failed, Some(message))
                }
                // A vanished shot or a concurrent in-flight call skips
                // this shot without stopping the run.
                Err(PipelineError::Core(err)) => {
                    tracing::warn!(project_id = %project_id, shot_id, error = %err, "Batch shot skipped");
                    (BatchShotOutcome::Skipped, Some(err.to_string()))
                }
                Err(PipelineError::Store(StoreError::ShotNotFound { .. })) => {
                    tracing::warn!(project_id = %project_id, shot_id, "Batch shot vanished, skipping");
                    (BatchShotOutcome::Skipped, None)
                }
                // Authorization-class failures abort the whole run.
                Err(abort) => {
                    tracing::error!(
                        project_id = %project_id,
                        shot_id,
                        error = %abort,
                        "Batch aborted",
                    );
                    return Err(abort);
                }
            };

            if outcome == BatchShotOutcome::Succeeded {
                report.succeeded += 1;
            } else {
                report.failed += 1;
            }

            let current = position + 1;
            let status_message = progress_message(current, total, shot_id, outcome);
            self.bus.publish(ProgressEvent::Batch {
                project_id,
                current,
                total,
                message: status_message.clone(),
            });
            tracing::info!(project_id = %project_id, "{status_message}");

            report.shots.push(BatchShotReport {
                shot_id: shot_id.clone(),
                outcome,
                message,
            });
        }

        tracing::info!(
            project_id = %project_id,
            succeeded = report.succeeded,
            failed = report.failed,
            "Batch start-frame generation finished",
        );
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
