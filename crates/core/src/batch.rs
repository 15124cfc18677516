//! Batch start-frame generation: mode vocabulary, subset selection, and
//! progress message formatting.
//!
//! The orchestration loop itself lives in `shotflow-pipeline`; this
//! module keeps the decisions pure and unit-testable.

use serde::{Deserialize, Serialize};

/// Which shots a batch run touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// Only shots lacking a completed start keyframe.
    FillMissing,
    /// Every shot, regenerating completed frames too.
    RegenerateAll,
}

impl BatchMode {
    /// Human-readable label for progress messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::FillMissing => "fill missing",
            Self::RegenerateAll => "regenerate all",
        }
    }
}

/// Select the indices of shots a batch run will process, in shot order.
///
/// `start_completed[i]` reports whether shot `i` already has a completed
/// start keyframe. FillMissing never selects a shot whose start frame is
/// completed.
pub fn select_batch_targets(mode: BatchMode, start_completed: &[bool]) -> Vec<usize> {
    match mode {
        BatchMode::RegenerateAll => (0..start_completed.len()).collect(),
        BatchMode::FillMissing => start_completed
            .iter()
            .enumerate()
            .filter(|(_, completed)| !**completed)
            .map(|(i, _)| i)
            .collect(),
    }
}

/// Outcome of one shot within a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchShotOutcome {
    Succeeded,
    Failed,
    Skipped,
}

/// Format the human status message reported after each processed shot.
pub fn progress_message(current: usize, total: usize, shot_id: &str, outcome: BatchShotOutcome) -> String {
    let verb = match outcome {
        BatchShotOutcome::Succeeded => "generated",
        BatchShotOutcome::Failed => "failed",
        BatchShotOutcome::Skipped => "skipped",
    };
    format!("Shot {current}/{total} ({shot_id}): start frame {verb}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
