//! Generation lifecycle status shared by keyframes, intervals, and
//! nine-grid decompositions.

use serde::{Deserialize, Serialize};

/// Status of a single generation unit.
///
/// Absence of the unit itself (a shot that never had a keyframe) is a
/// separate condition from `Failed` and is modeled with `Option` on the
/// owning entity, never with an extra variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenStatus {
    /// Unit created but no generation attempt issued yet.
    Pending,
    /// A generation call is in flight.
    Generating,
    /// Generation finished and a result is attached.
    Completed,
    /// The last attempt failed; the unit can be retried in place.
    Failed,
}

impl GenStatus {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Generating => "Generating",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// Whether a result is attached and usable downstream.
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_non_empty() {
        for s in [
            GenStatus::Pending,
            GenStatus::Generating,
            GenStatus::Completed,
            GenStatus::Failed,
        ] {
            assert!(!s.label().is_empty());
        }
    }

    #[test]
    fn only_completed_counts_as_completed() {
        assert!(GenStatus::Completed.is_completed());
        assert!(!GenStatus::Pending.is_completed());
        assert!(!GenStatus::Generating.is_completed());
        assert!(!GenStatus::Failed.is_completed());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&GenStatus::Generating).unwrap();
        assert_eq!(json, "\"generating\"");
    }
}
