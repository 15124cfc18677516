//! Project aggregate: the root entity owning all shots plus the
//! append-only render log.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shotflow_core::camera::FrameRole;
use shotflow_core::script::ScriptData;
use shotflow_core::status::GenStatus;
use shotflow_core::style::VisualStyle;
use shotflow_core::types::{ProjectId, Timestamp};
use shotflow_events::RenderEvent;

use super::shot::Shot;

/// The root aggregate. Owns its shots; shot order is narrative order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub language: String,
    pub visual_style: VisualStyle,
    #[serde(default)]
    pub shots: Vec<Shot>,
    #[serde(default)]
    pub script: Option<ScriptData>,
    /// Append-only audit log of generation attempts. Older snapshots
    /// predate this field and must load as an empty log.
    #[serde(default)]
    pub render_log: Vec<RenderEvent>,
    pub created_at: Timestamp,
}

impl Project {
    /// Create an empty project.
    pub fn new(
        title: impl Into<String>,
        language: impl Into<String>,
        visual_style: VisualStyle,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            title: title.into(),
            language: language.into(),
            visual_style,
            shots: Vec::new(),
            script: None,
            render_log: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Find a shot by id.
    pub fn shot(&self, shot_id: &str) -> Option<&Shot> {
        self.shots.iter().find(|s| s.id == shot_id)
    }

    /// Find a shot by id, mutably.
    pub fn shot_mut(&mut self, shot_id: &str) -> Option<&mut Shot> {
        self.shots.iter_mut().find(|s| s.id == shot_id)
    }

    /// Position of a shot in narrative order.
    pub fn shot_index(&self, shot_id: &str) -> Option<usize> {
        self.shots.iter().position(|s| s.id == shot_id)
    }

    /// Read-only status projection for UI progress displays.
    pub fn status_projection(&self) -> StatusProjection {
        let mut projection = StatusProjection {
            total_shots: self.shots.len(),
            ..Default::default()
        };
        for shot in &self.shots {
            if shot.frame_completed(FrameRole::Start) {
                projection.start_frames_completed += 1;
            }
            if shot.frame_completed(FrameRole::End) {
                projection.end_frames_completed += 1;
            }
            match shot.interval.as_ref().map(|i| i.status) {
                Some(GenStatus::Completed) => projection.videos_completed += 1,
                Some(GenStatus::Generating) => projection.videos_generating += 1,
                Some(GenStatus::Failed) => projection.videos_failed += 1,
                _ => {}
            }
        }
        projection
    }

    /// Lightweight listing view.
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id,
            title: self.title.clone(),
            shot_count: self.shots.len(),
            created_at: self.created_at,
        }
    }
}

/// Listing row for project indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub title: String,
    pub shot_count: usize,
    pub created_at: Timestamp,
}

/// Counts of shots by generation state, for progress indicators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusProjection {
    pub total_shots: usize,
    pub start_frames_completed: usize,
    pub end_frames_completed: usize,
    pub videos_completed: usize,
    pub videos_generating: usize,
    pub videos_failed: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use shotflow_core::camera::{CameraMovement, FrameRole};
    use shotflow_core::status::GenStatus;

    use crate::models::shot::{Interval, Keyframe};

    fn project_with_shots() -> Project {
        let mut project = Project::new("Harbor", "en", VisualStyle::Cinematic);
        project.shots = vec![
            Shot::new("shot-1", "sc-1", "A door opens", CameraMovement::Static),
            Shot::new("shot-2", "sc-1", "She steps out", CameraMovement::PanLeft),
        ];
        project
    }

    #[test]
    fn shot_lookup_by_id() {
        let project = project_with_shots();
        assert!(project.shot("shot-2").is_some());
        assert!(project.shot("shot-404").is_none());
        assert_eq!(project.shot_index("shot-2"), Some(1));
    }

    #[test]
    fn status_projection_counts_completed_frames() {
        let mut project = project_with_shots();
        let shot = project.shot_mut("shot-1").unwrap();
        shot.set_frame(
            FrameRole::Start,
            Keyframe::new_completed("shot-1", FrameRole::Start, "base", "img://1"),
        );
        let mut interval = Interval::new_pending("shot-1", "kf-1", None, "prompt");
        interval.status = GenStatus::Failed;
        shot.interval = Some(interval);

        let projection = project.status_projection();
        assert_eq!(projection.total_shots, 2);
        assert_eq!(projection.start_frames_completed, 1);
        assert_eq!(projection.end_frames_completed, 0);
        assert_eq!(projection.videos_failed, 1);
    }

    #[test]
    fn render_log_defaults_to_empty_on_old_snapshots() {
        // A snapshot written before the render log existed.
        let json = serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "title": "Legacy",
            "language": "en",
            "visual_style": "cinematic",
            "shots": [],
            "created_at": Utc::now(),
        });
        let project: Project = serde_json::from_value(json).unwrap();
        assert!(project.render_log.is_empty());
    }
}
