//! Shot aggregate: the narrative camera unit with its keyframes, video
//! interval, and optional nine-grid decomposition.
//!
//! Keyframes, intervals, and nine-grids are created lazily on first
//! generation or upload, identified by a stable id derived from
//! shot + kind + creation time, and mutated in place thereafter. Their
//! absence (`None`) is distinct from a `Failed` status.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shotflow_core::camera::{CameraMovement, FrameRole};
use shotflow_core::prompt::VideoModel;
use shotflow_core::status::GenStatus;
use shotflow_core::types::{EntityId, ImageRef, Timestamp};

// ---------------------------------------------------------------------------
// Shot
// ---------------------------------------------------------------------------

/// One narrative camera unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub id: EntityId,
    /// Reference into the script's scenes; not ownership.
    pub scene_id: EntityId,
    pub action_summary: String,
    #[serde(default)]
    pub dialogue: Option<String>,
    pub camera_movement: CameraMovement,
    /// Characters in this shot, in narrative order.
    #[serde(default)]
    pub character_ids: Vec<EntityId>,
    /// Per-character selected variation, keyed by character id.
    #[serde(default)]
    pub variation_selections: HashMap<EntityId, EntityId>,
    #[serde(default)]
    pub start_frame: Option<Keyframe>,
    #[serde(default)]
    pub end_frame: Option<Keyframe>,
    #[serde(default)]
    pub interval: Option<Interval>,
    #[serde(default)]
    pub video_model: VideoModel,
    #[serde(default)]
    pub nine_grid: Option<NineGridData>,
}

impl Shot {
    /// Create a shot with no generated units yet.
    pub fn new(
        id: impl Into<EntityId>,
        scene_id: impl Into<EntityId>,
        action_summary: impl Into<String>,
        camera_movement: CameraMovement,
    ) -> Self {
        Self {
            id: id.into(),
            scene_id: scene_id.into(),
            action_summary: action_summary.into(),
            dialogue: None,
            camera_movement,
            character_ids: Vec::new(),
            variation_selections: HashMap::new(),
            start_frame: None,
            end_frame: None,
            interval: None,
            video_model: VideoModel::default(),
            nine_grid: None,
        }
    }

    /// The keyframe filling `role`, if it exists.
    pub fn frame(&self, role: FrameRole) -> Option<&Keyframe> {
        match role {
            FrameRole::Start => self.start_frame.as_ref(),
            FrameRole::End => self.end_frame.as_ref(),
        }
    }

    /// Mutable access to the keyframe filling `role`.
    pub fn frame_mut(&mut self, role: FrameRole) -> Option<&mut Keyframe> {
        match role {
            FrameRole::Start => self.start_frame.as_mut(),
            FrameRole::End => self.end_frame.as_mut(),
        }
    }

    /// Install or replace the keyframe filling `role`.
    pub fn set_frame(&mut self, role: FrameRole, keyframe: Keyframe) {
        match role {
            FrameRole::Start => self.start_frame = Some(keyframe),
            FrameRole::End => self.end_frame = Some(keyframe),
        }
    }

    /// Whether the keyframe filling `role` is completed with an image.
    pub fn frame_completed(&self, role: FrameRole) -> bool {
        self.frame(role).is_some_and(Keyframe::is_completed)
    }
}

// ---------------------------------------------------------------------------
// Keyframe
// ---------------------------------------------------------------------------

/// A still image anchoring one end of a shot's video.
///
/// Invariant: `image_url` is `Some` iff `status == Completed` (manual
/// upload always sets `Completed`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyframe {
    pub id: EntityId,
    pub role: FrameRole,
    /// The prompt actually sent to generation; user-editable.
    pub visual_prompt: String,
    #[serde(default)]
    pub image_url: Option<ImageRef>,
    pub status: GenStatus,
    pub created_at: Timestamp,
}

impl Keyframe {
    /// Create a pending keyframe with a stable derived id.
    pub fn new_pending(shot_id: &str, role: FrameRole, visual_prompt: impl Into<String>) -> Self {
        let created_at = Utc::now();
        Self {
            id: format!("kf-{shot_id}-{role}-{}", created_at.timestamp_micros()),
            role,
            visual_prompt: visual_prompt.into(),
            image_url: None,
            status: GenStatus::Pending,
            created_at,
        }
    }

    /// Create a completed keyframe directly (manual upload, continuity copy,
    /// nine-grid adoption).
    pub fn new_completed(
        shot_id: &str,
        role: FrameRole,
        visual_prompt: impl Into<String>,
        image_url: impl Into<ImageRef>,
    ) -> Self {
        let mut frame = Self::new_pending(shot_id, role, visual_prompt);
        frame.status = GenStatus::Completed;
        frame.image_url = Some(image_url.into());
        frame
    }

    /// Whether the frame is completed with an image attached.
    pub fn is_completed(&self) -> bool {
        self.status.is_completed() && self.image_url.is_some()
    }
}

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// Default clip duration in seconds.
pub const DEFAULT_INTERVAL_DURATION_SECS: f64 = 5.0;

/// Default motion strength in `[0, 1]`.
pub const DEFAULT_MOTION_STRENGTH: f64 = 0.5;

/// The video unit bridging a shot's keyframes.
///
/// Invariant: generation requires the referenced start keyframe to be
/// completed; `end_frame_id` is `Some` only in dual-image transition mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interval {
    pub id: EntityId,
    pub start_frame_id: EntityId,
    #[serde(default)]
    pub end_frame_id: Option<EntityId>,
    pub duration_secs: f64,
    pub motion_strength: f64,
    pub video_prompt: String,
    #[serde(default)]
    pub video_url: Option<String>,
    pub status: GenStatus,
    pub created_at: Timestamp,
}

impl Interval {
    /// Create a pending interval with a stable derived id.
    pub fn new_pending(
        shot_id: &str,
        start_frame_id: impl Into<EntityId>,
        end_frame_id: Option<EntityId>,
        video_prompt: impl Into<String>,
    ) -> Self {
        let created_at = Utc::now();
        Self {
            id: format!("iv-{shot_id}-{}", created_at.timestamp_micros()),
            start_frame_id: start_frame_id.into(),
            end_frame_id,
            duration_secs: DEFAULT_INTERVAL_DURATION_SECS,
            motion_strength: DEFAULT_MOTION_STRENGTH,
            video_prompt: video_prompt.into(),
            video_url: None,
            status: GenStatus::Pending,
            created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Nine-grid
// ---------------------------------------------------------------------------

/// A 3x3 storyboard decomposition of one shot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NineGridData {
    pub id: EntityId,
    pub status: GenStatus,
    /// The composite 3x3 image once rendered.
    #[serde(default)]
    pub image_url: Option<ImageRef>,
    /// Exactly nine panels once planning has completed.
    #[serde(default)]
    pub panels: Vec<GridPanel>,
    pub created_at: Timestamp,
}

impl NineGridData {
    /// Create a pending decomposition with a stable derived id.
    pub fn new_pending(shot_id: &str) -> Self {
        let created_at = Utc::now();
        Self {
            id: format!("ng-{shot_id}-{}", created_at.timestamp_micros()),
            status: GenStatus::Pending,
            image_url: None,
            panels: Vec::new(),
            created_at,
        }
    }
}

/// One planned camera-angle panel within the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridPanel {
    /// Row-major position, `0..=8`.
    pub index: u8,
    pub shot_size: String,
    pub camera_angle: String,
    /// English scene description used to render the panel.
    pub description: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
