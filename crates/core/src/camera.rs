//! Camera movement vocabulary and the movement x frame-role composition
//! guide table.
//!
//! Movement strings arriving from the script collaborator are folded into
//! a closed enum at the boundary; unrecognized values land in
//! [`CameraMovement::Other`] so the guide lookup stays total.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FrameRole
// ---------------------------------------------------------------------------

/// Which end of a shot a keyframe anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameRole {
    Start,
    End,
}

impl FrameRole {
    /// Stable lowercase token used in derived ids and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl std::fmt::Display for FrameRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CameraMovement
// ---------------------------------------------------------------------------

/// Closed camera-movement vocabulary.
///
/// Parsing is case-insensitive and tolerant of space/hyphen separators
/// (`"Pan Left"`, `"pan-left"`, and `"PAN_LEFT"` all fold to
/// [`CameraMovement::PanLeft`]). Anything else is preserved verbatim in
/// [`CameraMovement::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CameraMovement {
    Static,
    PanLeft,
    PanRight,
    TiltUp,
    TiltDown,
    ZoomIn,
    ZoomOut,
    DollyIn,
    DollyOut,
    Tracking,
    Handheld,
    CraneUp,
    Other(String),
}

impl CameraMovement {
    /// Fold a free-form movement string into the closed vocabulary.
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .replace([' ', '-'], "_");
        match normalized.as_str() {
            "static" | "fixed" | "locked" => Self::Static,
            "pan_left" => Self::PanLeft,
            "pan_right" => Self::PanRight,
            "tilt_up" => Self::TiltUp,
            "tilt_down" => Self::TiltDown,
            "zoom_in" => Self::ZoomIn,
            "zoom_out" => Self::ZoomOut,
            "dolly_in" | "push_in" => Self::DollyIn,
            "dolly_out" | "pull_out" => Self::DollyOut,
            "tracking" | "follow" => Self::Tracking,
            "handheld" => Self::Handheld,
            "crane_up" => Self::CraneUp,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Display label used in prompts and progress messages.
    pub fn label(&self) -> &str {
        match self {
            Self::Static => "static shot",
            Self::PanLeft => "pan left",
            Self::PanRight => "pan right",
            Self::TiltUp => "tilt up",
            Self::TiltDown => "tilt down",
            Self::ZoomIn => "zoom in",
            Self::ZoomOut => "zoom out",
            Self::DollyIn => "dolly in",
            Self::DollyOut => "dolly out",
            Self::Tracking => "tracking shot",
            Self::Handheld => "handheld",
            Self::CraneUp => "crane up",
            Self::Other(raw) => raw,
        }
    }

    /// Composition instruction for one end of the movement.
    ///
    /// Total: every movement, including [`CameraMovement::Other`], maps to
    /// a non-empty instruction for both roles. Start and end instructions
    /// describe complementary compositions so the generated keyframes can
    /// bracket the motion.
    pub fn guide(&self, role: FrameRole) -> &'static str {
        use FrameRole::{End, Start};
        match (self, role) {
            (Self::Static, Start) => {
                "balanced composition, subject anchored at a fixed position in frame"
            }
            (Self::Static, End) => {
                "identical framing held, subject in the same position with only action progressed"
            }
            (Self::PanLeft, Start) => {
                "subject placed on the right third of the frame, open negative space on the left"
            }
            (Self::PanLeft, End) => {
                "subject now on the left third of the frame, the space it crossed behind it"
            }
            (Self::PanRight, Start) => {
                "subject placed on the left third of the frame, open negative space on the right"
            }
            (Self::PanRight, End) => {
                "subject now on the right third of the frame, the space it crossed behind it"
            }
            (Self::TiltUp, Start) => {
                "frame weighted toward the ground level, subject low with headroom above"
            }
            (Self::TiltUp, End) => {
                "frame raised upward, upper surroundings dominant, subject near the bottom edge"
            }
            (Self::TiltDown, Start) => {
                "frame weighted toward the upper surroundings, subject high in frame"
            }
            (Self::TiltDown, End) => {
                "frame lowered to ground level, subject near the top edge, floor detail dominant"
            }
            (Self::ZoomIn, Start) => {
                "wide framing, subject small with full environmental context around it"
            }
            (Self::ZoomIn, End) => {
                "tight framing, subject filling the frame, environment cropped away"
            }
            (Self::ZoomOut, Start) => {
                "tight framing, subject filling the frame, little environment visible"
            }
            (Self::ZoomOut, End) => {
                "wide framing, subject small, full environment revealed around it"
            }
            (Self::DollyIn, Start) => {
                "camera distant, subject in the mid-ground with foreground elements framing it"
            }
            (Self::DollyIn, End) => {
                "camera close to the subject, background compressed and softly defocused"
            }
            (Self::DollyOut, Start) => {
                "camera close to the subject, background compressed and softly defocused"
            }
            (Self::DollyOut, End) => {
                "camera pulled back, subject in the mid-ground, foreground elements re-entering frame"
            }
            (Self::Tracking, Start) => {
                "subject in profile at frame center, its path of travel visible ahead"
            }
            (Self::Tracking, End) => {
                "subject still centered in profile, background displaced opposite the travel direction"
            }
            (Self::Handheld, Start) => {
                "slightly off-axis framing with natural imperfection, subject prominent"
            }
            (Self::Handheld, End) => {
                "framing drifted a few degrees, same subject emphasis, organic instability"
            }
            (Self::CraneUp, Start) => {
                "eye-level framing of the subject within its immediate surroundings"
            }
            (Self::CraneUp, End) => {
                "elevated high angle looking down, subject below, spatial layout revealed"
            }
            (Self::Other(_), Start) => {
                "clear establishing composition introducing the subject and setting"
            }
            (Self::Other(_), End) => {
                "composition resolved toward the closing pose of the shot's action"
            }
        }
    }
}

impl From<String> for CameraMovement {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<CameraMovement> for String {
    fn from(movement: CameraMovement) -> Self {
        match movement {
            CameraMovement::Other(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
