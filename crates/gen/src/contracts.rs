//! Request and response shapes for the generation services.

use serde::{Deserialize, Serialize};
use shotflow_core::prompt::VideoModel;
use shotflow_core::types::ImageRef;

/// Aspect ratio requested for every keyframe and composite image.
pub const KEYFRAME_ASPECT_RATIO: &str = "16:9";

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// One image-generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    /// Conditioning images in resolver order: scene anchor first, then
    /// character identities. Order is meaningful to the model.
    pub reference_images: Vec<ImageRef>,
    pub aspect_ratio: String,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>, reference_images: Vec<ImageRef>) -> Self {
        Self {
            prompt: prompt.into(),
            reference_images,
            aspect_ratio: KEYFRAME_ASPECT_RATIO.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

/// Whether a video call animates from one image or bridges two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// Animate from the start image alone.
    SingleImage,
    /// Transition from the start image to the end image.
    DualImage,
}

/// One video-generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRequest {
    pub prompt: String,
    pub start_image: ImageRef,
    /// Present only in dual-image transition mode.
    pub end_image: Option<ImageRef>,
    pub model: VideoModel,
    pub duration_secs: f64,
    pub motion_strength: f64,
}

impl VideoRequest {
    /// Mode is derived from end-image presence on this request alone,
    /// never from any other shot's data.
    pub fn mode(&self) -> TransitionMode {
        if self.end_image.is_some() {
            TransitionMode::DualImage
        } else {
            TransitionMode::SingleImage
        }
    }
}

// ---------------------------------------------------------------------------
// Panel planning
// ---------------------------------------------------------------------------

/// One structured-output planning call for a nine-grid decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelPlanRequest {
    /// The shot's action summary.
    pub action_summary: String,
    /// Scene context line (location, time, atmosphere).
    pub scene_context: String,
    /// Visual style phrase layered into each panel description.
    pub style_phrase: String,
}

/// One planned panel, as returned by the planning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedPanel {
    /// Row-major position, `0..=8`.
    pub index: u8,
    pub shot_size: String,
    pub camera_angle: String,
    /// English scene description for rendering.
    pub description: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_mode_follows_end_image_presence() {
        let mut request = VideoRequest {
            prompt: "p".to_string(),
            start_image: "img://start".to_string(),
            end_image: None,
            model: VideoModel::Veo,
            duration_secs: 5.0,
            motion_strength: 0.5,
        };
        assert_eq!(request.mode(), TransitionMode::SingleImage);

        request.end_image = Some("img://end".to_string());
        assert_eq!(request.mode(), TransitionMode::DualImage);
    }

    #[test]
    fn image_request_defaults_to_widescreen() {
        let request = ImageRequest::new("p", vec![]);
        assert_eq!(request.aspect_ratio, KEYFRAME_ASPECT_RATIO);
    }
}
