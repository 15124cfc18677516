//! Layered prompt assembly for keyframe and video generation.
//!
//! A keyframe prompt is assembled in a fixed order: base narrative text,
//! optional art-direction block, visual-style phrase, camera-movement
//! line, and a trailing technical-quality block. Each layer after the
//! base starts with a fixed section marker so the base narrative can be
//! recovered from an already-assembled prompt; regeneration re-layers
//! from the recovered base instead of stacking layers onto layers.

use serde::{Deserialize, Serialize};

use crate::camera::{CameraMovement, FrameRole};
use crate::script::ArtDirection;
use crate::style::VisualStyle;

// ---------------------------------------------------------------------------
// Section markers and fixed blocks
// ---------------------------------------------------------------------------

/// Marker opening the art-direction section.
pub const ART_DIRECTION_MARKER: &str = "\n\nArt direction: ";

/// Marker opening the visual-style section. Base-prompt extraction
/// truncates at the first marker occurrence.
pub const STYLE_MARKER: &str = "\n\nVisual style: ";

/// Marker opening the camera-composition section.
pub const CAMERA_MARKER: &str = "\n\nCamera: ";

/// Fixed trailing block of technical and quality requirements.
pub const TECH_BLOCK: &str = "\n\nTechnical requirements: 16:9 aspect ratio, high resolution, \
    coherent scene lighting, natural depth of field, no text, no watermarks, no borders.";

/// Language tag that selects the default-language video template variant.
pub const DEFAULT_LANGUAGE: &str = "en";

// ---------------------------------------------------------------------------
// Keyframe prompts
// ---------------------------------------------------------------------------

/// Assemble the full prompt for one keyframe.
///
/// `base` must be un-layered narrative text; callers regenerating an
/// existing keyframe recover it with [`extract_base_prompt`] first.
pub fn build_keyframe_prompt(
    base: &str,
    art_direction: Option<&ArtDirection>,
    style: &VisualStyle,
    movement: &CameraMovement,
    role: FrameRole,
) -> String {
    let mut prompt = String::with_capacity(base.len() + 512);
    prompt.push_str(base.trim());

    if let Some(art) = art_direction {
        prompt.push_str(ART_DIRECTION_MARKER);
        prompt.push_str(&render_art_direction(art));
    }

    prompt.push_str(STYLE_MARKER);
    prompt.push_str(style.phrase());

    prompt.push_str(CAMERA_MARKER);
    prompt.push_str(movement.label());
    prompt.push_str(". ");
    prompt.push_str(movement.guide(role));
    prompt.push('.');

    prompt.push_str(TECH_BLOCK);
    prompt
}

/// Recover the base narrative from a previously assembled prompt.
///
/// Truncates before the first occurrence of any section marker; a prompt
/// that was never assembled (no markers) is returned whole. Required for
/// idempotent re-layering across repeated regenerations.
pub fn extract_base_prompt(assembled: &str) -> &str {
    let cut = [ART_DIRECTION_MARKER, STYLE_MARKER, CAMERA_MARKER]
        .iter()
        .filter_map(|marker| assembled.find(marker))
        .min();
    match cut {
        Some(idx) => assembled[..idx].trim_end(),
        None => assembled.trim_end(),
    }
}

/// Render the art-direction brief as one prompt section.
///
/// The consistency anchor leads; individual descriptors follow as short
/// labelled clauses.
fn render_art_direction(art: &ArtDirection) -> String {
    format!(
        "{} Palette: {}. Character design: {}. Lighting: {}. Texture: {}. Mood: {}.",
        art.consistency_anchor.trim(),
        art.color_palette.trim(),
        art.character_design.trim(),
        art.lighting.trim(),
        art.texture.trim(),
        art.mood_keywords.trim(),
    )
}

// ---------------------------------------------------------------------------
// Video prompts
// ---------------------------------------------------------------------------

/// Downstream video generation service.
///
/// The two services expect different instruction framing, so each model
/// selects its own template family. Unrecognized identifiers fall back to
/// the Veo family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoModel {
    /// Expects explicit start-frame to end-frame transition instructions.
    Veo,
    /// Expects action and movement appended to a short language directive.
    Kling,
}

impl VideoModel {
    /// Fold a model identifier string into the vocabulary.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().to_lowercase().starts_with("kling") {
            Self::Kling
        } else {
            Self::Veo
        }
    }

    /// Identifier passed to the generation service.
    pub fn id(self) -> &'static str {
        match self {
            Self::Veo => "veo-2",
            Self::Kling => "kling-1.6",
        }
    }
}

impl Default for VideoModel {
    fn default() -> Self {
        Self::Veo
    }
}

/// Build the video prompt for one shot.
///
/// Template family is keyed by `model`; within a family, the
/// default-language variant is used for [`DEFAULT_LANGUAGE`] and the
/// all-others variant for every other tag.
pub fn build_video_prompt(
    action_summary: &str,
    movement: &CameraMovement,
    model: VideoModel,
    language: &str,
) -> String {
    let action = action_summary.trim();
    let movement_label = movement.label();
    let default_language = language.trim().eq_ignore_ascii_case(DEFAULT_LANGUAGE);

    match (model, default_language) {
        (VideoModel::Veo, true) => format!(
            "Generate a smooth video transition from the start frame to the end frame. \
             Action: {action}. Camera movement: {movement_label}. \
             Preserve character identity, wardrobe, and lighting across every frame."
        ),
        (VideoModel::Veo, false) => format!(
            "Generate a smooth video transition from the start frame to the end frame. \
             Any dialogue or on-screen text is in {language}. \
             Action: {action}. Camera movement: {movement_label}. \
             Preserve character identity, wardrobe, and lighting across every frame."
        ),
        (VideoModel::Kling, true) => {
            format!("Animate this scene: {action}, camera movement: {movement_label}.")
        }
        (VideoModel::Kling, false) => format!(
            "Scene language: {language}. Animate this scene: {action}, \
             camera movement: {movement_label}."
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_art() -> ArtDirection {
        ArtDirection {
            color_palette: "teal and amber".to_string(),
            character_design: "weathered faces, practical clothing".to_string(),
            lighting: "low golden sidelight".to_string(),
            texture: "film grain".to_string(),
            mood_keywords: "melancholy, resolve".to_string(),
            consistency_anchor: "A rain-worn harbor town at dusk.".to_string(),
        }
    }

    // -- build_keyframe_prompt -------------------------------------------------

    #[test]
    fn layers_appear_in_fixed_order() {
        let prompt = build_keyframe_prompt(
            "The captain walks along the pier",
            Some(&sample_art()),
            &VisualStyle::Cinematic,
            &CameraMovement::PanLeft,
            FrameRole::Start,
        );

        let base_idx = prompt.find("The captain").unwrap();
        let art_idx = prompt.find(ART_DIRECTION_MARKER).unwrap();
        let style_idx = prompt.find(STYLE_MARKER).unwrap();
        let camera_idx = prompt.find(CAMERA_MARKER).unwrap();
        let tech_idx = prompt.find("Technical requirements").unwrap();

        assert!(base_idx < art_idx);
        assert!(art_idx < style_idx);
        assert!(style_idx < camera_idx);
        assert!(camera_idx < tech_idx);
    }

    #[test]
    fn art_direction_is_omitted_when_absent() {
        let prompt = build_keyframe_prompt(
            "A quiet kitchen",
            None,
            &VisualStyle::Anime,
            &CameraMovement::Static,
            FrameRole::Start,
        );
        assert!(!prompt.contains(ART_DIRECTION_MARKER));
        assert!(prompt.contains(STYLE_MARKER));
    }

    #[test]
    fn camera_line_uses_role_specific_guide() {
        let start = build_keyframe_prompt(
            "base",
            None,
            &VisualStyle::Cinematic,
            &CameraMovement::PanLeft,
            FrameRole::Start,
        );
        let end = build_keyframe_prompt(
            "base",
            None,
            &VisualStyle::Cinematic,
            &CameraMovement::PanLeft,
            FrameRole::End,
        );
        assert!(start.contains("right third"));
        assert!(end.contains("left third"));
    }

    #[test]
    fn unknown_style_passes_through() {
        let prompt = build_keyframe_prompt(
            "base",
            None,
            &VisualStyle::Custom("charcoal sketch".to_string()),
            &CameraMovement::Static,
            FrameRole::Start,
        );
        assert!(prompt.contains("Visual style: charcoal sketch"));
    }

    // -- extract_base_prompt ---------------------------------------------------

    #[test]
    fn extracts_base_from_assembled_prompt() {
        let prompt = build_keyframe_prompt(
            "The captain walks along the pier",
            Some(&sample_art()),
            &VisualStyle::Cinematic,
            &CameraMovement::PanLeft,
            FrameRole::Start,
        );
        assert_eq!(
            extract_base_prompt(&prompt),
            "The captain walks along the pier",
        );
    }

    #[test]
    fn unassembled_prompt_is_returned_whole() {
        assert_eq!(extract_base_prompt("plain narrative"), "plain narrative");
    }

    #[test]
    fn relayering_is_idempotent() {
        let base = "The captain walks along the pier";
        let style = VisualStyle::Cinematic;
        let movement = CameraMovement::PanLeft;
        let art = sample_art();

        let mut prompt =
            build_keyframe_prompt(base, Some(&art), &style, &movement, FrameRole::Start);
        for _ in 0..5 {
            let recovered = extract_base_prompt(&prompt).to_string();
            assert_eq!(recovered, base);
            prompt =
                build_keyframe_prompt(&recovered, Some(&art), &style, &movement, FrameRole::Start);
        }
    }

    // -- build_video_prompt ----------------------------------------------------

    #[test]
    fn veo_template_gives_frame_transition_instructions() {
        let prompt = build_video_prompt(
            "She turns away from the window",
            &CameraMovement::DollyIn,
            VideoModel::Veo,
            "en",
        );
        assert!(prompt.contains("start frame to the end frame"));
        assert!(prompt.contains("dolly in"));
        assert!(!prompt.contains("dialogue or on-screen text"));
    }

    #[test]
    fn veo_non_default_language_adds_directive() {
        let prompt = build_video_prompt(
            "She turns away",
            &CameraMovement::Static,
            VideoModel::Veo,
            "ja",
        );
        assert!(prompt.contains("in ja"));
    }

    #[test]
    fn kling_template_appends_action_and_movement() {
        let prompt = build_video_prompt(
            "He lifts the lantern",
            &CameraMovement::TiltUp,
            VideoModel::Kling,
            "en",
        );
        assert_eq!(
            prompt,
            "Animate this scene: He lifts the lantern, camera movement: tilt up.",
        );
    }

    #[test]
    fn kling_non_default_language_leads_with_directive() {
        let prompt = build_video_prompt(
            "He lifts the lantern",
            &CameraMovement::TiltUp,
            VideoModel::Kling,
            "fr",
        );
        assert!(prompt.starts_with("Scene language: fr."));
    }

    #[test]
    fn model_parse_falls_back_to_veo() {
        assert_eq!(VideoModel::parse("kling-1.6"), VideoModel::Kling);
        assert_eq!(VideoModel::parse("veo-2"), VideoModel::Veo);
        assert_eq!(VideoModel::parse("unknown-model"), VideoModel::Veo);
    }
}
