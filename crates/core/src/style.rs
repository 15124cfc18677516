//! Visual style vocabulary.
//!
//! A project carries one visual style that is layered into every keyframe
//! prompt. Known styles expand to a curated keyword phrase; unknown styles
//! pass through verbatim as the phrase.

use serde::{Deserialize, Serialize};

/// Closed visual-style vocabulary with verbatim passthrough for styles the
/// table does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VisualStyle {
    Cinematic,
    Anime,
    Watercolor,
    Noir,
    Documentary,
    Cyberpunk,
    Custom(String),
}

impl VisualStyle {
    /// Fold a free-form style string into the vocabulary.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "cinematic" | "film" => Self::Cinematic,
            "anime" => Self::Anime,
            "watercolor" | "watercolour" => Self::Watercolor,
            "noir" | "film noir" => Self::Noir,
            "documentary" => Self::Documentary,
            "cyberpunk" => Self::Cyberpunk,
            _ => Self::Custom(raw.trim().to_string()),
        }
    }

    /// Keyword phrase injected into prompt assembly.
    pub fn phrase(&self) -> &str {
        match self {
            Self::Cinematic => {
                "cinematic film still, anamorphic framing, dramatic key lighting, rich color grading"
            }
            Self::Anime => "anime illustration, clean line art, cel shading, vivid saturated palette",
            Self::Watercolor => {
                "watercolor painting, soft pigment washes, visible paper grain, loose edges"
            }
            Self::Noir => "film noir, high-contrast monochrome, hard shadows, venetian-blind light",
            Self::Documentary => {
                "documentary photography, available light, unstaged realism, muted tones"
            }
            Self::Cyberpunk => {
                "cyberpunk concept art, neon-drenched signage, rain-slick streets, dense detail"
            }
            Self::Custom(raw) => raw,
        }
    }

    /// Canonical name stored in snapshots and shown in the UI.
    pub fn name(&self) -> &str {
        match self {
            Self::Cinematic => "cinematic",
            Self::Anime => "anime",
            Self::Watercolor => "watercolor",
            Self::Noir => "noir",
            Self::Documentary => "documentary",
            Self::Cyberpunk => "cyberpunk",
            Self::Custom(raw) => raw,
        }
    }
}

impl From<String> for VisualStyle {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<VisualStyle> for String {
    fn from(style: VisualStyle) -> Self {
        style.name().to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_styles_expand_to_keyword_phrases() {
        assert!(VisualStyle::parse("cinematic").phrase().contains("film still"));
        assert!(VisualStyle::parse("Noir").phrase().contains("monochrome"));
    }

    #[test]
    fn unknown_style_passes_through_verbatim() {
        let style = VisualStyle::parse("claymation stop motion");
        assert_eq!(style.phrase(), "claymation stop motion");
        assert_eq!(style.name(), "claymation stop motion");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(VisualStyle::parse("ANIME"), VisualStyle::Anime);
        assert_eq!(VisualStyle::parse("Watercolour"), VisualStyle::Watercolor);
    }

    #[test]
    fn serde_round_trips_custom_style() {
        let style = VisualStyle::Custom("pixel art".to_string());
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, "\"pixel art\"");
        let back: VisualStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
    }
}
