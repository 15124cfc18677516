//! Script and art-direction data consumed from the external parsing and
//! art-direction collaborators.
//!
//! These structures are inputs to reference resolution and prompt
//! assembly. They are immutable here apart from scene reference-image
//! updates performed by the owning collaborator.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, ImageRef};

/// Parsed script data: the cast, the scenes, and global production intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptData {
    pub characters: Vec<Character>,
    pub scenes: Vec<Scene>,
    /// Target duration of the finished piece in seconds.
    pub target_duration_secs: Option<f64>,
    /// BCP-47-ish language tag, e.g. `"en"`, `"ja"`.
    pub language: String,
    /// Free-form style keyword fed to the visual-style vocabulary.
    pub visual_style: String,
    /// Optional art-direction brief interpolated into prompt assembly
    /// ahead of per-character and per-scene detail.
    #[serde(default)]
    pub art_direction: Option<ArtDirection>,
}

impl ScriptData {
    /// Look up a scene by id.
    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    /// Look up a character by id.
    pub fn character(&self, character_id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == character_id)
    }
}

/// One scene: a place at a time with an atmosphere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: EntityId,
    pub location: String,
    pub time_of_day: String,
    pub atmosphere: String,
    /// Environment anchor image, highest-priority conditioning reference.
    #[serde(default)]
    pub reference_image: Option<ImageRef>,
}

/// One character with an optional base look and alternate looks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub gender: String,
    pub age: String,
    pub personality: String,
    /// Base look reference image.
    #[serde(default)]
    pub reference_image: Option<ImageRef>,
    /// Alternate looks (costume, age, state changes), in authored order.
    #[serde(default)]
    pub variations: Vec<Variation>,
}

impl Character {
    /// Look up a variation by id.
    pub fn variation(&self, variation_id: &str) -> Option<&Variation> {
        self.variations.iter().find(|v| v.id == variation_id)
    }
}

/// An alternate look for a character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variation {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub reference_image: Option<ImageRef>,
}

/// Global art-direction brief from the art-direction collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtDirection {
    pub color_palette: String,
    pub character_design: String,
    pub lighting: String,
    pub texture: String,
    pub mood_keywords: String,
    /// Single paragraph repeated across prompts to anchor consistency.
    pub consistency_anchor: String,
}
