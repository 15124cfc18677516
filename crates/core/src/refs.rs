//! Reference image resolution.
//!
//! Produces the ordered conditioning-image list for one shot's image
//! generation call. Order is fixed and meaningful to the downstream
//! model: the scene's environment anchor first, then character identity
//! references in the shot's character order.

use std::collections::HashMap;

use crate::script::ScriptData;
use crate::types::{EntityId, ImageRef};

/// Resolve the ordered conditioning images for a shot.
///
/// Ordering: (1) the scene's reference image when present; (2) for each
/// character in shot order, the selected variation's reference image,
/// falling back to the character's base image; characters with neither
/// are skipped. No de-duplication. Empty when `script` is `None`.
pub fn resolve_references(
    script: Option<&ScriptData>,
    scene_id: &str,
    character_ids: &[EntityId],
    variation_selections: &HashMap<EntityId, EntityId>,
) -> Vec<ImageRef> {
    let Some(script) = script else {
        return Vec::new();
    };

    let mut refs = Vec::new();

    if let Some(image) = script.scene(scene_id).and_then(|s| s.reference_image.clone()) {
        refs.push(image);
    }

    for character_id in character_ids {
        let Some(character) = script.character(character_id) else {
            continue;
        };

        let variation_image = variation_selections
            .get(character_id)
            .and_then(|variation_id| character.variation(variation_id))
            .and_then(|v| v.reference_image.clone());

        match variation_image.or_else(|| character.reference_image.clone()) {
            Some(image) => refs.push(image),
            None => continue,
        }
    }

    refs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Character, Scene, Variation};

    fn script_with(scene_image: Option<&str>) -> ScriptData {
        ScriptData {
            characters: vec![
                Character {
                    id: "ch-1".to_string(),
                    name: "Mara".to_string(),
                    gender: "female".to_string(),
                    age: "34".to_string(),
                    personality: "guarded".to_string(),
                    reference_image: Some("img://mara-base".to_string()),
                    variations: vec![Variation {
                        id: "var-1".to_string(),
                        name: "storm coat".to_string(),
                        reference_image: Some("img://mara-coat".to_string()),
                    }],
                },
                Character {
                    id: "ch-2".to_string(),
                    name: "Tomas".to_string(),
                    gender: "male".to_string(),
                    age: "61".to_string(),
                    personality: "wry".to_string(),
                    reference_image: Some("img://tomas-base".to_string()),
                    variations: vec![],
                },
            ],
            scenes: vec![Scene {
                id: "sc-1".to_string(),
                location: "harbor pier".to_string(),
                time_of_day: "dusk".to_string(),
                atmosphere: "rain".to_string(),
                reference_image: scene_image.map(String::from),
            }],
            target_duration_secs: Some(60.0),
            language: "en".to_string(),
            visual_style: "cinematic".to_string(),
            art_direction: None,
        }
    }

    #[test]
    fn scene_image_comes_first() {
        let script = script_with(Some("img://pier"));
        let refs = resolve_references(
            Some(&script),
            "sc-1",
            &["ch-1".to_string(), "ch-2".to_string()],
            &HashMap::new(),
        );
        assert_eq!(
            refs,
            vec!["img://pier", "img://mara-base", "img://tomas-base"],
        );
    }

    #[test]
    fn selected_variation_overrides_base_image() {
        let script = script_with(None);
        let selections =
            HashMap::from([("ch-1".to_string(), "var-1".to_string())]);
        let refs = resolve_references(Some(&script), "sc-1", &["ch-1".to_string()], &selections);
        assert_eq!(refs, vec!["img://mara-coat"]);
    }

    #[test]
    fn selection_of_imageless_variation_falls_back_to_base() {
        let mut script = script_with(None);
        script.characters[0].variations[0].reference_image = None;
        let selections =
            HashMap::from([("ch-1".to_string(), "var-1".to_string())]);
        let refs = resolve_references(Some(&script), "sc-1", &["ch-1".to_string()], &selections);
        assert_eq!(refs, vec!["img://mara-base"]);
    }

    #[test]
    fn characters_without_any_image_are_skipped() {
        let mut script = script_with(Some("img://pier"));
        script.characters[1].reference_image = None;
        let refs = resolve_references(
            Some(&script),
            "sc-1",
            &["ch-1".to_string(), "ch-2".to_string()],
            &HashMap::new(),
        );
        assert_eq!(refs, vec!["img://pier", "img://mara-base"]);
    }

    #[test]
    fn missing_script_yields_empty_list() {
        let refs = resolve_references(None, "sc-1", &["ch-1".to_string()], &HashMap::new());
        assert!(refs.is_empty());
    }

    #[test]
    fn unknown_scene_contributes_nothing() {
        let script = script_with(Some("img://pier"));
        let refs = resolve_references(Some(&script), "sc-404", &["ch-2".to_string()], &HashMap::new());
        assert_eq!(refs, vec!["img://tomas-base"]);
    }

    #[test]
    fn no_deduplication_is_performed() {
        let mut script = script_with(None);
        script.characters[1].reference_image = Some("img://mara-base".to_string());
        let refs = resolve_references(
            Some(&script),
            "sc-1",
            &["ch-1".to_string(), "ch-2".to_string()],
            &HashMap::new(),
        );
        assert_eq!(refs, vec!["img://mara-base", "img://mara-base"]);
    }
}
