//! Tint classification for grass and foliage faces.
//!
//! A face is tinted when its `tintindex` is set. The family (grass or
//! foliage) is not recorded in the model, so it is guessed from the texture
//! id. The actual multiplier is picked per category, optionally from a
//! caller-supplied biome color.

use crate::model::ModelFace;
use crate::types::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tint family of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TintCategory {
    Grass,
    Foliage,
}

impl fmt::Display for TintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TintCategory::Grass => write!(f, "grass"),
            TintCategory::Foliage => write!(f, "foliage"),
        }
    }
}

const GRASS_KEYWORDS: &[&str] = &["grass", "fern", "tall_grass", "sugar_cane"];
const FOLIAGE_KEYWORDS: &[&str] = &["leaves", "vine"];

/// Classify a face's tint from its tint index and texture.
///
/// `texture` is the resolved id when there is one; the face's raw reference
/// is used otherwise. Tinted faces whose texture matches neither family
/// (redstone dust, stems) come back untinted.
pub fn classify(face: &ModelFace, texture: Option<&str>) -> Option<TintCategory> {
    if !face.has_tint() {
        return None;
    }
    classify_texture(texture.unwrap_or(&face.texture))
}

/// Keyword match on a texture id or reference.
pub fn classify_texture(texture: &str) -> Option<TintCategory> {
    // Path only; the namespace never carries a keyword
    let path = texture.rsplit(':').next().unwrap_or(texture);

    if GRASS_KEYWORDS.iter().any(|k| path.contains(k)) {
        Some(TintCategory::Grass)
    } else if FOLIAGE_KEYWORDS.iter().any(|k| path.contains(k)) {
        Some(TintCategory::Foliage)
    } else {
        None
    }
}

/// Tint multipliers per category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TintColors {
    pub grass: [f32; 3],
    pub foliage: [f32; 3],
}

impl Default for TintColors {
    fn default() -> Self {
        Self {
            // Plains biome approximate
            grass: [0.56, 0.74, 0.35],
            foliage: [0.47, 0.66, 0.23],
        }
    }
}

impl TintColors {
    /// Multipliers for a biome color; `None` keeps the defaults.
    /// A biome color applies to both families.
    pub fn from_biome(biome: Option<Rgb>) -> Self {
        match biome {
            Some(rgb) => {
                let multiplier = rgb.to_multiplier();
                Self {
                    grass: multiplier,
                    foliage: multiplier,
                }
            }
            None => Self::default(),
        }
    }

    pub fn color(&self, category: TintCategory) -> [f32; 3] {
        match category {
            TintCategory::Grass => self.grass,
            TintCategory::Foliage => self.foliage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untinted_face_never_classified() {
        let face = ModelFace::new("#top");
        assert_eq!(classify(&face, Some("minecraft:block/grass_block_top")), None);
    }

    #[test]
    fn test_grass_keywords() {
        let face = ModelFace::new("#top").with_tint_index(0);
        for texture in [
            "minecraft:block/grass_block_top",
            "minecraft:block/fern",
            "block/tall_grass_top",
            "minecraft:block/sugar_cane",
        ] {
            assert_eq!(classify(&face, Some(texture)), Some(TintCategory::Grass), "{}", texture);
        }
    }

    #[test]
    fn test_foliage_keywords() {
        let face = ModelFace::new("#all").with_tint_index(0);
        assert_eq!(classify(&face, Some("minecraft:block/oak_leaves")), Some(TintCategory::Foliage));
        assert_eq!(classify(&face, Some("minecraft:block/vine")), Some(TintCategory::Foliage));
    }

    #[test]
    fn test_unknown_family_untinted() {
        let face = ModelFace::new("#line").with_tint_index(0);
        assert_eq!(classify(&face, Some("minecraft:block/redstone_dust_line0")), None);
    }

    #[test]
    fn test_falls_back_to_reference() {
        let face = ModelFace::new("#grass_overlay").with_tint_index(0);
        assert_eq!(classify(&face, None), Some(TintCategory::Grass));
    }

    #[test]
    fn test_default_colors() {
        let colors = TintColors::default();
        assert_eq!(colors.color(TintCategory::Grass), [0.56, 0.74, 0.35]);
        assert_eq!(colors.color(TintCategory::Foliage), [0.47, 0.66, 0.23]);
    }

    #[test]
    fn test_biome_color_overrides_both() {
        let colors = TintColors::from_biome(Some(Rgb::new(255, 0, 51)));
        assert_eq!(colors.grass, [1.0, 0.0, 0.2]);
        assert_eq!(colors.foliage, [1.0, 0.0, 0.2]);
        assert_eq!(TintColors::from_biome(None), TintColors::default());
    }
}
