//! Blockstate definition parsing.
//!
//! Blockstates map block properties to model variants, either through a
//! "variants" table or a list of "multipart" cases. Only the parts needed to
//! pick a model and its [`BlockstateRotation`] are kept.

use crate::types::BlockstateRotation;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A blockstate definition from blockstates/*.json.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockstateDefinition {
    /// Property combinations map to (weighted) models.
    Variants(BTreeMap<String, Vec<ModelVariant>>),
    /// Conditional model application.
    Multipart(Vec<MultipartCase>),
}

impl<'de> Deserialize<'de> for BlockstateDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawBlockstate {
            variants: Option<BTreeMap<String, VariantValue>>,
            multipart: Option<Vec<MultipartCase>>,
        }

        let raw = RawBlockstate::deserialize(deserializer)?;

        if let Some(variants) = raw.variants {
            Ok(BlockstateDefinition::Variants(
                variants
                    .into_iter()
                    .map(|(k, v)| (k, v.into_vec()))
                    .collect(),
            ))
        } else if let Some(multipart) = raw.multipart {
            Ok(BlockstateDefinition::Multipart(multipart))
        } else {
            Ok(BlockstateDefinition::Variants(BTreeMap::new()))
        }
    }
}

/// A single model or an array of weighted models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantValue {
    Single(ModelVariant),
    Multiple(Vec<ModelVariant>),
}

impl VariantValue {
    pub fn into_vec(self) -> Vec<ModelVariant> {
        match self {
            VariantValue::Single(v) => vec![v],
            VariantValue::Multiple(v) => v,
        }
    }

    pub fn first(&self) -> Option<&ModelVariant> {
        match self {
            VariantValue::Single(v) => Some(v),
            VariantValue::Multiple(v) => v.first(),
        }
    }
}

/// A model reference with optional whole-model rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVariant {
    /// Model resource location (e.g., "block/stone").
    pub model: String,
    /// X rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub y: i32,
    /// If true, UV coordinates don't rotate with the block.
    #[serde(default)]
    pub uvlock: bool,
    /// Weight for random selection.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl ModelVariant {
    /// Full resource location for the model.
    pub fn model_location(&self) -> String {
        super::normalize_location(&self.model)
    }

    /// The whole-model rotation this variant asks for.
    pub fn rotation(&self) -> BlockstateRotation {
        BlockstateRotation::new(self.x, self.y, self.uvlock)
    }
}

/// A multipart case; `when` is kept as raw JSON since only unconditional
/// parts matter for picking a preview model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipartCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<serde_json::Value>,
    pub apply: VariantValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants_with_rotation() {
        let json = r#"{
            "variants": {
                "facing=north": { "model": "block/furnace", "y": 0 },
                "facing=east": { "model": "block/furnace", "y": 90, "uvlock": true }
            }
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        match def {
            BlockstateDefinition::Variants(variants) => {
                assert_eq!(variants.len(), 2);
                let east = &variants["facing=east"][0];
                assert_eq!(east.rotation(), BlockstateRotation::new(0, 90, true));
                assert_eq!(east.model_location(), "minecraft:block/furnace");
            }
            _ => panic!("Expected Variants"),
        }
    }

    #[test]
    fn test_parse_weighted_variants() {
        let json = r#"{
            "variants": {
                "": [
                    { "model": "block/stone", "weight": 10 },
                    { "model": "block/stone_mirrored", "weight": 5 }
                ]
            }
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        match def {
            BlockstateDefinition::Variants(variants) => {
                assert_eq!(variants[""].len(), 2);
                assert_eq!(variants[""][0].weight, 10);
                assert_eq!(variants[""][1].weight, 5);
            }
            _ => panic!("Expected Variants"),
        }
    }

    #[test]
    fn test_parse_multipart() {
        let json = r#"{
            "multipart": [
                { "when": { "north": "true" }, "apply": { "model": "block/fence_side", "uvlock": true } },
                { "apply": { "model": "block/fence_post" } }
            ]
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        match def {
            BlockstateDefinition::Multipart(cases) => {
                assert_eq!(cases.len(), 2);
                assert!(cases[0].when.is_some());
                assert!(cases[1].when.is_none());
                assert_eq!(cases[0].apply.first().unwrap().model, "block/fence_side");
            }
            _ => panic!("Expected Multipart"),
        }
    }

    #[test]
    fn test_parse_empty_blockstate() {
        let def: BlockstateDefinition = serde_json::from_str("{}").unwrap();
        assert_eq!(def, BlockstateDefinition::Variants(BTreeMap::new()));
    }
}
