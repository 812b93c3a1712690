//! Block model parsing.
//!
//! Block models define the 3D geometry of blocks using cuboid elements.
//! Parsing is strict about the fields that change geometry: face UV
//! rotation, element rotation angle and explicit UVs are validated here so
//! the mesher never has to guess.

use crate::error::{GeometryError, Result};
use crate::types::{Direction, ElementRotation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A parsed block model (models/*.json).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockModel {
    /// Parent model to inherit from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Whether to use ambient occlusion. `None` inherits from the parent.
    #[serde(
        default,
        rename = "ambientocclusion",
        skip_serializing_if = "Option::is_none"
    )]
    pub ambient_occlusion: Option<bool>,

    /// Texture variable definitions.
    #[serde(default)]
    pub textures: HashMap<String, String>,

    /// Model elements (cuboids).
    #[serde(default)]
    pub elements: Vec<ModelElement>,
}

impl BlockModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a model from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: BlockModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Check the geometry-affecting fields of every element.
    pub fn validate(&self) -> Result<()> {
        for (index, element) in self.elements.iter().enumerate() {
            if let Some(reason) = element.malformation() {
                return Err(GeometryError::InvalidModel(format!(
                    "element {}: {}",
                    index, reason
                )));
            }
        }
        Ok(())
    }

    /// Get the full parent resource location.
    pub fn parent_location(&self) -> Option<String> {
        self.parent.as_deref().map(normalize_location)
    }
}

/// Add the `minecraft:` namespace to a resource location that has none.
pub fn normalize_location(location: &str) -> String {
    if location.contains(':') {
        location.to_string()
    } else {
        format!("minecraft:{}", location)
    }
}

/// A cuboid element within a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelElement {
    /// Minimum corner (model coordinates, nominally 0-16).
    pub from: [f32; 3],
    /// Maximum corner (model coordinates, nominally 0-16).
    pub to: [f32; 3],
    /// Optional rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<ElementRotation>,
    /// Whether this element receives shade.
    #[serde(default = "default_shade")]
    pub shade: bool,
    /// Face definitions, iterated in [`Direction::ALL`] order.
    #[serde(default)]
    pub faces: BTreeMap<Direction, ModelFace>,
}

fn default_shade() -> bool {
    true
}

impl ModelElement {
    /// A full-block element with no faces.
    pub fn cube(from: [f32; 3], to: [f32; 3]) -> Self {
        Self {
            from,
            to,
            rotation: None,
            shade: true,
            faces: BTreeMap::new(),
        }
    }

    /// Add a face (builder style).
    pub fn with_face(mut self, direction: Direction, face: ModelFace) -> Self {
        self.faces.insert(direction, face);
        self
    }

    /// Set the element rotation (builder style).
    pub fn with_rotation(mut self, rotation: ElementRotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Convert from model coordinates (0-16) to block-centered (-0.5 to 0.5).
    pub fn normalized_from(&self) -> [f32; 3] {
        [
            self.from[0] / 16.0 - 0.5,
            self.from[1] / 16.0 - 0.5,
            self.from[2] / 16.0 - 0.5,
        ]
    }

    /// Convert to model coordinates (0-16) to block-centered (-0.5 to 0.5).
    pub fn normalized_to(&self) -> [f32; 3] {
        [
            self.to[0] / 16.0 - 0.5,
            self.to[1] / 16.0 - 0.5,
            self.to[2] / 16.0 - 0.5,
        ]
    }

    /// Describe why this element cannot produce geometry, if it cannot.
    ///
    /// Models decoded straight from JSON (a worker request, say) never went
    /// through [`BlockModel::validate`], so the builder checks again here.
    pub fn malformation(&self) -> Option<String> {
        if self.from.iter().chain(self.to.iter()).any(|c| !c.is_finite()) {
            return Some(format!(
                "non-finite bounds from={:?} to={:?}",
                self.from, self.to
            ));
        }

        if let Some(rotation) = &self.rotation {
            if rotation.origin.iter().any(|c| !c.is_finite()) || !rotation.angle.is_finite() {
                return Some("non-finite rotation".to_string());
            }
            if rotation.angle.abs() > 45.0 {
                return Some(format!(
                    "rotation angle {} outside [-45, 45]",
                    rotation.angle
                ));
            }
        }

        for (direction, face) in &self.faces {
            if !matches!(face.rotation, 0 | 90 | 180 | 270) {
                return Some(format!(
                    "face {}: uv rotation {} is not 0, 90, 180 or 270",
                    direction, face.rotation
                ));
            }
            if face.uv.is_some_and(|uv| uv.iter().any(|c| !c.is_finite())) {
                return Some(format!("face {}: non-finite uv", direction));
            }
        }

        None
    }
}

/// A face of a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFace {
    /// UV coordinates [u1, v1, u2, v2] in 0-16 range. u1 > u2 mirrors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv: Option<[f32; 4]>,
    /// Texture reference (e.g., "#side" or "block/stone").
    pub texture: String,
    /// Face direction for neighbor culling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cullface: Option<Direction>,
    /// UV rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub rotation: i32,
    /// Tint index for biome coloring (-1 = no tint).
    #[serde(default = "default_tint_index")]
    pub tintindex: i32,
}

fn default_tint_index() -> i32 {
    -1
}

impl ModelFace {
    /// A face with the given texture reference and no overrides.
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            uv: None,
            texture: texture.into(),
            cullface: None,
            rotation: 0,
            tintindex: -1,
        }
    }

    pub fn with_uv(mut self, uv: [f32; 4]) -> Self {
        self.uv = Some(uv);
        self
    }

    pub fn with_rotation(mut self, rotation: i32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_tint_index(mut self, tintindex: i32) -> Self {
        self.tintindex = tintindex;
        self
    }

    pub fn with_cullface(mut self, cullface: Direction) -> Self {
        self.cullface = Some(cullface);
        self
    }

    /// Check if this face has a tint.
    pub fn has_tint(&self) -> bool {
        self.tintindex >= 0
    }
}
