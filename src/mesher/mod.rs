//! Geometry generation from block models.
//!
//! This module converts flattened block models into per-element geometry
//! buffers with material groups and tint categories.

pub mod element;
pub mod geometry;
pub mod material;
pub mod tint;
pub mod uv;

pub use element::{build_element, placeholder, ElementBuilder};
pub use geometry::GeometryResult;
pub use material::{attach_texture_handles, Diagnostic, Material, MaterialGroup};
pub use tint::{TintCategory, TintColors};

use crate::error::GeometryError;
use crate::model::BlockModel;
use crate::types::{BlockstateRotation, BoundingBox, Direction, Rgb};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-request geometry options.
#[derive(Debug, Clone, Default)]
pub struct GeometryOptions {
    /// Whole-model rotation from the blockstate variant.
    pub rotation: Option<BlockstateRotation>,
    /// Biome color for grass and foliage tints.
    pub biome_color: Option<Rgb>,
    /// Texture id to loadable handle. Empty means handles are not attached.
    pub texture_handles: HashMap<String, String>,
    /// World sides covered by neighbors, for cullface.
    pub occluded: Vec<Direction>,
}

impl GeometryOptions {
    pub fn with_rotation(mut self, rotation: BlockstateRotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_biome_color(mut self, color: Rgb) -> Self {
        self.biome_color = Some(color);
        self
    }

    pub fn with_texture_handles(mut self, handles: HashMap<String, String>) -> Self {
        self.texture_handles = handles;
        self
    }

    pub fn with_occluded(mut self, sides: impl IntoIterator<Item = Direction>) -> Self {
        self.occluded.extend(sides);
        self
    }
}

/// Geometry for a whole model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelGeometry {
    /// One result per element, in the model's element order.
    pub elements: Vec<GeometryResult>,
    pub rotation: Option<BlockstateRotation>,
    pub tint_colors: TintColors,
}

impl ModelGeometry {
    /// Multiplier the renderer applies to faces of `category`.
    pub fn tint_color(&self, category: TintCategory) -> [f32; 3] {
        self.tint_colors.color(category)
    }

    pub fn total_vertices(&self) -> usize {
        self.elements.iter().map(GeometryResult::vertex_count).sum()
    }

    pub fn total_triangles(&self) -> usize {
        self.elements.iter().map(GeometryResult::triangle_count).sum()
    }

    /// True if any element is a placeholder or any group fell back to a
    /// diagnostic material.
    pub fn has_diagnostics(&self) -> bool {
        self.elements.iter().any(|e| {
            e.diagnostic.is_some() || e.material_groups.iter().any(|g| g.material.is_diagnostic())
        })
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(
            self.elements
                .iter()
                .flat_map(|e| (0..e.vertex_count()).map(move |i| e.position(i))),
        )
    }
}

/// Build geometry for every element of a flattened model.
///
/// Never fails: an empty model becomes one red placeholder cuboid, and a
/// malformed element is replaced by a magenta placeholder carrying its error
/// while the remaining elements build normally. A blockstate rotation that is
/// not made of quarter turns replaces the whole model with one magenta
/// placeholder.
pub fn build_model(model: &BlockModel, options: &GeometryOptions) -> ModelGeometry {
    let rotation = options.rotation.unwrap_or_default();
    let builder = ElementBuilder::new(&model.textures)
        .with_rotation(rotation)
        .with_occluded(options.occluded.iter().copied());

    let elements = if !rotation.is_quarter_turns() {
        let error = GeometryError::InvalidModel(format!(
            "blockstate rotation x={} y={} z={} is not a multiple of 90",
            rotation.x, rotation.y, rotation.z
        ));
        log::warn!("{}, substituting placeholder", error);
        vec![placeholder(Diagnostic::MissingTexture, Some(error.to_string()))]
    } else if model.elements.is_empty() {
        log::warn!("Model has no elements, substituting placeholder");
        vec![placeholder(Diagnostic::NoElements, None)]
    } else {
        model
            .elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let mut result = builder.build(index, element).unwrap_or_else(|e| {
                    log::warn!("{}, substituting placeholder", e);
                    placeholder(Diagnostic::MissingTexture, Some(e.to_string()))
                });
                attach_texture_handles(&mut result.material_groups, &options.texture_handles);
                result
            })
            .collect()
    };

    ModelGeometry {
        elements,
        rotation: options.rotation,
        tint_colors: TintColors::from_biome(options.biome_color),
    }
}
