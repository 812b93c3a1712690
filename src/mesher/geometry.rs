//! Geometry buffers for one model element.

use super::material::{push_group, Diagnostic, Material, MaterialGroup};
use super::tint::TintCategory;
use crate::types::BoundingBox;
use serde::{Deserialize, Serialize};

/// Render-ready buffers for a single element.
///
/// Positions and normals are flat xyz triples, UVs flat uv pairs; indices
/// reference vertices by position in those buffers. Faces are quads: four
/// vertices and six indices each.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryResult {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
    pub material_groups: Vec<MaterialGroup>,
    /// Set when the whole element is a placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
    /// Why the element could not be built, for placeholders standing in for
    /// malformed elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeometryResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quad with its material. Vertices are given in order around the
    /// quad; triangles are wound counter-clockwise for front faces.
    pub fn push_quad(
        &mut self,
        positions: [[f32; 3]; 4],
        normal: [f32; 3],
        uvs: [[f32; 2]; 4],
        material: Material,
        tint: Option<TintCategory>,
    ) {
        let base = self.vertex_count() as u32;
        let start = self.indices.len() as u32;

        for (position, uv) in positions.iter().zip(uvs.iter()) {
            self.positions.extend_from_slice(position);
            self.normals.extend_from_slice(&normal);
            self.uvs.extend_from_slice(uv);
        }

        // First triangle: 0, 2, 1. Second: 0, 3, 2.
        self.indices
            .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);

        push_group(&mut self.material_groups, material, tint, start, 6);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of vertex `i`.
    pub fn position(&self, i: usize) -> [f32; 3] {
        [
            self.positions[i * 3],
            self.positions[i * 3 + 1],
            self.positions[i * 3 + 2],
        ]
    }

    pub fn normal(&self, i: usize) -> [f32; 3] {
        [
            self.normals[i * 3],
            self.normals[i * 3 + 1],
            self.normals[i * 3 + 2],
        ]
    }

    pub fn uv(&self, i: usize) -> [f32; 2] {
        [self.uvs[i * 2], self.uvs[i * 2 + 1]]
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points((0..self.vertex_count()).map(|i| self.position(i)))
    }
}
