//! Element geometry builder.
//!
//! Turns one cuboid element into a [`GeometryResult`]: four vertices per
//! face in block-centered space (-0.5..0.5), UVs in 0-1, and material groups
//! keyed by resolved texture and tint.

use super::geometry::GeometryResult;
use super::material::{Diagnostic, Material};
use super::tint;
use super::uv::{self, compute_uv, default_uv};
use crate::error::{GeometryError, Result};
use crate::model::{ModelElement, ModelFace};
use crate::resolver::resolve_texture;
use crate::types::{Axis, BlockstateRotation, Direction, ElementRotation};
use glam::Vec3;
use std::collections::{HashMap, HashSet};

/// Builds element geometry against one model's textures and placement.
pub struct ElementBuilder<'a> {
    textures: &'a HashMap<String, String>,
    rotation: BlockstateRotation,
    occluded: HashSet<Direction>,
}

impl<'a> ElementBuilder<'a> {
    /// `textures` is the model's texture map; `#variable` chains are
    /// followed per face.
    pub fn new(textures: &'a HashMap<String, String>) -> Self {
        Self {
            textures,
            rotation: BlockstateRotation::default(),
            occluded: HashSet::new(),
        }
    }

    /// Place the model with a blockstate rotation.
    pub fn with_rotation(mut self, rotation: BlockstateRotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// World-space sides covered by a neighbor. Faces whose (rotated)
    /// cullface is one of these are skipped.
    pub fn with_occluded(mut self, sides: impl IntoIterator<Item = Direction>) -> Self {
        self.occluded.extend(sides);
        self
    }

    /// Build geometry for the element at `index` in its model.
    pub fn build(&self, index: usize, element: &ModelElement) -> Result<GeometryResult> {
        if let Some(reason) = element.malformation() {
            return Err(GeometryError::MalformedElement { index, reason });
        }

        let mut result = GeometryResult::new();

        for (direction, face) in &element.faces {
            if let Some(cullface) = face.cullface {
                if self.occluded.contains(&self.rotation.rotate_direction(cullface)) {
                    continue;
                }
            }
            self.add_face(&mut result, element, *direction, face);
        }

        Ok(result)
    }

    fn add_face(
        &self,
        result: &mut GeometryResult,
        element: &ModelElement,
        direction: Direction,
        face: &ModelFace,
    ) {
        let (material, tint) = match resolve_texture(&face.texture, self.textures) {
            Some(id) => (Material::texture(id), tint::classify(face, Some(id))),
            None => {
                log::debug!(
                    "Unresolved texture {} on {} face, using missing-texture material",
                    face.texture,
                    direction
                );
                (Material::Diagnostic(Diagnostic::MissingTexture), None)
            }
        };

        // UVs in 0-16 space until the very end
        let face_uv = compute_uv(face, element.from, element.to, direction);
        let uvs = uv::lock_uvs(face_uv.corners(), direction, &self.rotation)
            .map(|[u, v]| [u / 16.0, v / 16.0]);

        let mut positions =
            face_positions(direction, element.normalized_from(), element.normalized_to());
        let mut normal = direction.normal();

        if let Some(rotation) = &element.rotation {
            positions = apply_element_rotation(&positions, rotation);
            normal = rotate_normal(normal, rotation);
        }

        let positions = positions.map(|p| self.rotation.apply(p));
        let normal = self.rotation.apply(normal);

        result.push_quad(positions, normal, uvs, material, tint);
    }
}

/// Build geometry for one element with an optional blockstate rotation.
pub fn build_element(
    index: usize,
    element: &ModelElement,
    textures: &HashMap<String, String>,
    rotation: Option<&BlockstateRotation>,
) -> Result<GeometryResult> {
    ElementBuilder::new(textures)
        .with_rotation(rotation.copied().unwrap_or_default())
        .build(index, element)
}

/// A full-block cuboid drawn entirely with a diagnostic material.
pub fn placeholder(diagnostic: Diagnostic, error: Option<String>) -> GeometryResult {
    let from = [0.0; 3];
    let to = [16.0; 3];
    let mut result = GeometryResult::new();

    for direction in Direction::ALL {
        let [u1, v1, u2, v2] = default_uv(direction, from, to).map(|c| c / 16.0);
        result.push_quad(
            face_positions(direction, [-0.5; 3], [0.5; 3]),
            direction.normal(),
            [[u1, v1], [u2, v1], [u2, v2], [u1, v2]],
            Material::Diagnostic(diagnostic),
            None,
        );
    }

    result.diagnostic = Some(diagnostic);
    result.error = error;
    result
}

/// Corner positions of a face, ordered top-left, top-right, bottom-right,
/// bottom-left as seen from outside.
fn face_positions(direction: Direction, from: [f32; 3], to: [f32; 3]) -> [[f32; 3]; 4] {
    match direction {
        Direction::Down => [
            [from[0], from[1], to[2]],
            [to[0], from[1], to[2]],
            [to[0], from[1], from[2]],
            [from[0], from[1], from[2]],
        ],
        Direction::Up => [
            [from[0], to[1], from[2]],
            [to[0], to[1], from[2]],
            [to[0], to[1], to[2]],
            [from[0], to[1], to[2]],
        ],
        Direction::North => [
            [to[0], to[1], from[2]],
            [from[0], to[1], from[2]],
            [from[0], from[1], from[2]],
            [to[0], from[1], from[2]],
        ],
        Direction::South => [
            [from[0], to[1], to[2]],
            [to[0], to[1], to[2]],
            [to[0], from[1], to[2]],
            [from[0], from[1], to[2]],
        ],
        Direction::West => [
            [from[0], to[1], from[2]],
            [from[0], to[1], to[2]],
            [from[0], from[1], to[2]],
            [from[0], from[1], from[2]],
        ],
        Direction::East => [
            [to[0], to[1], to[2]],
            [to[0], to[1], from[2]],
            [to[0], from[1], from[2]],
            [to[0], from[1], to[2]],
        ],
    }
}

/// Rotate positions about the element's origin, then stretch the two axes
/// perpendicular to the rotation axis when rescaling.
fn apply_element_rotation(positions: &[[f32; 3]; 4], rotation: &ElementRotation) -> [[f32; 3]; 4] {
    let origin = Vec3::from_array(rotation.normalized_origin());
    let matrix = rotation.matrix();
    let rescale = rotation.rescale_factor();

    let scale = match rotation.axis {
        Axis::X => Vec3::new(1.0, rescale, rescale),
        Axis::Y => Vec3::new(rescale, 1.0, rescale),
        Axis::Z => Vec3::new(rescale, rescale, 1.0),
    };

    positions.map(|p| {
        let rotated = matrix * (Vec3::from_array(p) - origin);
        (rotated * scale + origin).to_array()
    })
}

fn rotate_normal(normal: [f32; 3], rotation: &ElementRotation) -> [f32; 3] {
    (rotation.matrix() * Vec3::from_array(normal))
        .normalize_or_zero()
        .to_array()
}
