//! CSS-transform quads for renderers that draw faces as positioned elements.
//!
//! Each face becomes a `width`×`height` box plus a `matrix3d()` transform
//! that carries the box's corners onto the face's corners. CSS's y axis
//! points down, so world y is flipped.

use crate::mesher::{Diagnostic, GeometryResult, Material, TintCategory};
use glam::{Mat4, Vec3, Vec4};
use serde::Serialize;

/// CSS export options.
#[derive(Debug, Clone, Copy)]
pub struct CssOptions {
    /// Pixels per block.
    pub scale: f32,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self { scale: 64.0 }
    }
}

/// One face, ready to be placed as a transformed element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CssQuad {
    pub material: Material,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<TintCategory>,
    pub width: f32,
    pub height: f32,
    /// `matrix3d(...)` mapping the box's top-left, top-right and bottom-left
    /// onto the face.
    pub transform: String,
    /// UVs of the box corners: top-left, top-right, bottom-right, bottom-left.
    pub uvs: [[f32; 2]; 4],
}

impl CssQuad {
    /// UV rectangle from the top-left and bottom-right corners. Flips are
    /// kept as reversed bounds.
    pub fn uv_rect(&self) -> [f32; 4] {
        [self.uvs[0][0], self.uvs[0][1], self.uvs[2][0], self.uvs[2][1]]
    }
}

/// Convert every face of an element into a CSS quad.
pub fn css_quads(result: &GeometryResult, options: &CssOptions) -> Vec<CssQuad> {
    (0..result.face_count())
        .map(|face| {
            let base = face * 4;
            let corner = |i: usize| to_css(result.position(base + i), options.scale);
            let (c0, c1, c3) = (corner(0), corner(1), corner(3));
            let normal = to_css(result.normal(base), 1.0);

            let across = c1 - c0;
            let down = c3 - c0;
            let width = across.length();
            let height = down.length();

            let matrix = Mat4::from_cols(
                unit_or_zero(across, width).extend(0.0),
                unit_or_zero(down, height).extend(0.0),
                normal.extend(0.0),
                Vec4::new(c0.x, c0.y, c0.z, 1.0),
            );

            let index_start = (face * 6) as u32;
            let group = result
                .material_groups
                .iter()
                .find(|g| g.start <= index_start && index_start < g.start + g.count);

            CssQuad {
                material: group
                    .map(|g| g.material.clone())
                    .unwrap_or(Material::Diagnostic(Diagnostic::MissingTexture)),
                tint: group.and_then(|g| g.tint),
                width,
                height,
                transform: matrix3d(&matrix),
                uvs: [
                    result.uv(base),
                    result.uv(base + 1),
                    result.uv(base + 2),
                    result.uv(base + 3),
                ],
            }
        })
        .collect()
}

fn to_css(p: [f32; 3], scale: f32) -> Vec3 {
    Vec3::new(p[0], -p[1], p[2]) * scale
}

fn unit_or_zero(v: Vec3, length: f32) -> Vec3 {
    if length > 0.0 {
        v / length
    } else {
        Vec3::ZERO
    }
}

fn matrix3d(matrix: &Mat4) -> String {
    let values: Vec<String> = matrix
        .to_cols_array()
        .iter()
        .map(|v| {
            // Avoid "-0" in the output
            let v = if v.abs() < 1e-6 { 0.0 } else { *v };
            format!("{}", (v * 10000.0).round() / 10000.0)
        })
        .collect();
    format!("matrix3d({})", values.join(", "))
}
