//! Face UV computation.
//!
//! UVs are worked out in Minecraft's 0-16 pixel space and only divided down
//! to 0-1 at the end, so mirrored rectangles (u1 > u2) keep their order.
//!
//! Each face direction has a canonical UV frame: the texture's u and v axes
//! expressed as block-space directions. Default UVs are the element bounds
//! projected through that frame, and uvlock re-projects rotated UVs through
//! the frame of the direction the face ends up on.

use crate::model::ModelFace;
use crate::types::{BlockstateRotation, Direction};

/// UV rectangle of a face in 0-16 space plus its quarter-turn rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceUv {
    /// [u1, v1, u2, v2]; order is kept, so u1 > u2 mirrors horizontally.
    pub rect: [f32; 4],
    /// One of 0, 90, 180, 270.
    pub rotation: i32,
}

impl FaceUv {
    /// Per-vertex UVs in face vertex order (top-left, top-right,
    /// bottom-right, bottom-left), with the rotation applied.
    pub fn corners(&self) -> [[f32; 2]; 4] {
        let [u1, v1, u2, v2] = self.rect;
        rotate_uvs([[u1, v1], [u2, v1], [u2, v2], [u1, v2]], self.rotation)
    }

    /// The rectangle divided into 0-1 texture space.
    pub fn normalized(&self) -> [f32; 4] {
        self.rect.map(|c| c / 16.0)
    }
}

/// Compute the UV rectangle for a face of the element spanning `from`..`to`.
pub fn compute_uv(face: &ModelFace, from: [f32; 3], to: [f32; 3], direction: Direction) -> FaceUv {
    FaceUv {
        rect: face.uv.unwrap_or_else(|| default_uv(direction, from, to)),
        rotation: face.rotation.rem_euclid(360),
    }
}

/// Default UV: the element's extent projected onto the face's plane.
pub fn default_uv(direction: Direction, from: [f32; 3], to: [f32; 3]) -> [f32; 4] {
    match direction {
        Direction::Down => [from[0], 16.0 - to[2], to[0], 16.0 - from[2]],
        Direction::Up => [from[0], from[2], to[0], to[2]],
        Direction::North => [16.0 - to[0], 16.0 - to[1], 16.0 - from[0], 16.0 - from[1]],
        Direction::South => [from[0], 16.0 - to[1], to[0], 16.0 - from[1]],
        Direction::West => [from[2], 16.0 - to[1], to[2], 16.0 - from[1]],
        Direction::East => [16.0 - to[2], 16.0 - to[1], 16.0 - from[2], 16.0 - from[1]],
    }
}

/// Rotate per-vertex UVs by cyclically shifting the corners.
pub fn rotate_uvs(uvs: [[f32; 2]; 4], rotation: i32) -> [[f32; 2]; 4] {
    let steps = ((rotation / 90) % 4 + 4) % 4;
    let mut result = uvs;
    for _ in 0..steps {
        result = [result[3], result[0], result[1], result[2]];
    }
    result
}

/// Canonical UV frame of a face direction in 0-16 block space:
/// `(origin, u_axis, v_axis)` such that `u = (p - origin)·u_axis` and
/// `v = (p - origin)·v_axis` reproduce [`default_uv`].
pub fn uv_frame(direction: Direction) -> ([f32; 3], [f32; 3], [f32; 3]) {
    match direction {
        Direction::Down => ([0.0, 0.0, 16.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        Direction::Up => ([0.0, 16.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        Direction::North => ([16.0, 16.0, 0.0], [-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
        Direction::South => ([0.0, 16.0, 16.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
        Direction::West => ([0.0, 16.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
        Direction::East => ([16.0, 16.0, 16.0], [0.0, 0.0, -1.0], [0.0, -1.0, 0.0]),
    }
}

/// Project a 0-16 block-space point through a direction's UV frame.
pub fn project_uv(direction: Direction, point: [f32; 3]) -> [f32; 2] {
    let (origin, u_axis, v_axis) = uv_frame(direction);
    let d = [
        point[0] - origin[0],
        point[1] - origin[1],
        point[2] - origin[2],
    ];
    [dot(d, u_axis), dot(d, v_axis)]
}

/// Compensate per-vertex UVs (0-16 space) for a uvlocked blockstate rotation.
///
/// Each UV is lifted onto the face plane through the model direction's
/// frame, rotated with the block, then projected through the frame of the
/// direction the face ends up on. Side faces under a pure Y rotation come
/// out unchanged; top and bottom faces turn against the block.
pub fn lock_uvs(
    uvs: [[f32; 2]; 4],
    direction: Direction,
    rotation: &BlockstateRotation,
) -> [[f32; 2]; 4] {
    if !rotation.uvlock || rotation.is_identity() {
        return uvs;
    }

    let world_direction = rotation.rotate_direction(direction);
    let (origin, u_axis, v_axis) = uv_frame(direction);

    uvs.map(|[u, v]| {
        let on_plane = [
            origin[0] + u * u_axis[0] + v * v_axis[0] - 8.0,
            origin[1] + u * u_axis[1] + v * v_axis[1] - 8.0,
            origin[2] + u * u_axis[2] + v * v_axis[2] - 8.0,
        ];
        let rotated = rotation.apply(on_plane);
        let [u, v] = project_uv(
            world_direction,
            [rotated[0] + 8.0, rotated[1] + 8.0, rotated[2] + 8.0],
        );
        // Snap float noise from the rotation matrix back onto the pixel grid
        [snap(u), snap(v)]
    })
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn snap(value: f32) -> f32 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
