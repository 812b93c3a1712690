//! Transform types for whole-model and element rotations.

use super::{Axis, Direction};
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Whole-model rotation from a blockstate variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockstateRotation {
    /// X rotation in degrees (multiple of 90).
    #[serde(default, alias = "rotX")]
    pub x: i32,
    /// Y rotation in degrees (multiple of 90).
    #[serde(default, alias = "rotY")]
    pub y: i32,
    /// Z rotation in degrees (multiple of 90).
    #[serde(default, alias = "rotZ")]
    pub z: i32,
    /// If true, UV coordinates stay fixed in world space.
    #[serde(default)]
    pub uvlock: bool,
}

impl BlockstateRotation {
    pub fn new(x: i32, y: i32, uvlock: bool) -> Self {
        Self { x, y, z: 0, uvlock }
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// Check if this is an identity transform (no rotation).
    pub fn is_identity(&self) -> bool {
        self.x.rem_euclid(360) == 0 && self.y.rem_euclid(360) == 0 && self.z.rem_euclid(360) == 0
    }

    /// True if every angle is a whole number of quarter turns.
    pub fn is_quarter_turns(&self) -> bool {
        [self.x, self.y, self.z].iter().all(|angle| angle.rem_euclid(90) == 0)
    }

    /// Rotation matrix about the block center, X applied first, then Y, then Z.
    ///
    /// Angles are negated: blockstate rotations are clockwise when looking down
    /// the positive axis, glam rotations follow the right-hand rule.
    pub fn matrix(&self) -> Mat3 {
        let x_rot = Mat3::from_rotation_x((-self.x as f32).to_radians());
        let y_rot = Mat3::from_rotation_y((-self.y as f32).to_radians());
        let z_rot = Mat3::from_rotation_z((-self.z as f32).to_radians());
        z_rot * y_rot * x_rot
    }

    /// Rotate a point or vector given in block-centered coordinates.
    pub fn apply(&self, v: [f32; 3]) -> [f32; 3] {
        if self.is_identity() {
            return v;
        }
        (self.matrix() * Vec3::from_array(v)).to_array()
    }

    /// Direction a face ends up facing after this rotation.
    pub fn rotate_direction(&self, direction: Direction) -> Direction {
        Direction::from_vector(self.apply(direction.normal()))
    }
}

/// Element-level rotation from a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRotation {
    /// Origin point for rotation (in 0-16 model coordinates).
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    /// Axis to rotate around.
    pub axis: Axis,
    /// Rotation angle in degrees (-45 to 45, in 22.5 increments).
    pub angle: f32,
    /// Whether to stretch the rotated element back to the block's extent.
    #[serde(default)]
    pub rescale: bool,
}

fn default_origin() -> [f32; 3] {
    [8.0, 8.0, 8.0]
}

impl ElementRotation {
    /// Convert origin from model coordinates (0-16) to block-centered (-0.5 to 0.5).
    pub fn normalized_origin(&self) -> [f32; 3] {
        [
            self.origin[0] / 16.0 - 0.5,
            self.origin[1] / 16.0 - 0.5,
            self.origin[2] / 16.0 - 0.5,
        ]
    }

    /// Get the angle in radians.
    pub fn angle_radians(&self) -> f32 {
        self.angle.to_radians()
    }

    /// Scale applied to the two axes perpendicular to the rotation axis.
    /// `1/cos(angle)` when rescaling, so 45° stretches by √2.
    pub fn rescale_factor(&self) -> f32 {
        if self.rescale && self.angle != 0.0 {
            1.0 / self.angle_radians().cos()
        } else {
            1.0
        }
    }

    /// Rotation matrix for this element rotation.
    pub fn matrix(&self) -> Mat3 {
        let angle = self.angle_radians();
        match self.axis {
            Axis::X => Mat3::from_rotation_x(angle),
            Axis::Y => Mat3::from_rotation_y(angle),
            Axis::Z => Mat3::from_rotation_z(angle),
        }
    }
}
