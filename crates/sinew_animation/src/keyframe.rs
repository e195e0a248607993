use glam::{Mat4, Quat, Vec3};

use crate::values::Interpolatable;

/// One timestamped local pose sample of a bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub translation: Vec3,
    pub scale: Vec3,
    pub rotation: Quat,
}

impl Default for Keyframe {
    fn default() -> Self {
        Self {
            time: 0.0,
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Keyframe {
    #[must_use]
    pub fn new(time: f32, translation: Vec3, scale: Vec3, rotation: Quat) -> Self {
        Self {
            time,
            translation,
            scale,
            rotation,
        }
    }

    /// Affine to-parent matrix: scale first, then rotate, then translate.
    #[inline]
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Blends two poses at factor `t` in `[0, 1]`, stamping the result with `time`.
    #[must_use]
    pub fn blend(&self, other: &Self, t: f32, time: f32) -> Self {
        Self {
            time,
            translation: Vec3::interpolate_linear(self.translation, other.translation, t),
            scale: Vec3::interpolate_linear(self.scale, other.scale, t),
            rotation: Quat::interpolate_linear(self.rotation, other.rotation, t),
        }
    }
}
