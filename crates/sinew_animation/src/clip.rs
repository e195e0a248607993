use glam::Mat4;

use crate::error::{AnimationError, Result};
use crate::tracks::BoneAnimation;

/// A named animation such as "Walk" or "Attack".
///
/// Holds one [`BoneAnimation`] per skeleton bone, index-aligned with the
/// bone table of the skeleton that owns the clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    bone_animations: Vec<BoneAnimation>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, bone_animations: Vec<BoneAnimation>) -> Self {
        Self {
            name: name.into(),
            bone_animations,
        }
    }

    #[inline]
    #[must_use]
    pub fn bone_animations(&self) -> &[BoneAnimation] {
        &self.bone_animations
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bone_animations.len()
    }

    /// Earliest first-keyframe time over all bones.
    #[must_use]
    pub fn start_time(&self) -> f32 {
        self.time_range().0
    }

    /// Latest last-keyframe time over all bones.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.time_range().1
    }

    /// Union of the per-bone ranges; a clip without tracks spans `(0, 0)`.
    ///
    /// A bone whose track ends early keeps its final pose until the clip ends.
    #[must_use]
    pub fn time_range(&self) -> (f32, f32) {
        if self.bone_animations.is_empty() {
            return (0.0, 0.0);
        }

        self.bone_animations
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(start, end), track| {
                (start.min(track.start_time()), end.max(track.end_time()))
            })
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        let (start, end) = self.time_range();
        end - start
    }

    /// Evaluates every bone at `time` into `out`, one to-parent matrix per bone.
    pub fn interpolate_into(&self, time: f32, out: &mut [Mat4]) -> Result<()> {
        if out.len() != self.bone_animations.len() {
            return Err(AnimationError::BufferSizeMismatch {
                expected: self.bone_animations.len(),
                actual: out.len(),
            });
        }

        for (slot, track) in out.iter_mut().zip(&self.bone_animations) {
            *slot = track.interpolate(time);
        }
        Ok(())
    }
}
