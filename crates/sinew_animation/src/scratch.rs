//! Reusable buffers for skeleton evaluation.

use glam::Mat4;

/// Intermediate to-parent and to-root matrices of one evaluation.
///
/// Keeping a scratch per playing instance lets every tick reuse the same
/// allocations instead of building two fresh vectors.
#[derive(Debug, Default, Clone)]
pub struct PoseScratch {
    pub(crate) to_parent: Vec<Mat4>,
    pub(crate) to_root: Vec<Mat4>,
}

impl PoseScratch {
    #[must_use]
    pub fn with_bone_count(bone_count: usize) -> Self {
        Self {
            to_parent: Vec::with_capacity(bone_count),
            to_root: Vec::with_capacity(bone_count),
        }
    }

    /// Resizes both buffers to `bone_count` identity matrices.
    #[inline]
    pub fn begin(&mut self, bone_count: usize) {
        self.to_parent.clear();
        self.to_parent.resize(bone_count, Mat4::IDENTITY);
        self.to_root.clear();
        self.to_root.resize(bone_count, Mat4::IDENTITY);
    }

    /// To-root transforms of the last evaluation.
    #[inline]
    #[must_use]
    pub fn to_root(&self) -> &[Mat4] {
        &self.to_root
    }
}
