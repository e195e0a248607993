//! GPU-facing skinning palette.
//!
//! The renderer uploads bone transforms as one fixed-size uniform block; this
//! module owns that block so hosts only have to copy bytes.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::error::{AnimationError, Result};

/// Bone capacity of the skinning constant buffer.
pub const MAX_PALETTE_BONES: usize = 96;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SkinningPalette {
    pub bone_transforms: [[f32; 16]; MAX_PALETTE_BONES],
}

impl Default for SkinningPalette {
    fn default() -> Self {
        Self {
            bone_transforms: [Mat4::IDENTITY.to_cols_array(); MAX_PALETTE_BONES],
        }
    }
}

impl SkinningPalette {
    /// Copies `transforms` into a palette; unused slots stay identity.
    ///
    /// The matrices are copied as-is, so their layout is whatever the
    /// evaluation produced (see [`PaletteLayout`](crate::PaletteLayout)).
    pub fn from_transforms(transforms: &[Mat4]) -> Result<Self> {
        let mut palette = Self::default();
        palette.write(transforms)?;
        Ok(palette)
    }

    pub fn write(&mut self, transforms: &[Mat4]) -> Result<()> {
        if transforms.len() > MAX_PALETTE_BONES {
            return Err(AnimationError::PaletteOverflow {
                bones: transforms.len(),
                max: MAX_PALETTE_BONES,
            });
        }

        for (slot, transform) in self.bone_transforms.iter_mut().zip(transforms) {
            *slot = transform.to_cols_array();
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
