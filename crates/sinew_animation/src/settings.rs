//! Skinning Output Settings
//!
//! Skeleton evaluation works in glam's column-vector convention:
//!
//! ```text
//! to_root[0] = to_parent[0]
//! to_root[i] = to_root[parent(i)] * to_parent[i]
//! skin[i]    = to_root[i] * offset[i]
//! ```
//!
//! which is the same product as the row-vector form
//! `offset[i] * to_parent[i] * to_root[parent(i)]` read right to left.
//! [`PaletteLayout`] decides how the resulting matrices are handed to the
//! consumer of the palette.

/// Memory layout of the matrices written into a skinning palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteLayout {
    /// Every skin matrix is transposed before it is stored.
    ///
    /// Yields row-major column-vector matrices, the palette layout expected
    /// by HLSL-style shaders that multiply `vector * matrix`.
    #[default]
    Transposed,

    /// Matrices are stored exactly as glam produces them (column-major).
    ///
    /// Suited to WGSL/GLSL consumers that multiply `matrix * vector`.
    ColumnMajor,
}

impl PaletteLayout {
    /// Applies the layout to a column-major skin matrix.
    #[inline]
    #[must_use]
    pub fn apply(self, skin: glam::Mat4) -> glam::Mat4 {
        match self {
            Self::Transposed => skin.transpose(),
            Self::ColumnMajor => skin,
        }
    }
}
