use bytemuck::{Pod, Zeroable};

/// Bones that can influence one skinned vertex.
pub const MAX_BONE_INFLUENCES: usize = 4;

/// Weights actually stored per vertex; the last one is implied by the others.
pub const STORED_BONE_WEIGHTS: usize = MAX_BONE_INFLUENCES - 1;

/// Static mesh vertex, laid out for direct upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub tangent: [f32; 4],
}

/// Skinned mesh vertex, laid out for direct upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub tangent: [f32; 3],
    pub bone_weights: [f32; STORED_BONE_WEIGHTS],
    pub bone_indices: [u8; MAX_BONE_INFLUENCES],
}

impl SkinnedVertex {
    /// All bone weights, completing the implied last one as `1 - sum(others)`.
    #[must_use]
    pub fn weights(&self) -> [f32; MAX_BONE_INFLUENCES] {
        let mut weights = [0.0; MAX_BONE_INFLUENCES];
        weights[..STORED_BONE_WEIGHTS].copy_from_slice(&self.bone_weights);
        weights[STORED_BONE_WEIGHTS] = 1.0 - self.bone_weights.iter().sum::<f32>();
        weights
    }
}
