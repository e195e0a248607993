use std::ops::Range;

use glam::{Vec3, Vec4};

/// Surface description attached to one mesh subset.
#[derive(Debug, Clone, PartialEq)]
pub struct M3dMaterial {
    pub name: String,
    pub diffuse_albedo: Vec4,
    pub fresnel_r0: Vec3,
    pub roughness: f32,
    pub alpha_clip: bool,
    pub material_type: String,
    pub diffuse_map: String,
    pub normal_map: String,
}

impl Default for M3dMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse_albedo: Vec4::ONE,
            fresnel_r0: Vec3::splat(0.01),
            roughness: 0.8,
            alpha_clip: false,
            material_type: String::new(),
            diffuse_map: String::new(),
            normal_map: String::new(),
        }
    }
}

/// Contiguous run of vertices and triangles drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Subset {
    pub id: u32,
    pub vertex_start: u32,
    pub vertex_count: u32,
    pub face_start: u32,
    pub face_count: u32,
}

impl Subset {
    /// Range into the index buffer covering this subset's triangles.
    #[must_use]
    pub fn index_range(&self) -> Range<usize> {
        let start = self.face_start as usize * 3;
        start..start + self.face_count as usize * 3
    }

    #[must_use]
    pub fn vertex_range(&self) -> Range<usize> {
        let start = self.vertex_start as usize;
        start..start + self.vertex_count as usize
    }
}
