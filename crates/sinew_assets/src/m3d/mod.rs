//! The m3d text scene format: meshes, materials and skinned animation.

mod loader;
mod tokens;

pub use loader::{M3dLoader, SkinnedModel, StaticModel, load};
