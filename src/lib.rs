//! Sinew: skeletal animation with an m3d scene loader.
//!
//! The umbrella crate re-exports the subsystem crates:
//!
//! - [`animation`]: keyframe tracks, clips, [`Skeleton`] evaluation and
//!   per-object [`Instance`] playback.
//! - [`assets`]: the m3d loader producing a [`SkinnedModel`] or [`StaticModel`].

pub mod errors;

pub use glam;
pub use sinew_animation as animation;
pub use sinew_assets as assets;

pub use animation::{
    AnimationClip, AnimationError, BoneAnimation, Instance, Keyframe, MAX_PALETTE_BONES, PaletteLayout,
    PlaybackState, PoseScratch, Skeleton, SkinningPalette,
};
pub use assets::{LabelPolicy, LoadError, LoadOptions, M3dLoader, ParseError, SkinnedModel, StaticModel};
pub use errors::{Result, SinewError};
