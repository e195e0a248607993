//! Skeletal animation for Sinew.
//!
//! Data flows leaves first: [`Keyframe`]s form a [`BoneAnimation`] track, one
//! track per bone forms an [`AnimationClip`], and a [`Skeleton`] owns the bone
//! hierarchy, the bind-pose offsets and its clips. An [`Instance`] plays one
//! clip of a shared skeleton and produces the per-bone skin matrices each tick.

pub mod clip;
pub mod error;
pub mod instance;
pub mod keyframe;
pub mod palette;
pub mod scratch;
pub mod settings;
pub mod skeleton;
pub mod tracks;
pub mod values;

pub use clip::AnimationClip;
pub use error::AnimationError;
pub use instance::{Instance, PlaybackState};
pub use keyframe::Keyframe;
pub use palette::{MAX_PALETTE_BONES, SkinningPalette};
pub use scratch::PoseScratch;
pub use settings::PaletteLayout;
pub use skeleton::Skeleton;
pub use tracks::BoneAnimation;
pub use values::{Interpolatable, shortest_arc_slerp};
