use std::sync::Arc;

use glam::Mat4;

use crate::error::Result;
use crate::scratch::PoseScratch;
use crate::settings::PaletteLayout;
use crate::skeleton::Skeleton;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Time is zero and nothing has been evaluated since the clip was set.
    Idle,
    /// At least one tick has advanced the clip.
    Playing,
}

/// Per-object playback cursor over a shared [`Skeleton`].
///
/// The skeleton is held through an `Arc`, so it lives at least as long as
/// every instance that plays it. An instance itself is single-owner state.
#[derive(Debug, Clone)]
pub struct Instance {
    skeleton: Arc<Skeleton>,
    clip: String,
    time: f32,
    state: PlaybackState,
    layout: PaletteLayout,

    final_transforms: Vec<Mat4>,
    scratch: PoseScratch,
}

impl Instance {
    pub fn new(skeleton: Arc<Skeleton>, clip: impl Into<String>) -> Result<Self> {
        let clip = clip.into();
        skeleton.clip(&clip)?;

        let bone_count = skeleton.bone_count();
        Ok(Self {
            skeleton,
            clip,
            time: 0.0,
            state: PlaybackState::Idle,
            layout: PaletteLayout::default(),
            // identity until the first tick
            final_transforms: vec![Mat4::IDENTITY; bone_count],
            scratch: PoseScratch::with_bone_count(bone_count),
        })
    }

    #[must_use]
    pub fn with_layout(mut self, layout: PaletteLayout) -> Self {
        self.layout = layout;
        self
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    #[inline]
    #[must_use]
    pub fn clip_name(&self) -> &str {
        &self.clip
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn layout(&self) -> PaletteLayout {
        self.layout
    }

    /// Skin matrices computed by the last tick, one per bone.
    #[inline]
    #[must_use]
    pub fn final_transforms(&self) -> &[Mat4] {
        &self.final_transforms
    }

    /// Switches to another clip and rewinds to the idle state.
    ///
    /// On error the current clip keeps playing untouched.
    pub fn set_clip(&mut self, clip: &str) -> Result<()> {
        self.skeleton.clip(clip)?;
        self.clip.clear();
        self.clip.push_str(clip);
        self.reset();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
        self.state = PlaybackState::Idle;
    }

    /// Advances playback by `dt` seconds and re-evaluates the pose.
    ///
    /// Past the clip end the time snaps back to exactly zero. This is a hard
    /// reset, not a modulo wrap, so the overshoot is dropped and the pose pops
    /// to the start of the clip.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        let end_time = self.skeleton.clip_end_time(&self.clip)?;

        self.state = PlaybackState::Playing;
        self.time += dt;
        if self.time > end_time {
            log::trace!("Clip {:?} looped at {:.3}s (end {:.3}s)", self.clip, self.time, end_time);
            self.time = 0.0;
        }

        self.skeleton.evaluate_into(
            &self.clip,
            self.time,
            self.layout,
            &mut self.scratch,
            &mut self.final_transforms,
        )
    }
}
