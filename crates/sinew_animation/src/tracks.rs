use std::cmp::Ordering;

use glam::Mat4;

use crate::error::{AnimationError, Result};
use crate::keyframe::Keyframe;

/// Ordered keyframe track of a single bone.
///
/// Construction guarantees at least one keyframe and strictly increasing
/// times, so sampling never has to handle an empty or unordered track.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneAnimation {
    keyframes: Vec<Keyframe>,
}

impl BoneAnimation {
    pub fn new(keyframes: Vec<Keyframe>) -> Result<Self> {
        if keyframes.is_empty() {
            return Err(AnimationError::EmptyTrack);
        }

        for (index, pair) in keyframes.windows(2).enumerate() {
            // NaN compares as None and is rejected as well
            if pair[1].time.partial_cmp(&pair[0].time) != Some(Ordering::Greater) {
                return Err(AnimationError::NonIncreasingKeyframes {
                    index: index + 1,
                    previous: pair[0].time,
                    time: pair[1].time,
                });
            }
        }

        Ok(Self { keyframes })
    }

    /// A track holding a single pose for the whole clip.
    #[must_use]
    pub fn constant(keyframe: Keyframe) -> Self {
        Self {
            keyframes: vec![keyframe],
        }
    }

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    #[must_use]
    pub fn start_time(&self) -> f32 {
        self.first().time
    }

    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.last().time
    }

    /// Samples the local pose at `time`.
    ///
    /// Times outside the track clamp to the first or last keyframe; there is
    /// no extrapolation. Inside the track the bracketing pair is blended:
    /// translation and scale linearly, rotation by shortest-arc slerp.
    #[must_use]
    pub fn sample(&self, time: f32) -> Keyframe {
        let first = self.first();
        let last = self.last();

        if time.is_nan() || time <= first.time {
            return *first;
        }
        if time >= last.time {
            return *last;
        }

        // first index whose time is > `time`; in 1..len because of the clamps above
        let next_idx = self.keyframes.partition_point(|k| k.time <= time);
        let k0 = &self.keyframes[next_idx - 1];
        let k1 = &self.keyframes[next_idx];

        let factor = (time - k0.time) / (k1.time - k0.time);
        k0.blend(k1, factor, time)
    }

    /// Local to-parent matrix at `time`.
    #[inline]
    #[must_use]
    pub fn interpolate(&self, time: f32) -> Mat4 {
        self.sample(time).to_matrix()
    }

    fn first(&self) -> &Keyframe {
        &self.keyframes[0]
    }

    fn last(&self) -> &Keyframe {
        &self.keyframes[self.keyframes.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn key(time: f32, x: f32) -> Keyframe {
        Keyframe::new(time, Vec3::new(x, 0.0, 0.0), Vec3::ONE, Quat::IDENTITY)
    }

    #[test]
    fn rejects_empty_track() {
        assert_eq!(BoneAnimation::new(vec![]), Err(AnimationError::EmptyTrack));
    }

    #[test]
    fn rejects_repeated_time() {
        let err = BoneAnimation::new(vec![key(0.0, 0.0), key(1.0, 1.0), key(1.0, 2.0)]).unwrap_err();
        assert_eq!(
            err,
            AnimationError::NonIncreasingKeyframes {
                index: 2,
                previous: 1.0,
                time: 1.0
            }
        );
    }

    #[test]
    fn rejects_nan_time() {
        assert!(BoneAnimation::new(vec![key(0.0, 0.0), key(f32::NAN, 1.0)]).is_err());
    }

    #[test]
    fn sample_picks_bracketing_pair() {
        let track = BoneAnimation::new(vec![key(0.0, 0.0), key(1.0, 10.0), key(3.0, 30.0)]).unwrap();
        let pose = track.sample(2.0);
        assert!((pose.translation.x - 20.0).abs() < 1e-5);
        assert!((pose.time - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn nan_time_holds_first_pose() {
        let track = BoneAnimation::new(vec![key(0.0, 1.0), key(1.0, 2.0)]).unwrap();
        assert_eq!(track.sample(f32::NAN).translation.x, 1.0);
    }

    #[test]
    fn single_keyframe_is_constant() {
        let track = BoneAnimation::constant(key(0.5, 4.0));
        assert_eq!(track.sample(-3.0).translation.x, 4.0);
        assert_eq!(track.sample(100.0).translation.x, 4.0);
        assert_eq!(track.start_time(), track.end_time());
    }
}
