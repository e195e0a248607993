use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::clip::AnimationClip;
use crate::error::{AnimationError, Result};
use crate::scratch::PoseScratch;
use crate::settings::PaletteLayout;

/// Bone hierarchy, bind-pose offsets and the clips that animate them.
///
/// Bones are stored in topological order: bone 0 is the root and every other
/// bone's parent has a smaller index, so a single forward pass resolves each
/// parent before its children. The constructor enforces this together with
/// the clip invariants; a built skeleton is immutable and can be shared
/// between any number of [`Instance`](crate::Instance)s.
#[derive(Debug, Clone)]
pub struct Skeleton {
    parents: Vec<Option<usize>>,
    // Bind-pose vertex space -> bone local space
    bone_offsets: Vec<Mat4>,
    clips: FxHashMap<String, AnimationClip>,
}

impl Skeleton {
    /// Builds and validates a skeleton.
    ///
    /// `parents[i]` is the parent index of bone `i`; the root stores a
    /// negative index (conventionally `-1`).
    pub fn new(
        parents: Vec<i32>,
        bone_offsets: Vec<Mat4>,
        clips: impl IntoIterator<Item = AnimationClip>,
    ) -> Result<Self> {
        if parents.len() != bone_offsets.len() {
            return Err(AnimationError::BoneCountMismatch {
                parents: parents.len(),
                offsets: bone_offsets.len(),
            });
        }

        let parents = validate_hierarchy(&parents)?;
        let bone_count = parents.len();

        let mut clip_map = FxHashMap::default();
        for clip in clips {
            if clip.bone_count() != bone_count {
                return Err(AnimationError::ClipTrackCountMismatch {
                    clip: clip.name.clone(),
                    tracks: clip.bone_count(),
                    bones: bone_count,
                });
            }
            if clip_map.contains_key(&clip.name) {
                return Err(AnimationError::DuplicateClip(clip.name));
            }
            clip_map.insert(clip.name.clone(), clip);
        }

        Ok(Self {
            parents,
            bone_offsets,
            clips: clip_map,
        })
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.parents.len()
    }

    /// Parent of `bone`, `None` for the root or an out-of-range index.
    #[inline]
    #[must_use]
    pub fn parent(&self, bone: usize) -> Option<usize> {
        self.parents.get(bone).copied().flatten()
    }

    #[inline]
    #[must_use]
    pub fn bone_offsets(&self) -> &[Mat4] {
        &self.bone_offsets
    }

    pub fn clip(&self, name: &str) -> Result<&AnimationClip> {
        self.clips
            .get(name)
            .ok_or_else(|| AnimationError::UnknownClip(name.to_string()))
    }

    #[inline]
    #[must_use]
    pub fn has_clip(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    /// Clip names in no particular order.
    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn clip_time_range(&self, name: &str) -> Result<(f32, f32)> {
        Ok(self.clip(name)?.time_range())
    }

    pub fn clip_start_time(&self, name: &str) -> Result<f32> {
        Ok(self.clip(name)?.start_time())
    }

    pub fn clip_end_time(&self, name: &str) -> Result<f32> {
        Ok(self.clip(name)?.end_time())
    }

    /// Final skin matrices of `clip` at `time`, in the default palette layout.
    pub fn evaluate(&self, clip: &str, time: f32) -> Result<Vec<Mat4>> {
        self.evaluate_with(clip, time, PaletteLayout::default())
    }

    pub fn evaluate_with(&self, clip: &str, time: f32, layout: PaletteLayout) -> Result<Vec<Mat4>> {
        let mut scratch = PoseScratch::with_bone_count(self.bone_count());
        let mut out = Vec::with_capacity(self.bone_count());
        self.evaluate_into(clip, time, layout, &mut scratch, &mut out)?;
        Ok(out)
    }

    /// Evaluates `clip` at `time` into `out`, reusing the buffers in `scratch`.
    ///
    /// `out` is resized to the bone count. After the call `scratch.to_root()`
    /// holds the model-space pose of every bone.
    pub fn evaluate_into(
        &self,
        clip: &str,
        time: f32,
        layout: PaletteLayout,
        scratch: &mut PoseScratch,
        out: &mut Vec<Mat4>,
    ) -> Result<()> {
        let clip = self.clip(clip)?;
        let bone_count = self.bone_count();

        scratch.begin(bone_count);
        clip.interpolate_into(time, &mut scratch.to_parent)?;

        // Parents precede children, so one forward pass resolves the chain.
        for bone in 0..bone_count {
            let to_parent = scratch.to_parent[bone];
            scratch.to_root[bone] = match self.parents[bone] {
                Some(parent) => scratch.to_root[parent] * to_parent,
                None => to_parent,
            };
        }

        out.clear();
        out.extend(
            scratch
                .to_root
                .iter()
                .zip(&self.bone_offsets)
                .map(|(to_root, offset)| layout.apply(*to_root * *offset)),
        );
        Ok(())
    }
}

fn validate_hierarchy(parents: &[i32]) -> Result<Vec<Option<usize>>> {
    let mut resolved = Vec::with_capacity(parents.len());

    for (bone, &parent) in parents.iter().enumerate() {
        if bone == 0 {
            if parent >= 0 {
                return Err(AnimationError::InvalidRootParent(parent));
            }
            resolved.push(None);
            continue;
        }

        match usize::try_from(parent) {
            Ok(index) if index < bone => resolved.push(Some(index)),
            _ => return Err(AnimationError::HierarchyOrder { bone, parent }),
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Keyframe;
    use crate::tracks::BoneAnimation;

    fn still_clip(name: &str, bones: usize) -> AnimationClip {
        let tracks = (0..bones)
            .map(|_| BoneAnimation::constant(Keyframe::default()))
            .collect();
        AnimationClip::new(name, tracks)
    }

    #[test]
    fn rejects_child_before_parent() {
        let err = Skeleton::new(vec![-1, 2, 0], vec![Mat4::IDENTITY; 3], []).unwrap_err();
        assert_eq!(err, AnimationError::HierarchyOrder { bone: 1, parent: 2 });
    }

    #[test]
    fn rejects_self_parent() {
        let err = Skeleton::new(vec![-1, 1], vec![Mat4::IDENTITY; 2], []).unwrap_err();
        assert_eq!(err, AnimationError::HierarchyOrder { bone: 1, parent: 1 });
    }

    #[test]
    fn rejects_root_with_parent() {
        let err = Skeleton::new(vec![0], vec![Mat4::IDENTITY], []).unwrap_err();
        assert_eq!(err, AnimationError::InvalidRootParent(0));
    }

    #[test]
    fn rejects_negative_non_root_parent() {
        let err = Skeleton::new(vec![-1, -1], vec![Mat4::IDENTITY; 2], []).unwrap_err();
        assert_eq!(err, AnimationError::HierarchyOrder { bone: 1, parent: -1 });
    }

    #[test]
    fn rejects_offset_count_mismatch() {
        let err = Skeleton::new(vec![-1, 0], vec![Mat4::IDENTITY], []).unwrap_err();
        assert_eq!(err, AnimationError::BoneCountMismatch { parents: 2, offsets: 1 });
    }

    #[test]
    fn rejects_clip_with_wrong_track_count() {
        let err = Skeleton::new(vec![-1, 0], vec![Mat4::IDENTITY; 2], [still_clip("Idle", 1)]).unwrap_err();
        assert_eq!(
            err,
            AnimationError::ClipTrackCountMismatch {
                clip: "Idle".to_string(),
                tracks: 1,
                bones: 2
            }
        );
    }

    #[test]
    fn rejects_duplicate_clip_names() {
        let err = Skeleton::new(
            vec![-1],
            vec![Mat4::IDENTITY],
            [still_clip("Run", 1), still_clip("Run", 1)],
        )
        .unwrap_err();
        assert_eq!(err, AnimationError::DuplicateClip("Run".to_string()));
    }

    #[test]
    fn empty_skeleton_evaluates_to_empty_palette() {
        let skeleton = Skeleton::new(vec![], vec![], [still_clip("Bind", 0)]).unwrap();
        assert!(skeleton.evaluate("Bind", 0.0).unwrap().is_empty());
        assert_eq!(skeleton.clip_time_range("Bind").unwrap(), (0.0, 0.0));
    }

    #[test]
    fn parent_lookup() {
        let skeleton = Skeleton::new(vec![-1, 0, 1], vec![Mat4::IDENTITY; 3], []).unwrap();
        assert_eq!(skeleton.parent(0), None);
        assert_eq!(skeleton.parent(2), Some(1));
        assert_eq!(skeleton.parent(7), None);
    }
}
