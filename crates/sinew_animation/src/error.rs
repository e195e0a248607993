//! Animation Error Types
//!
//! Every invariant of the animation model is checked when the data is built
//! (keyframe ordering, track counts, hierarchy order), so evaluation can only
//! fail on a clip lookup or a wrongly sized caller buffer.

use thiserror::Error;

/// Errors produced while building or evaluating skeletal animation data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// Evaluation was requested for a clip that the skeleton does not own.
    #[error("Unknown animation clip: {0:?}")]
    UnknownClip(String),

    // ========================================================================
    // Degenerate Animation Data
    // ========================================================================
    /// A bone track without any keyframe.
    #[error("Bone animation has no keyframes")]
    EmptyTrack,

    /// Keyframe times must be strictly increasing.
    #[error("Keyframe {index} at time {time} does not come after the previous keyframe at {previous}")]
    NonIncreasingKeyframes {
        /// Index of the offending keyframe
        index: usize,
        /// Time of the keyframe before it
        previous: f32,
        /// Time of the offending keyframe
        time: f32,
    },

    /// A clip must carry exactly one track per skeleton bone.
    #[error("Clip {clip:?} has {tracks} bone tracks but the skeleton has {bones} bones")]
    ClipTrackCountMismatch {
        clip: String,
        tracks: usize,
        bones: usize,
    },

    /// Two clips share a name.
    #[error("Duplicate animation clip name: {0:?}")]
    DuplicateClip(String),

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// The parent table and the offset table disagree on the bone count.
    #[error("Skeleton has {parents} parent entries but {offsets} bone offsets")]
    BoneCountMismatch { parents: usize, offsets: usize },

    /// Bone 0 is the root and must not name a parent.
    #[error("Root bone must not have a parent, found parent index {0}")]
    InvalidRootParent(i32),

    /// Every non-root bone must reference a parent stored before it.
    #[error("Bone {bone} references parent {parent}, parents must precede their children")]
    HierarchyOrder { bone: usize, parent: i32 },

    // ========================================================================
    // Output Buffer Errors
    // ========================================================================
    /// A caller supplied buffer does not match the bone count.
    #[error("Output buffer holds {actual} transforms, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Too many bones for the fixed-size skinning palette.
    #[error("Skinning palette holds at most {max} bones, got {bones}")]
    PaletteOverflow { bones: usize, max: usize },
}

/// Alias for `Result<T, AnimationError>`.
pub type Result<T> = std::result::Result<T, AnimationError>;
