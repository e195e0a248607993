//! Loader configuration.

/// How strictly the label tokens preceding every field are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPolicy {
    /// A label must be a non-numeric token. Tolerates exporters that spell
    /// labels differently while still catching a shifted token stream.
    #[default]
    Shape,
    /// A label must equal its canonical text, ignoring ASCII case and a
    /// trailing `:`. Section banners are compared with their `*` padding removed.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub label_policy: LabelPolicy,
    /// Normalize keyframe rotations so slerp always sees unit quaternions.
    pub normalize_rotations: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            label_policy: LabelPolicy::Shape,
            normalize_rotations: true,
        }
    }
}

impl LoadOptions {
    #[must_use]
    pub fn strict() -> Self {
        Self {
            label_policy: LabelPolicy::Exact,
            ..Self::default()
        }
    }
}
