use glam::{Quat, Vec3};

/// A keyframe component that can be blended between two samples.
pub trait Interpolatable: Copy + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        shortest_arc_slerp(start, end, t)
    }
}

/// Spherical interpolation along the shorter of the two arcs.
///
/// `q` and `-q` encode the same orientation; when the inputs lie in opposite
/// hemispheres the end is negated first so the blend never turns the long way.
#[inline]
#[must_use]
pub fn shortest_arc_slerp(start: Quat, end: Quat, t: f32) -> Quat {
    let end = if start.dot(end) < 0.0 { -end } else { end };
    start.slerp(end, t)
}
