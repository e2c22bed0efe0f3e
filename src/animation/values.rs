use glam::{Quat, Vec3};

/// A value that can be stored in a keyframe track and blended between keys.
pub trait Interpolatable: Copy + Clone + Sized {
    /// Value returned when a track holds no keys at all.
    const IDENTITY: Self;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    const IDENTITY: Self = 0.0;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        (end - start) * t + start
    }
}

impl Interpolatable for Vec3 {
    const IDENTITY: Self = Vec3::ZERO;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        (end - start) * t + start
    }
}

impl Interpolatable for Quat {
    const IDENTITY: Self = Quat::IDENTITY;

    /// Shortest-path spherical interpolation. `glam` flips `end` when the dot
    /// product is negative and normalizes its nlerp fallback, so the result
    /// is always a unit quaternion.
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t).normalize()
    }
}
