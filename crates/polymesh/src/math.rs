//! Tolerance-based comparisons for mesh attributes.
//!
//! Vertex attributes are combined and split many times during editing, so
//! exact float equality is never meaningful here. Every comparison in the
//! kernel goes through these helpers.

use glam::{Vec2, Vec3, Vec4};

/// Default epsilon for attribute comparisons.
pub const COMPARE_EPSILON: f32 = 1e-4;

/// `true` if `a` and `b` differ by less than `eps`.
pub fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

/// Component-wise approximate equality for 2-vectors.
pub fn approx2(a: Vec2, b: Vec2, eps: f32) -> bool {
    approx(a.x, b.x, eps) && approx(a.y, b.y, eps)
}

/// Component-wise approximate equality for 3-vectors.
pub fn approx3(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx(a.x, b.x, eps) && approx(a.y, b.y, eps) && approx(a.z, b.z, eps)
}

/// Component-wise approximate equality for 4-vectors.
pub fn approx4(a: Vec4, b: Vec4, eps: f32) -> bool {
    approx(a.x, b.x, eps)
        && approx(a.y, b.y, eps)
        && approx(a.z, b.z, eps)
        && approx(a.w, b.w, eps)
}

/// Point on a circle of `radius` around `origin`, at `degrees` from +X.
pub fn point_in_circumference(radius: f32, degrees: f32, origin: Vec2) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(
        origin.x + radius * rad.cos(),
        origin.y + radius * rad.sin(),
    )
}
