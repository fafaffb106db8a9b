//! 2D vector helpers on top of `glam::Vec2`
//!
//! Length, add/sub, scaling and dot products come straight from `Vec2`.
//! The helpers here pin down the degenerate cases: every zero-length input
//! yields the zero vector rather than NaN.

use glam::Vec2;

const DIAG: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// The eight thrust directions a pursuer may choose from
pub const COMPASS: [Vec2; 8] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(DIAG, DIAG),
    Vec2::new(-DIAG, DIAG),
    Vec2::new(DIAG, -DIAG),
    Vec2::new(-DIAG, -DIAG),
];

/// Unit vector, or zero for a zero-length input
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    if len == 0.0 { Vec2::ZERO } else { v / len }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Unit vector pointing from `a` to `b`
#[inline]
pub fn direction(a: Vec2, b: Vec2) -> Vec2 {
    normalize(b - a)
}

/// Component of `a` along `b`; zero when `b` is zero
#[inline]
pub fn project(a: Vec2, b: Vec2) -> Vec2 {
    let bb = b.dot(b);
    if bb == 0.0 {
        return Vec2::ZERO;
    }
    b * (a.dot(b) / bb)
}

/// Component of `a` perpendicular to `b`
#[inline]
pub fn reject(a: Vec2, b: Vec2) -> Vec2 {
    a - project(a, b)
}
