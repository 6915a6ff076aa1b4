//! 2D vector and point arithmetic helpers.
//!
//! Rotation vectors are unit complex numbers `(cos θ, sin θ)`: rotating by one
//! is a complex multiplication, and [`in_vectorial_reference`] is the matching
//! (unnormalized) complex division.
use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};

use super::{Point2, Vector2};

/// Builds a vector from polar coordinates (radius and angle in radians).
#[must_use]
pub fn polar(r: f64, angle: f64) -> Vector2 {
    Vector2::new(r * angle.cos(), r * angle.sin())
}

/// Returns a copy of `v` rotated 90° counter-clockwise.
#[must_use]
pub fn rotated_90_ccw(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// Returns a copy of `v` rotated 90° clockwise.
#[must_use]
pub fn rotated_90_cw(v: &Vector2) -> Vector2 {
    Vector2::new(v.y, -v.x)
}

/// Angle of `v` against the x-axis, wrapped into `[0, 2π)`.
#[must_use]
pub fn angle_0_2pi(v: &Vector2) -> f64 {
    let angle = v.y.atan2(v.x);
    if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}

/// Angle of `v` against the x-axis in `[-π, π]` (raw `atan2`).
#[must_use]
pub fn angle_minus_pi_pi(v: &Vector2) -> f64 {
    v.y.atan2(v.x)
}

/// Scalar 2D cross product `a × b`.
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Expresses `v` in the basis `{reference, reference⊥}` as `(v·ref, ref×v)`.
///
/// Measures the rotation of `v` relative to `reference` without computing an
/// angle. The result keeps the squared-length scale: dividing it by
/// `|v|·|reference|` yields a unit rotation vector.
#[must_use]
pub fn in_vectorial_reference(v: &Vector2, reference: &Vector2) -> Vector2 {
    Vector2::new(v.dot(reference), cross_2d(reference, v))
}

/// Rotates `p` about the origin by the rotation vector `rot`.
#[must_use]
pub fn rotated_by(p: &Point2, rot: &Vector2) -> Point2 {
    Point2::new(p.x * rot.x - p.y * rot.y, p.y * rot.x + p.x * rot.y)
}

/// Rotates the free vector `v` by the rotation vector `rot`.
#[must_use]
pub fn rotated_vector_by(v: &Vector2, rot: &Vector2) -> Vector2 {
    Vector2::new(v.x * rot.x - v.y * rot.y, v.y * rot.x + v.x * rot.y)
}

/// Returns a normalized copy of `v`.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] when the length is exactly zero.
pub fn normalized(v: &Vector2) -> Result<Vector2> {
    let len = v.norm();
    if len == 0.0 {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(v / len)
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(p: &Point2, q: &Point2) -> Point2 {
    Point2::new((p.x + q.x) / 2.0, (p.y + q.y) / 2.0)
}
