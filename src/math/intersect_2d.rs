//! 2D line-line intersection.

use super::vec_2d::cross_2d;
use super::{Point2, Vector2, TOLERANCE};

/// Intersects the line through `pt0` directed by `v0` with the line through
/// `pt1` directed by `v1`.
///
/// Directions are normalized first so the parallelism test is scale-free.
/// Returns `None` for parallel lines or a zero-length direction.
#[must_use]
pub fn line_line_intersect(pt0: &Point2, v0: &Vector2, pt1: &Point2, v1: &Vector2) -> Option<Point2> {
    let len0 = v0.norm();
    let len1 = v1.norm();
    if len0 == 0.0 || len1 == 0.0 {
        return None;
    }
    let n0 = v0 / len0;
    let n1 = v1 / len1;

    let determinant = cross_2d(&n1, &n0);
    if determinant.abs() < TOLERANCE {
        return None;
    }

    let t = cross_2d(&n1, &(pt1 - pt0)) / determinant;
    Some(pt0 + n0 * t)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn perpendicular_lines_cross() {
        let p = line_line_intersect(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::new(3.0, -5.0),
            &Vector2::new(0.0, 1.0),
        )
        .unwrap();
        assert!((p.x - 3.0).abs() < TOL, "x={}", p.x);
        assert!(p.y.abs() < TOL, "y={}", p.y);
    }

    #[test]
    fn oblique_lines_cross_at_known_point() {
        // y = x and y = -x + 4 cross at (2, 2).
        let p = line_line_intersect(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 1.0),
            &Point2::new(4.0, 0.0),
            &Vector2::new(-1.0, 1.0),
        )
        .unwrap();
        assert!((p.x - 2.0).abs() < TOL, "x={}", p.x);
        assert!((p.y - 2.0).abs() < TOL, "y={}", p.y);
    }

    #[test]
    fn parallel_lines_return_none() {
        let result = line_line_intersect(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 1.0),
            &Point2::new(0.0, 1.0),
            &Vector2::new(2.0, 2.0),
        );
        assert!(result.is_none());
    }

    #[test]
    fn normalization_makes_test_scale_free() {
        // Same lines as above with wildly different direction magnitudes.
        let p = line_line_intersect(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1e-8, 1e-8),
            &Point2::new(4.0, 0.0),
            &Vector2::new(-1e8, 1e8),
        )
        .unwrap();
        assert!((p.x - 2.0).abs() < TOL, "x={}", p.x);
        assert!((p.y - 2.0).abs() < TOL, "y={}", p.y);
    }

    #[test]
    fn zero_direction_returns_none() {
        let result = line_line_intersect(
            &Point2::new(0.0, 0.0),
            &Vector2::new(0.0, 0.0),
            &Point2::new(1.0, 1.0),
            &Vector2::new(1.0, 0.0),
        );
        assert!(result.is_none());
    }
}
