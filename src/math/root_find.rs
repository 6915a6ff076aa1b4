//! Hybrid scalar root-finding (Brent's method).

use super::{Point2, TOLERANCE};

/// Locates `x` such that `f(x) = yc` inside the signed search region starting
/// at `x0` and spanning `dx`.
///
/// `dx` may be infinite: the bracket is then grown by exponential doubling
/// from `x0` in the sign direction of `dx` until `f` changes sign relative to
/// `yc`, giving an unbounded search. `x_ref` sets the length scale of the
/// problem: convergence stops once the bracket width drops below
/// `x_ref * TOLERANCE`, and the doubling search gives up once its step dwarfs
/// `x_ref` beyond any representable refinement.
///
/// Once bracketed, the root is polished with Brent's hybrid iteration:
/// inverse quadratic interpolation when the three retained function values are
/// pairwise distinct, the secant formula otherwise, and a bisection fallback
/// whenever the candidate leaves `[(3a+b)/4, b]` or fails to shrink the
/// bracket fast enough (the classic toggled-flag safeguard). A stagnation
/// guard returns the best estimate if the bracket width stays numerically
/// identical for more than 3 consecutive iterations.
///
/// `by_excess` selects which side of the root is reported once converged:
/// `None` returns the best estimate `b`, `Some(true)` the bracket endpoint
/// with the larger function value, `Some(false)` the one with the smaller.
///
/// Returns `Some(Point2::new(x, f(x)))`, or `None` when the region does not
/// bracket a sign change (or the unbounded search diverges).
pub fn brent_function_value(
    x0: f64,
    dx: f64,
    yc: f64,
    x_ref: f64,
    f: impl Fn(f64) -> f64,
    by_excess: Option<bool>,
) -> Option<Point2> {
    let mut a = x0;
    let mut fa = f(a) - yc;
    let mut b;
    let mut fb;

    if dx.is_infinite() {
        let mut delta = x_ref.copysign(dx);
        loop {
            b = a + delta;
            fb = f(b) - yc;
            delta *= 2.0;

            // The step has outgrown the reference scale: no sign change
            // exists within a representable range.
            if x_ref / (delta * 100.0).abs() < TOLERANCE {
                return None;
            }
            if fa * fb <= 0.0 {
                break;
            }
        }
    } else {
        b = x0 + dx;
        fb = f(b) - yc;
    }

    if fa * fb >= 0.0 {
        if fa == 0.0 {
            return Some(Point2::new(a, f(a)));
        } else if fb == 0.0 {
            return Some(Point2::new(b, f(b)));
        }
        return None;
    }

    let epsilon_x_ref = x_ref * TOLERANCE;

    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = 0.0;
    let mut previous_gap = f64::INFINITY;
    let mut identical_iterations = 0_u32;
    let mut flag = true;

    while !(fb == 0.0 || previous_gap < epsilon_x_ref || identical_iterations > 3) {
        let mut s = if fa != fc && fb != fc {
            // Inverse quadratic interpolation.
            a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb))
        } else {
            // Secant step.
            b - fb * (b - a) / (fb - fa)
        };

        if s < (3.0 * a + b) / 4.0
            || s > b
            || (flag && (s - b).abs() >= (b - c).abs() / 2.0)
            || (!flag && (s - b).abs() >= (c - d).abs() / 2.0)
        {
            s = (a + b) / 2.0;
            flag = true;
        } else {
            flag = false;
        }

        let fs = f(s) - yc;
        d = c;
        c = b;
        fc = fb;

        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }

        let gap = (b - a).abs();
        if previous_gap == gap {
            identical_iterations += 1;
        } else {
            previous_gap = gap;
            identical_iterations = 0;
        }
    }

    let x = match by_excess {
        None => b,
        Some(true) => {
            if fa > fb {
                a
            } else {
                b
            }
        }
        Some(false) => {
            if fa < fb {
                a
            } else {
                b
            }
        }
    };
    Some(Point2::new(x, f(x)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn finite_interval() {
        let f = |x: f64| x * x - 4.0;
        let result = brent_function_value(0.0, 5.0, 0.0, 1.0, f, None).unwrap();
        assert!((result.x - 2.0).abs() < TOL, "x={}", result.x);
        assert!(result.y.abs() < TOL, "y={}", result.y);
    }

    #[test]
    fn infinite_interval_uses_doubling_search() {
        let f = |x: f64| x * x - 4.0;
        let result = brent_function_value(0.0, f64::INFINITY, 0.0, 1.0, f, None).unwrap();
        assert!((result.x - 2.0).abs() < TOL, "x={}", result.x);
        assert!(result.y.abs() < TOL, "y={}", result.y);
    }

    #[test]
    fn negative_infinite_interval() {
        let f = |x: f64| x * x - 4.0;
        let result = brent_function_value(0.0, f64::NEG_INFINITY, 0.0, 1.0, f, None).unwrap();
        assert!((result.x + 2.0).abs() < TOL, "x={}", result.x);
    }

    #[test]
    fn by_excess_reports_upper_side() {
        let f = |x: f64| x * x - 4.0;
        let result = brent_function_value(0.0, 5.0, 0.0, 1.0, f, Some(true)).unwrap();
        assert!((result.x - 2.0).abs() < TOL, "x={}", result.x);
        // Upper side: the reported value sits at or above the target.
        assert!(result.y >= -TOL, "y={}", result.y);
    }

    #[test]
    fn by_default_reports_lower_side() {
        let f = |x: f64| x * x - 4.0;
        let result = brent_function_value(0.0, 5.0, 0.0, 1.0, f, Some(false)).unwrap();
        assert!((result.x - 2.0).abs() < TOL, "x={}", result.x);
        assert!(result.y <= TOL, "y={}", result.y);
    }

    #[test]
    fn no_root_returns_none() {
        let f = |x: f64| x * x + 4.0;
        assert!(brent_function_value(0.0, 5.0, 0.0, 1.0, f, None).is_none());
    }

    #[test]
    fn unbounded_search_without_sign_change_gives_up() {
        // Strictly positive, monotonically growing: no root anywhere.
        let f = |x: f64| x.exp() + 1.0;
        assert!(brent_function_value(0.0, f64::INFINITY, 0.0, 1.0, f, None).is_none());
    }

    #[test]
    fn nonzero_target_value() {
        let f = |x: f64| x * x;
        let result = brent_function_value(0.0, 5.0, 9.0, 1.0, f, None).unwrap();
        assert!((result.x - 3.0).abs() < TOL, "x={}", result.x);
        assert!((result.y - 9.0).abs() < TOL, "y={}", result.y);
    }

    #[test]
    fn exact_root_at_endpoint() {
        let f = |x: f64| x * x - 4.0;
        let result = brent_function_value(2.0, 5.0, 0.0, 1.0, f, None).unwrap();
        assert!((result.x - 2.0).abs() < TOL);
        assert!(result.y.abs() < TOL);
    }
}
