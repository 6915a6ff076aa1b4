use crate::error::{GeometryError, LandXmlError, Result};
use crate::landxml::{xml_utils, XmlElementRead, XmlElementWrite};
use crate::math::intersect_2d::line_line_intersect;
use crate::math::root_find::brent_function_value;
use crate::math::vec_2d::{in_vectorial_reference, normalized, polar, rotated_90_cw, rotated_by, rotated_vector_by};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{AlignmentKind, Extremities, HorizontalAlignment};

/// Relative tolerance of the chord-matching fixed-point iteration.
const CHORD_CONVERGENCE: f64 = 1e-14;

/// A clothoid (Euler spiral) transition segment.
///
/// Curvature varies linearly with arc length: `κ(s) = (s₀+s)/(A·|A|)` where
/// `A` is the clothoid parameter (its sign encodes the direction of the
/// curvature change) and `s₀` the abscissa of the segment start on the
/// canonical clothoid. A rotation vector and a translation vector map the
/// canonical local frame onto the global frame.
#[derive(Debug, Clone)]
pub struct ClothoidTransition {
    parameter: f64,
    start_abscissa: f64,
    length: f64,
    rotation: Vector2,
    translation: Vector2,
    extremities: Extremities,
}

impl ClothoidTransition {
    /// Creates a transition from its raw parameters.
    ///
    /// `rotation` must be a unit rotation vector; the constructive solvers
    /// below derive all five parameters from boundary conditions.
    #[must_use]
    pub fn new(
        parameter: f64,
        start_abscissa: f64,
        length: f64,
        rotation: Vector2,
        translation: Vector2,
    ) -> Self {
        let mut alignment = Self {
            parameter,
            start_abscissa,
            length,
            rotation,
            translation,
            extremities: Extremities::SEED,
        };
        alignment.extremities = Extremities::of(&alignment);
        alignment
    }

    /// Solves for the clothoid whose endpoints are separated by exactly
    /// `chord`, with fixed curvatures at both ends.
    ///
    /// Fixed-point iteration on the developed length: starting from the chord
    /// length, the clothoid parameters are recomputed, the achieved chord
    /// measured, and the length corrected by the shortfall until the relative
    /// correction drops below 1e-14. Returns `None` for equal boundary
    /// curvatures (the segment would be an arc or a straight), a zero chord,
    /// or a non-converging iteration.
    #[must_use]
    pub fn from_vector_and_curvatures(
        starting_point: &Point2,
        chord: &Vector2,
        starting_curvature: f64,
        ending_curvature: f64,
    ) -> Option<Self> {
        if ending_curvature == starting_curvature {
            return None;
        }
        let target = chord.norm();
        if target == 0.0 {
            return None;
        }

        let mut length = target;
        let mut correction = 0.0;
        for _ in 0..200 {
            length += correction;
            let a_squared = length / (ending_curvature - starting_curvature);
            let parameter = a_squared.abs().sqrt() * if a_squared > 0.0 { 1.0 } else { -1.0 };
            let start_abscissa = a_squared * starting_curvature;

            let local_start = local_point(start_abscissa, parameter);
            let local_end = local_point(start_abscissa + length, parameter);
            let orientation = local_end - local_start;
            let achieved = orientation.norm();
            correction = target - achieved;

            if (correction / length).abs() < CHORD_CONVERGENCE {
                // Unit rotation mapping the achieved local chord onto the
                // target chord (a complex division by the local chord).
                let rotation = in_vectorial_reference(chord, &orientation) / (achieved * achieved);
                let rotated_start = rotated_by(&local_start, &rotation);
                let translation = starting_point - rotated_start;
                return Some(Self::new(
                    parameter,
                    start_abscissa,
                    length,
                    rotation,
                    translation,
                ));
            }
        }
        None
    }

    /// Solves for the clothoid leaving the straight through `origin` directed
    /// by `direction` (tangent, zero curvature at the start) and ending at
    /// `point`.
    ///
    /// Returns `None` when `point` lies behind the origin or on the straight,
    /// or no clothoid reaches it.
    #[must_use]
    pub fn from_align_to_point(origin: &Point2, direction: &Vector2, point: &Point2) -> Option<Self> {
        let dir = normalized(direction).ok()?;
        let q = in_vectorial_reference(&(point - origin), &dir);
        if q.x <= 0.0 || q.y == 0.0 {
            return None;
        }

        let (s_unit, x_unit) = solve_unit_abscissa((q.y / q.x).abs())?;
        let scale = q.x / x_unit;
        let parameter = scale.copysign(q.y);
        Some(Self::new(
            parameter,
            0.0,
            s_unit * scale,
            dir,
            origin.coords,
        ))
    }

    /// Solves for the clothoid starting at `point` and ending on the straight
    /// through `origin` directed by `direction`, tangent to it with zero
    /// curvature at the end.
    ///
    /// Returns `None` when `point` lies ahead of the origin or on the
    /// straight, or no clothoid reaches it.
    #[must_use]
    pub fn from_point_to_align(point: &Point2, origin: &Point2, direction: &Vector2) -> Option<Self> {
        let dir = normalized(direction).ok()?;
        let q = in_vectorial_reference(&(point - origin), &dir);
        if q.x >= 0.0 || q.y == 0.0 {
            return None;
        }

        let (s_unit, x_unit) = solve_unit_abscissa((q.y / q.x).abs())?;
        let scale = -q.x / x_unit;
        let parameter = -scale.copysign(q.y);
        Some(Self::new(
            parameter,
            -s_unit * scale,
            s_unit * scale,
            dir,
            origin.coords,
        ))
    }

    /// Returns the clothoid parameter `A`.
    #[must_use]
    pub fn parameter(&self) -> f64 {
        self.parameter
    }

    /// Point of tangent intersection: where the start and end tangent rays
    /// meet when extended. Serialization-only; `None` for parallel tangents.
    #[must_use]
    pub fn pi(&self) -> Option<Point2> {
        line_line_intersect(
            &self.starting_point(),
            &self.starting_tangent(),
            &self.ending_point(),
            &self.ending_tangent(),
        )
    }

    /// Deserializes a `<Spiral>` element.
    ///
    /// The geometry is reconstructed from the boundary points and the signed
    /// curvatures implied by `rot` and the radii (`INF`/`-INF` mean zero
    /// curvature); `length` is validated but the developed length is
    /// recomputed.
    ///
    /// # Errors
    ///
    /// Fails on a missing or malformed attribute or boundary point, a zero
    /// radius, `rot` outside `{cw, ccw}`, a `spiType` other than `clothoid`,
    /// or boundary data no clothoid can match.
    pub fn read_landxml(element: &dyn XmlElementRead) -> Result<Self> {
        let invalid = |attribute: &str, value: String, expected: &'static str| {
            LandXmlError::InvalidAttribute {
                attribute: attribute.to_string(),
                element: element.name().to_string(),
                value,
                expected,
            }
        };

        let length = xml_utils::read_attribute_as_f64(element, "length")?;
        if !(length.is_finite() && length > 0.0) {
            return Err(invalid("length", length.to_string(), "positive finite length").into());
        }

        let radius_end = xml_utils::read_attribute_as_f64(element, "radiusEnd")?;
        let radius_start = xml_utils::read_attribute_as_f64(element, "radiusStart")?;
        if radius_end == 0.0 {
            return Err(invalid("radiusEnd", radius_end.to_string(), "nonzero radius").into());
        }
        if radius_start == 0.0 {
            return Err(invalid("radiusStart", radius_start.to_string(), "nonzero radius").into());
        }

        let rot = xml_utils::read_attribute_as_string(element, "rot")?;
        let rot_sign = match rot.as_str() {
            "ccw" => 1.0,
            "cw" => -1.0,
            _ => return Err(invalid("rot", rot, "\"cw\" or \"ccw\"").into()),
        };

        let spi_type = xml_utils::read_attribute_as_string(element, "spiType")?;
        if spi_type != "clothoid" {
            return Err(invalid("spiType", spi_type, "\"clothoid\"").into());
        }

        let start = xml_utils::read_content_as_point(element, "Start")?;
        let end = xml_utils::read_content_as_point(element, "End")?;

        // An infinite radius divides to zero curvature.
        let starting_curvature = rot_sign / radius_start;
        let ending_curvature = rot_sign / radius_end;

        Self::from_vector_and_curvatures(&start, &(end - start), starting_curvature, ending_curvature)
            .ok_or_else(|| {
                GeometryError::Degenerate("no clothoid matches the spiral boundary data".into())
                    .into()
            })
    }

    /// Serializes the segment as a `<Spiral>` element.
    ///
    /// # Errors
    ///
    /// Fails when the writer reports an error or the tangents are parallel
    /// (no PI exists).
    pub fn write_landxml(&self, writer: &mut dyn XmlElementWrite) -> Result<()> {
        let starting_curvature = self.curvature(0.0);
        let ending_curvature = self.curvature(self.length);
        let rot_sign = if starting_curvature == 0.0 {
            ending_curvature.signum()
        } else {
            starting_curvature.signum()
        };

        let radius = |curvature: f64| {
            if curvature == 0.0 {
                "INF".to_string()
            } else {
                format!("{:.9}", 1.0 / (rot_sign * curvature))
            }
        };

        let pi = self.pi().ok_or_else(|| {
            GeometryError::Degenerate("spiral tangents are parallel, no PI exists".into())
        })?;

        writer.start_element("Spiral")?;
        writer.write_attribute("length", &format!("{:.9}", self.length))?;
        writer.write_attribute("radiusEnd", &radius(ending_curvature))?;
        writer.write_attribute("radiusStart", &radius(starting_curvature))?;
        writer.write_attribute("rot", if rot_sign > 0.0 { "ccw" } else { "cw" })?;
        writer.write_attribute("spiType", "clothoid")?;
        xml_utils::write_point(writer, "Start", &self.starting_point(), 9)?;
        xml_utils::write_point(writer, "PI", &pi, 9)?;
        xml_utils::write_point(writer, "End", &self.ending_point(), 9)?;
        writer.end_element()
    }
}

impl HorizontalAlignment for ClothoidTransition {
    fn kind(&self) -> AlignmentKind {
        AlignmentKind::Transition
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn point(&self, s: f64) -> Point2 {
        let local = local_point(self.start_abscissa + s, self.parameter);
        rotated_by(&local, &self.rotation) + self.translation
    }

    fn normal(&self, s: f64) -> Vector2 {
        let u = self.start_abscissa + s;
        // Tangent deflection accumulated since the zero-curvature origin,
        // carried into the global frame by the rotation vector.
        let deflection = u * u / (2.0 * self.parameter * self.parameter.abs());
        let tangent = rotated_vector_by(&polar(1.0, deflection), &self.rotation);
        rotated_90_cw(&tangent)
    }

    fn curvature(&self, s: f64) -> f64 {
        (self.start_abscissa + s) / (self.parameter * self.parameter.abs())
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn points(&self, max_throw: f64) -> Vec<Point2> {
        // Bound the curvature-driven deviation over the whole ramp, then step
        // by equal increments of squared local abscissa so that sub-segments
        // tighten with the curvature.
        let n = (self.length * self.length
            / (4.0 * self.parameter.abs() * (2.0 * self.length * max_throw).sqrt()))
        .ceil() as usize
            + 1;

        let u0 = self.start_abscissa;
        let u1 = self.start_abscissa + self.length;
        // Squared-abscissa measure travelled from u0 to u1. On an inflection
        // spiral the squared abscissa shrinks to zero at u = 0 and grows
        // again, so the two sides contribute separately.
        let total = if u0 < 0.0 && u1 > 0.0 {
            u0 * u0 + u1 * u1
        } else {
            (u1 * u1 - u0 * u0).abs()
        };

        let mut points = Vec::with_capacity(n + 1);
        for i in 0..n {
            let m = total * i as f64 / n as f64;
            let u = if u0 < 0.0 {
                if m < u0 * u0 {
                    -(u0 * u0 - m).sqrt()
                } else {
                    (m - u0 * u0).sqrt()
                }
            } else {
                (u0 * u0 + m).sqrt()
            };
            points.push(self.point(u - u0));
        }
        points.push(self.point(self.length));
        points
    }

    fn extremities(&self) -> &Extremities {
        &self.extremities
    }
}

/// Position on a clothoid of parameter `a` in its canonical local frame, at
/// curvilinear abscissa `s` from the curvature-zero origin.
///
/// The abscissa is first reduced to the unit clothoid. Below `2√π` the
/// Fresnel-style integrals are evaluated as truncated odd-power Maclaurin
/// series, each extra correction gated by a magnitude threshold; beyond, as an
/// asymptotic expansion in `t = |s|/√2` with rational corrections `F(t)`,
/// `G(t)` combined with `sin t²`/`cos t²`. `x` scales with `|a|`, `y` with
/// signed `a`, preserving the curvature-sign convention.
#[must_use]
#[allow(clippy::suboptimal_flops)]
fn local_point(s: f64, a: f64) -> Point2 {
    const TWO_ROOT_PI: f64 = 3.544_907_701_811_03;
    const SQRT_TWO: f64 = 1.414_213_562_373_09;
    const ROOT_PI_OVER_TWO: f64 = 1.253_314_137_315_5;

    let s = s / a.abs();
    let abs_s = s.abs();
    let x;
    let y;

    if abs_s > TWO_ROOT_PI {
        let t = abs_s / SQRT_TWO;
        let mut f = 1.0 / t;
        let mut g = 0.5 / t.powi(3);

        if abs_s < 5.75 {
            f -= 0.75 / t.powi(5);
            g -= 1.875 / t.powi(7);
            if abs_s < 4.0 {
                f += 6.5625 / t.powi(9);
                g += 29.531_25 / t.powi(11);
            }
        }

        let t2 = t * t;
        let cos_t2 = t2.cos();
        let sin_t2 = t2.sin();

        x = (ROOT_PI_OVER_TWO + f * sin_t2 - g * cos_t2) * SQRT_TWO * 1.0_f64.copysign(s) / 2.0;
        y = (ROOT_PI_OVER_TWO - f * cos_t2 - g * sin_t2) * SQRT_TWO * 1.0_f64.copysign(s) / 2.0;
    } else {
        let mut xs = s;
        let mut ys = s.powi(3) / 6.0;

        if abs_s > 0.073_096_529_418_739_2 {
            xs -= s.powi(5) / 40.0;
            ys -= s.powi(7) / 336.0;
            if abs_s > 0.458_853_326_351_216 {
                xs += s.powi(9) / 3_456.0;
                ys += s.powi(11) / 42_240.0;
                if abs_s > 0.844_610_123_283_693 {
                    xs -= s.powi(13) / 599_040.0;
                    ys -= s.powi(15) / 9_676_800.0;
                    if abs_s > 1.230_366_920_216_17 {
                        xs += s.powi(17) / 175_472_640.0;
                        ys += s.powi(19) / 3_530_096_640.0;
                        if abs_s > 1.616_123_717_148_65 {
                            xs -= s.powi(21) / 78_033_715_200.0;
                            ys -= s.powi(23) / 1_880_240_947_200.0;
                            if abs_s > 2.001_880_514_081_12 {
                                xs += s.powi(25) / 49_049_763_840_000.0;
                                ys += s.powi(27) / 1_377_317_368_627_200.0;
                                if abs_s > 2.387_637_311_013_6 {
                                    xs -= s.powi(29) / 41_421_544_567_603_200.0;
                                    ys -= s.powi(31) / 1_328_346_084_409_344_000.0;
                                    if abs_s > 2.773_394_107_946_08 {
                                        xs += s.powi(33) / 45_249_466_617_298_944_000.0;
                                        ys += s.powi(35) / 1_631_723_190_138_961_920_000.0;
                                        if abs_s > 3.159_150_904_878_56 {
                                            xs -= s.powi(37) / 62_098_722_550_431_436_800_000.0;
                                            ys -= s.powi(39) / 248_730_558_972_268_544_000_000.0;
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        x = xs;
        y = ys;
    }

    Point2::new(x * a.abs(), y * a)
}

/// Ratio `y(s)/x(s)` on the unit clothoid — strictly increasing from 0 near
/// the origin, which makes it invertible by the root-finder.
fn unit_ratio(s: f64) -> f64 {
    let p = local_point(s, 1.0);
    p.y / p.x
}

/// Inverts [`unit_ratio`]: finds the unit abscissa whose local-frame ratio
/// matches `ratio`, returning it with the unit `x` coordinate there.
fn solve_unit_abscissa(ratio: f64) -> Option<(f64, f64)> {
    let root = brent_function_value(TOLERANCE, f64::INFINITY, ratio, 1.0, unit_ratio, None)?;
    let s_unit = root.x;
    Some((s_unit, local_point(s_unit, 1.0).x))
}
