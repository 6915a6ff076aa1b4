use std::f64::consts::FRAC_PI_2;

use crate::error::{GeometryError, LandXmlError, Result};
use crate::landxml::{xml_utils, XmlElementRead, XmlElementWrite};
use crate::math::vec_2d::{angle_0_2pi, in_vectorial_reference, polar};
use crate::math::{Point2, Vector2};

use super::{AlignmentKind, Extremities, HorizontalAlignment};

/// A circular-arc alignment segment.
///
/// Defined by a center, an absolute radius, a turn sense (`+1` counter-
/// clockwise, `-1` clockwise), the polar angle of the start point about the
/// center, and a developed arc length. Curvature is the constant `turn/R`.
#[derive(Debug, Clone)]
pub struct CurvedAlignment {
    center: Point2,
    radius: f64,
    turn: f64,
    start_angle: f64,
    length: f64,
    extremities: Extremities,
}

impl CurvedAlignment {
    /// Creates an arc from its center, signed radius (positive turns
    /// counter-clockwise), start angle and developed length.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is zero or not finite.
    pub fn new(center: Point2, signed_radius: f64, start_angle: f64, length: f64) -> Result<Self> {
        if signed_radius == 0.0 || !signed_radius.is_finite() {
            return Err(
                GeometryError::Degenerate("arc radius must be finite and nonzero".into()).into(),
            );
        }
        let mut alignment = Self {
            center,
            radius: signed_radius.abs(),
            turn: if signed_radius >= 0.0 { 1.0 } else { -1.0 },
            start_angle,
            length,
            extremities: Extremities::SEED,
        };
        alignment.extremities = Extremities::of(&alignment);
        Ok(alignment)
    }

    /// Solves for the arc starting at `origin` whose chord is `chord` and
    /// whose signed radius is `signed_radius`.
    ///
    /// Returns `None` when the chord is longer than the diameter (no circle
    /// of that radius passes through both endpoints) — an expected
    /// infeasibility, not an error. When the half-chord equals the radius the
    /// center sits on the chord midpoint and the arc is a half circle.
    #[must_use]
    pub fn from_chord_and_radius(origin: &Point2, chord: &Vector2, signed_radius: f64) -> Option<Self> {
        let d = chord.norm() / 2.0;
        let radius = signed_radius.abs();
        if d > radius {
            return None;
        }
        let turn = if signed_radius >= 0.0 { 1.0 } else { -1.0 };

        // Center of the circle in the chord's local frame (origin at the
        // chord start).
        let (local_center, half_angle) = if d == radius {
            (Point2::new(chord.x / 2.0, chord.y / 2.0), FRAC_PI_2)
        } else {
            let tan_theta = turn * (d * d / (radius * radius - d * d)).sqrt();
            let local_center = Point2::new(
                (chord.x - chord.y / tan_theta) / 2.0,
                (chord.y + chord.x / tan_theta) / 2.0,
            );
            (local_center, tan_theta.atan().abs())
        };

        let start_angle = angle_0_2pi(&-local_center.coords);
        let length = 2.0 * radius * half_angle;
        let center = origin + local_center.coords;

        Self::new(center, turn * radius, start_angle, length).ok()
    }

    /// Returns the center of the arc.
    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    /// Returns the signed radius (`turn * R`).
    #[must_use]
    pub fn signed_radius(&self) -> f64 {
        self.turn * self.radius
    }

    fn angle(&self, s: f64) -> f64 {
        self.start_angle + self.turn * s / self.radius
    }

    fn point_from_angle(&self, angle: f64) -> Point2 {
        Point2::new(
            self.center.x + angle.cos() * self.radius,
            self.center.y + angle.sin() * self.radius,
        )
    }

    /// Deserializes a `<Curve>` element.
    ///
    /// # Errors
    ///
    /// Fails when `rot` is missing or outside `{cw, ccw}`, a boundary element
    /// is missing or malformed, or the start point coincides with the center.
    pub fn read_landxml(element: &dyn XmlElementRead) -> Result<Self> {
        let rot = xml_utils::read_attribute_as_string(element, "rot")?;
        if rot != "cw" && rot != "ccw" {
            return Err(LandXmlError::InvalidAttribute {
                attribute: "rot".to_string(),
                element: element.name().to_string(),
                value: rot,
                expected: "\"cw\" or \"ccw\"",
            }
            .into());
        }

        let start = xml_utils::read_content_as_point(element, "Start")?;
        let center = xml_utils::read_content_as_point(element, "Center")?;
        let end = xml_utils::read_content_as_point(element, "End")?;

        let start_vector = start - center;
        let end_vector = end - center;
        let radius = start_vector.norm();
        let start_angle = angle_0_2pi(&start_vector);

        // Swept angle measured in the turn direction, in [0, 2π).
        let (signed_radius, length) = if rot == "ccw" {
            let swept = angle_0_2pi(&in_vectorial_reference(&end_vector, &start_vector));
            (radius, radius * swept)
        } else {
            let swept = angle_0_2pi(&in_vectorial_reference(&start_vector, &end_vector));
            (-radius, radius * swept)
        };

        Self::new(center, signed_radius, start_angle, length)
    }

    /// Serializes the segment as a `<Curve>` element.
    ///
    /// # Errors
    ///
    /// Fails when the writer reports an error.
    pub fn write_landxml(&self, writer: &mut dyn XmlElementWrite) -> Result<()> {
        writer.start_element("Curve")?;
        writer.write_attribute("rot", if self.turn > 0.0 { "ccw" } else { "cw" })?;
        xml_utils::write_point(writer, "Start", &self.starting_point(), 9)?;
        xml_utils::write_point(writer, "Center", &self.center, 9)?;
        xml_utils::write_point(writer, "End", &self.ending_point(), 9)?;
        writer.end_element()
    }
}

impl HorizontalAlignment for CurvedAlignment {
    fn kind(&self) -> AlignmentKind {
        AlignmentKind::Curved
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn point(&self, s: f64) -> Point2 {
        self.point_from_angle(self.angle(s))
    }

    fn normal(&self, s: f64) -> Vector2 {
        // Outward unit radial.
        polar(1.0, self.angle(s))
    }

    fn curvature(&self, _s: f64) -> f64 {
        self.turn / self.radius
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn points(&self, max_throw: f64) -> Vec<Point2> {
        // Equal-angle steps small enough that the sagitta of every sub-arc
        // stays below max_throw.
        let cos_arg = (1.0 - max_throw / self.radius).max(-1.0);
        let n = (self.length / (self.radius * 2.0 * cos_arg.acos())).ceil() as usize + 1;
        let d_theta = self.length / self.radius / n as f64;

        let mut points = Vec::with_capacity(n + 1);
        let mut theta = self.start_angle;
        for _ in 0..n {
            points.push(self.point_from_angle(theta));
            theta += self.turn * d_theta;
        }
        points.push(self.point(self.length));
        points
    }

    fn extremities(&self) -> &Extremities {
        &self.extremities
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use super::*;
    use crate::landxml::{XmlElement, XmlTreeWriter};

    const TOL: f64 = 1e-9;

    fn quarter_arc() -> CurvedAlignment {
        // CCW quarter circle of radius 50 centered on (100, 100), starting
        // at angle 0.
        CurvedAlignment::new(Point2::new(100.0, 100.0), 50.0, 0.0, 50.0 * PI / 2.0).unwrap()
    }

    #[test]
    fn constructor_keeps_signed_radius() {
        let curve = CurvedAlignment::new(Point2::new(100.0, 100.0), 50.0, 0.0, 25.0).unwrap();
        assert_eq!(curve.kind(), AlignmentKind::Curved);
        assert!((curve.length() - 25.0).abs() < TOL);
        assert!((curve.signed_radius() - 50.0).abs() < TOL);

        let clockwise = CurvedAlignment::new(Point2::new(0.0, 0.0), -50.0, 0.0, 25.0).unwrap();
        assert!((clockwise.signed_radius() + 50.0).abs() < TOL);
    }

    #[test]
    fn zero_radius_is_rejected() {
        assert!(CurvedAlignment::new(Point2::new(0.0, 0.0), 0.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn point_travels_along_the_circle() {
        let curve = CurvedAlignment::new(Point2::new(100.0, 100.0), 50.0, 0.0, 25.0).unwrap();

        let start = curve.point(0.0);
        assert!((start.x - 150.0).abs() < TOL, "x={}", start.x);
        assert!((start.y - 100.0).abs() < TOL, "y={}", start.y);

        let end = curve.point(25.0);
        assert_relative_eq!(end.x, 143.879, epsilon = 1e-3);
        assert_relative_eq!(end.y, 123.971, epsilon = 1e-3);
    }

    #[test]
    fn every_point_sits_at_radius_from_center() {
        let curve = quarter_arc();
        for i in 0..=20 {
            let s = curve.length() * f64::from(i) / 20.0;
            let distance = (curve.point(s) - curve.center).norm();
            assert!((distance - 50.0).abs() < TOL, "s={s} d={distance}");
        }
    }

    #[test]
    fn curvature_is_constant_turn_over_radius() {
        let ccw = quarter_arc();
        let cw = CurvedAlignment::new(Point2::new(0.0, 0.0), -50.0, 1.0, 30.0).unwrap();
        for s in [0.0, 10.0, 40.0] {
            assert!((ccw.curvature(s) - 0.02).abs() < TOL);
            assert!((cw.curvature(s) + 0.02).abs() < TOL);
        }
    }

    #[test]
    fn boundary_points_match_extremities() {
        let curve = quarter_arc();
        assert!((curve.point(0.0) - curve.starting_point()).norm() < TOL);
        assert!((curve.point(curve.length()) - curve.ending_point()).norm() < TOL);
        assert!((curve.normal(0.0) - curve.starting_normal()).norm() < TOL);
        assert!((curve.normal(curve.length()) - curve.ending_normal()).norm() < TOL);
    }

    #[test]
    fn sampling_respects_the_sagitta_bound() {
        let curve = quarter_arc();
        let max_throw = 0.05;
        let points = curve.points(max_throw);
        assert!(points.len() >= 3);
        assert!((points[0] - curve.starting_point()).norm() < TOL);
        assert!((points[points.len() - 1] - curve.ending_point()).norm() < TOL);

        // Sagitta of each chord: R minus the distance from the center to the
        // chord midpoint.
        for pair in points.windows(2) {
            let mid = Point2::new((pair[0].x + pair[1].x) / 2.0, (pair[0].y + pair[1].y) / 2.0);
            let sagitta = 50.0 - (mid - curve.center).norm();
            assert!(sagitta <= max_throw + TOL, "sagitta={sagitta}");
        }
    }

    #[test]
    fn chord_solver_rejects_overlong_chords() {
        let chord = Vector2::new(120.0, 0.0);
        assert!(CurvedAlignment::from_chord_and_radius(&Point2::new(0.0, 0.0), &chord, 50.0).is_none());
    }

    #[test]
    fn chord_solver_reproduces_the_chord() {
        let origin = Point2::new(10.0, 20.0);
        let chord = Vector2::new(60.0, 25.0);
        let curve = CurvedAlignment::from_chord_and_radius(&origin, &chord, 80.0).unwrap();

        assert!((curve.starting_point() - origin).norm() < 1e-6);
        assert!((curve.ending_point() - (origin + chord)).norm() < 1e-6);

        // ds = |2R·atan θ| with tan θ = sens·√(d²/(R²−d²)).
        let d = chord.norm() / 2.0;
        let tan_theta = (d * d / (80.0 * 80.0 - d * d)).sqrt();
        let expected = (2.0 * 80.0 * tan_theta.atan()).abs();
        assert!((curve.length() - expected).abs() < 1e-9, "ds={}", curve.length());
    }

    #[test]
    fn chord_solver_clockwise_bends_right() {
        let origin = Point2::new(0.0, 0.0);
        let chord = Vector2::new(40.0, 0.0);
        let curve = CurvedAlignment::from_chord_and_radius(&origin, &chord, -100.0).unwrap();
        assert!((curve.signed_radius() + 100.0).abs() < TOL);
        // Clockwise from +x: the arc bulges above the chord.
        let mid = curve.point(curve.length() / 2.0);
        assert!(mid.y > 0.0, "mid.y={}", mid.y);
    }

    #[test]
    fn half_chord_equal_to_radius_gives_half_circle() {
        let origin = Point2::new(0.0, 0.0);
        let chord = Vector2::new(100.0, 0.0);
        let curve = CurvedAlignment::from_chord_and_radius(&origin, &chord, 50.0).unwrap();
        assert!((curve.center.x - 50.0).abs() < TOL);
        assert!(curve.center.y.abs() < TOL);
        assert!((curve.length() - 50.0 * PI).abs() < 1e-9, "ds={}", curve.length());
    }

    #[test]
    fn landxml_round_trip() {
        let curve = quarter_arc();
        let mut writer = XmlTreeWriter::new();
        curve.write_landxml(&mut writer).unwrap();
        let element = writer.into_element().unwrap();
        assert_eq!(element.name(), "Curve");
        assert_eq!(element.attribute("rot"), Some("ccw"));

        let reread = CurvedAlignment::read_landxml(&element).unwrap();
        assert!((reread.starting_point() - curve.starting_point()).norm() < 1e-6);
        assert!((reread.ending_point() - curve.ending_point()).norm() < 1e-6);
        assert!((reread.signed_radius() - curve.signed_radius()).abs() < 1e-6);
        assert!((reread.length() - curve.length()).abs() < 1e-6);
    }

    #[test]
    fn landxml_round_trip_clockwise() {
        let curve = CurvedAlignment::new(Point2::new(-20.0, 35.0), -75.0, 1.2, 40.0).unwrap();
        let mut writer = XmlTreeWriter::new();
        curve.write_landxml(&mut writer).unwrap();
        let element = writer.into_element().unwrap();
        assert_eq!(element.attribute("rot"), Some("cw"));

        let reread = CurvedAlignment::read_landxml(&element).unwrap();
        assert!((reread.starting_point() - curve.starting_point()).norm() < 1e-6);
        assert!((reread.ending_point() - curve.ending_point()).norm() < 1e-6);
        assert!((reread.signed_radius() - curve.signed_radius()).abs() < 1e-6);
    }

    #[test]
    fn landxml_read_validates_rot() {
        let mut element = XmlElement::new("Curve");
        element.set_attribute("rot", "widdershins");
        element.add_child_with_text("Start", "150.0 100.0");
        element.add_child_with_text("Center", "100.0 100.0");
        element.add_child_with_text("End", "100.0 150.0");
        assert!(CurvedAlignment::read_landxml(&element).is_err());
    }

    #[test]
    fn landxml_read_requires_all_boundary_points() {
        let mut element = XmlElement::new("Curve");
        element.set_attribute("rot", "ccw");
        element.add_child_with_text("Start", "150.0 100.0");
        element.add_child_with_text("End", "100.0 150.0");
        assert!(CurvedAlignment::read_landxml(&element).is_err());
    }
}
