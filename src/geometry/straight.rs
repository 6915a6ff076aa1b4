use crate::error::Result;
use crate::landxml::{xml_utils, XmlElementRead, XmlElementWrite};
use crate::math::vec_2d::{normalized, rotated_90_cw};
use crate::math::{Point2, Vector2};

use super::{AlignmentKind, Extremities, HorizontalAlignment};

/// A straight alignment segment.
///
/// Defined by an origin point, a unit direction and a length; the parametric
/// form is `P(s) = origin + s * direction`. Curvature is identically zero.
#[derive(Debug, Clone)]
pub struct StraightAlignment {
    origin: Point2,
    direction: Vector2,
    length: f64,
    extremities: Extremities,
}

impl StraightAlignment {
    /// Creates a straight segment from its origin and chord vector; the
    /// length is the vector's length.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector is zero-length.
    pub fn new(origin: Point2, vector: Vector2) -> Result<Self> {
        Self::with_length(origin, vector, vector.norm())
    }

    /// Creates a straight segment from its origin, a direction and an
    /// explicit length.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn with_length(origin: Point2, direction: Vector2, length: f64) -> Result<Self> {
        let mut alignment = Self {
            origin,
            direction: normalized(&direction)?,
            length,
            extremities: Extremities::SEED,
        };
        alignment.extremities = Extremities::of(&alignment);
        Ok(alignment)
    }

    /// Returns the unit direction of travel.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    /// Deserializes a `<Line>` element.
    ///
    /// # Errors
    ///
    /// Fails when `<Start>` or `<End>` is missing or malformed.
    pub fn read_landxml(element: &dyn XmlElementRead) -> Result<Self> {
        let start = xml_utils::read_content_as_point(element, "Start")?;
        let end = xml_utils::read_content_as_point(element, "End")?;
        Self::new(start, end - start)
    }

    /// Serializes the segment as a `<Line>` element.
    ///
    /// # Errors
    ///
    /// Fails when the writer reports an error.
    pub fn write_landxml(&self, writer: &mut dyn XmlElementWrite) -> Result<()> {
        writer.start_element("Line")?;
        xml_utils::write_point(writer, "Start", &self.starting_point(), 6)?;
        xml_utils::write_point(writer, "End", &self.ending_point(), 6)?;
        writer.end_element()
    }
}

impl HorizontalAlignment for StraightAlignment {
    fn kind(&self) -> AlignmentKind {
        AlignmentKind::Straight
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn point(&self, s: f64) -> Point2 {
        self.origin + self.direction * s
    }

    fn normal(&self, _s: f64) -> Vector2 {
        rotated_90_cw(&self.direction)
    }

    fn curvature(&self, _s: f64) -> f64 {
        0.0
    }

    fn points(&self, _max_throw: f64) -> Vec<Point2> {
        // A line needs no subdivision.
        vec![self.starting_point(), self.ending_point()]
    }

    fn extremities(&self) -> &Extremities {
        &self.extremities
    }
}
