mod curved;
mod straight;
mod transition;

pub use curved::CurvedAlignment;
pub use straight::StraightAlignment;
pub use transition::ClothoidTransition;

use crate::error::{LandXmlError, Result};
use crate::landxml::{XmlElementRead, XmlElementWrite};
use crate::math::vec_2d::rotated_90_ccw;
use crate::math::{Point2, Vector2};

/// Discriminant of the three horizontal alignment variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentKind {
    Straight,
    Curved,
    Transition,
}

/// Memoized boundary state of an alignment segment.
///
/// Derived once at construction from `point`/`normal` at the boundary
/// abscissas; never independent state. Segments are concatenated by matching
/// one segment's ending point/normal to the next segment's starting pair —
/// continuity is the caller's invariant, not enforced here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremities {
    pub starting_point: Point2,
    pub ending_point: Point2,
    pub starting_normal: Vector2,
    pub ending_normal: Vector2,
}

impl Extremities {
    /// Placeholder used while a segment is still under construction.
    pub(crate) const SEED: Self = Self {
        starting_point: Point2::new(0.0, 0.0),
        ending_point: Point2::new(0.0, 0.0),
        starting_normal: Vector2::new(1.0, 0.0),
        ending_normal: Vector2::new(1.0, 0.0),
    };

    /// Evaluates the boundary point/normal pairs of `alignment`.
    ///
    /// Must be called by every concrete constructor (and deserializer) once
    /// all geometric fields are set.
    pub(crate) fn of<A: HorizontalAlignment + ?Sized>(alignment: &A) -> Self {
        let length = alignment.length();
        Self {
            starting_point: alignment.point(0.0),
            ending_point: alignment.point(length),
            starting_normal: alignment.normal(0.0),
            ending_normal: alignment.normal(length),
        }
    }
}

/// Capability set shared by every horizontal alignment segment.
///
/// A segment is an immutable curve parametrized by curvilinear abscissa `s`
/// from `0` to `length()`; all methods are deterministic reads, safe for
/// concurrent use once constructed.
pub trait HorizontalAlignment {
    /// Variant discriminant.
    fn kind(&self) -> AlignmentKind;

    /// Developed length of the segment.
    fn length(&self) -> f64;

    /// Position at abscissa `s`.
    fn point(&self, s: f64) -> Point2;

    /// Unit vector perpendicular to the travel direction at abscissa `s`.
    fn normal(&self, s: f64) -> Vector2;

    /// Curvature at abscissa `s` (signed; positive turns counter-clockwise).
    fn curvature(&self, s: f64) -> f64;

    /// Polyline approximation whose perpendicular deviation from the true
    /// curve never exceeds `max_throw`.
    fn points(&self, max_throw: f64) -> Vec<Point2>;

    /// Memoized boundary state.
    fn extremities(&self) -> &Extremities;

    fn starting_point(&self) -> Point2 {
        self.extremities().starting_point
    }

    fn ending_point(&self) -> Point2 {
        self.extremities().ending_point
    }

    fn starting_normal(&self) -> Vector2 {
        self.extremities().starting_normal
    }

    fn ending_normal(&self) -> Vector2 {
        self.extremities().ending_normal
    }

    /// Direction of travel at the start (the normal rotated 90° CCW).
    fn starting_tangent(&self) -> Vector2 {
        rotated_90_ccw(&self.starting_normal())
    }

    /// Direction of travel at the end.
    fn ending_tangent(&self) -> Vector2 {
        rotated_90_ccw(&self.ending_normal())
    }
}

/// Closed sum type over the three alignment variants.
#[derive(Debug, Clone)]
pub enum Alignment {
    Straight(StraightAlignment),
    Curved(CurvedAlignment),
    Transition(ClothoidTransition),
}

impl Alignment {
    /// Deserializes any alignment element, dispatching on the element name.
    ///
    /// # Errors
    ///
    /// Fails on an unknown element name or malformed element content.
    pub fn read_landxml(element: &dyn XmlElementRead) -> Result<Self> {
        match element.name() {
            "Line" => Ok(Self::Straight(StraightAlignment::read_landxml(element)?)),
            "Curve" => Ok(Self::Curved(CurvedAlignment::read_landxml(element)?)),
            "Spiral" => Ok(Self::Transition(ClothoidTransition::read_landxml(element)?)),
            other => Err(LandXmlError::UnknownElement {
                element: other.to_string(),
            }
            .into()),
        }
    }

    /// Serializes the segment as its LandXML element.
    ///
    /// # Errors
    ///
    /// Fails when the writer reports an error or the geometry cannot be
    /// expressed in the element schema.
    pub fn write_landxml(&self, writer: &mut dyn XmlElementWrite) -> Result<()> {
        match self {
            Self::Straight(a) => a.write_landxml(writer),
            Self::Curved(a) => a.write_landxml(writer),
            Self::Transition(a) => a.write_landxml(writer),
        }
    }

    fn inner(&self) -> &dyn HorizontalAlignment {
        match self {
            Self::Straight(a) => a,
            Self::Curved(a) => a,
            Self::Transition(a) => a,
        }
    }
}

impl HorizontalAlignment for Alignment {
    fn kind(&self) -> AlignmentKind {
        self.inner().kind()
    }

    fn length(&self) -> f64 {
        self.inner().length()
    }

    fn point(&self, s: f64) -> Point2 {
        self.inner().point(s)
    }

    fn normal(&self, s: f64) -> Vector2 {
        self.inner().normal(s)
    }

    fn curvature(&self, s: f64) -> f64 {
        self.inner().curvature(s)
    }

    fn points(&self, max_throw: f64) -> Vec<Point2> {
        self.inner().points(max_throw)
    }

    fn extremities(&self) -> &Extremities {
        self.inner().extremities()
    }
}
