//! Attribute and content parsing helpers shared by the element readers and
//! writers.
//!
//! Coordinate pairs are serialized in surveying order, "Northing Easting"
//! (`Y` before `X`), whitespace-separated. Numeric attributes recognize the
//! literal tokens `INF` and `-INF` as signed infinities.

use crate::error::{LandXmlError, Result};
use crate::math::Point2;

use super::{XmlElementRead, XmlElementWrite};

/// Parses a numeric literal, accepting `INF`/`-INF`.
///
/// # Errors
///
/// Returns [`LandXmlError::MalformedNumber`] naming the element and attribute
/// when the token is not fully consumable as a number.
pub fn parse_as_f64(value: &str, element: &str, attribute: &str) -> Result<f64> {
    let trimmed = value.trim();
    match trimmed {
        "INF" => Ok(f64::INFINITY),
        "-INF" => Ok(f64::NEG_INFINITY),
        _ => trimmed.parse::<f64>().map_err(|_| {
            LandXmlError::MalformedNumber {
                attribute: attribute.to_string(),
                element: element.to_string(),
                value: value.to_string(),
            }
            .into()
        }),
    }
}

/// Reads the named attribute as a float.
///
/// # Errors
///
/// Fails when the attribute is absent or empty, or its value is not a valid
/// numeric literal.
pub fn read_attribute_as_f64(element: &dyn XmlElementRead, name: &str) -> Result<f64> {
    let value = read_attribute_as_string(element, name)?;
    parse_as_f64(&value, element.name(), name)
}

/// Reads the named attribute as a string.
///
/// # Errors
///
/// Fails when the attribute is absent or empty.
pub fn read_attribute_as_string(element: &dyn XmlElementRead, name: &str) -> Result<String> {
    match element.attribute(name) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(LandXmlError::MissingAttribute {
            attribute: name.to_string(),
            element: element.name().to_string(),
        }
        .into()),
    }
}

/// Reads the text content of the named child element as a coordinate pair.
///
/// # Errors
///
/// Fails when the child is missing, its content is empty, or the content is
/// not exactly two numeric tokens.
pub fn read_content_as_point(element: &dyn XmlElementRead, child: &str) -> Result<Point2> {
    let Some(content) = element.child_text(child) else {
        return Err(LandXmlError::MissingElement {
            element: child.to_string(),
            parent: element.name().to_string(),
        }
        .into());
    };
    if content.trim().is_empty() {
        return Err(LandXmlError::MissingContent {
            element: child.to_string(),
        }
        .into());
    }

    let malformed = || LandXmlError::MalformedPoint {
        element: child.to_string(),
    };
    let mut tokens = content.split_whitespace();
    let northing = tokens.next().ok_or_else(malformed)?;
    let easting = tokens.next().ok_or_else(malformed)?;
    if tokens.next().is_some() {
        return Err(malformed().into());
    }
    let y = northing.parse::<f64>().map_err(|_| malformed())?;
    let x = easting.parse::<f64>().map_err(|_| malformed())?;
    Ok(Point2::new(x, y))
}

/// Writes `point` as a child element holding a "Northing Easting" pair with
/// the given number of decimals.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_point(
    writer: &mut dyn XmlElementWrite,
    name: &str,
    point: &Point2,
    decimals: usize,
) -> Result<()> {
    writer.start_element(name)?;
    writer.write_text(&format!(
        "{:.prec$} {:.prec$}",
        point.y,
        point.x,
        prec = decimals
    ))?;
    writer.end_element()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::{XmlElement, XmlTreeWriter};
    use super::*;

    fn element_with_attribute(value: &str) -> XmlElement {
        let mut element = XmlElement::new("Spiral");
        element.set_attribute("length", value);
        element
    }

    #[test]
    fn parses_plain_numbers() {
        assert!((parse_as_f64("123.456", "E", "a").unwrap() - 123.456).abs() < 1e-12);
        assert!((parse_as_f64("   123.456   ", "E", "a").unwrap() - 123.456).abs() < 1e-12);
        assert!((parse_as_f64("1e10", "E", "a").unwrap() - 1e10).abs() < 1.0);
        assert!((parse_as_f64("-1e-10", "E", "a").unwrap() + 1e-10).abs() < 1e-20);
        assert_eq!(parse_as_f64("0", "E", "a").unwrap(), 0.0);
    }

    #[test]
    fn parses_signed_infinities() {
        assert_eq!(parse_as_f64("INF", "E", "a").unwrap(), f64::INFINITY);
        assert_eq!(parse_as_f64("  -INF ", "E", "a").unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn rejects_malformed_numbers() {
        for value in ["", "   ", "123.45abc", "abc123.45", "..123"] {
            assert!(parse_as_f64(value, "E", "a").is_err(), "value={value:?}");
        }
    }

    #[test]
    fn attribute_as_f64_requires_presence() {
        let element = element_with_attribute("42.5");
        assert!((read_attribute_as_f64(&element, "length").unwrap() - 42.5).abs() < 1e-12);
        assert!(read_attribute_as_f64(&element, "radiusStart").is_err());

        let empty = element_with_attribute("");
        assert!(read_attribute_as_f64(&empty, "length").is_err());
    }

    #[test]
    fn content_point_is_northing_easting_ordered() {
        let mut parent = XmlElement::new("Line");
        parent.add_child_with_text("Start", "6248000.25 1319500.5");
        let p = read_content_as_point(&parent, "Start").unwrap();
        assert!((p.x - 1_319_500.5).abs() < 1e-9, "x={}", p.x);
        assert!((p.y - 6_248_000.25).abs() < 1e-9, "y={}", p.y);
    }

    #[test]
    fn content_point_rejects_wrong_token_counts() {
        let mut parent = XmlElement::new("Line");
        parent.add_child_with_text("One", "1.0");
        parent.add_child_with_text("Three", "1.0 2.0 3.0");
        parent.add_child_with_text("Words", "north east");
        parent.add_child_with_text("Empty", "   ");
        for child in ["One", "Three", "Words", "Empty", "Absent"] {
            assert!(read_content_as_point(&parent, child).is_err(), "child={child}");
        }
    }

    #[test]
    fn write_point_round_trips_through_reader() {
        let mut writer = XmlTreeWriter::new();
        writer.start_element("Line").unwrap();
        write_point(&mut writer, "Start", &Point2::new(1.5, -2.25), 6).unwrap();
        writer.end_element().unwrap();
        let element = writer.into_element().unwrap();

        assert_eq!(element.child_text("Start").unwrap(), "-2.250000 1.500000");
        let p = read_content_as_point(&element, "Start").unwrap();
        assert!((p.x - 1.5).abs() < 1e-9);
        assert!((p.y + 2.25).abs() < 1e-9);
    }
}
