//! In-memory element tree.
//!
//! A minimal document model backing the [`XmlElementRead`]/[`XmlElementWrite`]
//! capabilities without pulling a full XML stack into the kernel. Round-trip
//! tests write into a tree and read straight back out of it; external code can
//! convert the tree to and from its own XML representation.

use crate::error::{LandXmlError, Result};

use super::{XmlElementRead, XmlElementWrite};

/// One element: name, attributes in document order, text content, children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Sets (or replaces) an attribute.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.attributes.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    /// Sets the text content.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Appends a child element.
    pub fn add_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Appends a child element holding only text content.
    pub fn add_child_with_text(&mut self, name: &str, text: &str) {
        let mut child = Self::new(name);
        child.set_text(text);
        self.children.push(child);
    }

    /// Returns the first child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children, in document order.
    #[must_use]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Serializes the tree as indented XML text.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out, 0);
        out
    }

    fn write_xml(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        if self.text.is_empty() && self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }
        out.push('>');
        if self.children.is_empty() {
            out.push_str(&escape(&self.text));
        } else {
            out.push('\n');
            for child in &self.children {
                child.write_xml(out, depth + 1);
            }
            out.push_str(&indent);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push_str(">\n");
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl XmlElementRead for XmlElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }
}

/// [`XmlElementWrite`] implementation that builds an [`XmlElement`] tree.
#[derive(Debug, Default)]
pub struct XmlTreeWriter {
    stack: Vec<XmlElement>,
    root: Option<XmlElement>,
}

impl XmlTreeWriter {
    /// Creates a writer with no open element.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the writer, returning the completed root element.
    ///
    /// Returns `None` when nothing was written or an element is still open.
    #[must_use]
    pub fn into_element(self) -> Option<XmlElement> {
        if self.stack.is_empty() {
            self.root
        } else {
            None
        }
    }

    fn open_element_mut(&mut self, context: &str) -> Result<&mut XmlElement> {
        self.stack.last_mut().ok_or_else(|| {
            LandXmlError::Write {
                element: context.to_string(),
            }
            .into()
        })
    }
}

impl XmlElementWrite for XmlTreeWriter {
    fn start_element(&mut self, name: &str) -> Result<()> {
        self.stack.push(XmlElement::new(name));
        Ok(())
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        let attribute = name.to_string();
        self.open_element_mut(name)?.set_attribute(&attribute, value);
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.open_element_mut("#text")?.set_text(text);
        Ok(())
    }

    fn end_element(&mut self) -> Result<()> {
        let closed = self.stack.pop().ok_or(LandXmlError::Write {
            element: "#document".to_string(),
        })?;
        match self.stack.last_mut() {
            Some(parent) => parent.add_child(closed),
            None => self.root = Some(closed),
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn writer_builds_nested_tree() {
        let mut writer = XmlTreeWriter::new();
        writer.start_element("Curve").unwrap();
        writer.write_attribute("rot", "ccw").unwrap();
        writer.start_element("Start").unwrap();
        writer.write_text("100.0 150.0").unwrap();
        writer.end_element().unwrap();
        writer.end_element().unwrap();

        let root = writer.into_element().unwrap();
        assert_eq!(root.name(), "Curve");
        assert_eq!(root.attribute("rot"), Some("ccw"));
        assert_eq!(root.child_text("Start"), Some("100.0 150.0"));
        assert_eq!(root.child_text("End"), None);
    }

    #[test]
    fn unbalanced_writer_yields_no_element() {
        let mut writer = XmlTreeWriter::new();
        writer.start_element("Line").unwrap();
        assert!(writer.into_element().is_none());
    }

    #[test]
    fn write_outside_element_fails() {
        let mut writer = XmlTreeWriter::new();
        assert!(writer.write_text("orphan").is_err());
        assert!(writer.write_attribute("rot", "cw").is_err());
        assert!(writer.end_element().is_err());
    }

    #[test]
    fn xml_text_output_is_indented() {
        let mut root = XmlElement::new("Line");
        root.add_child_with_text("Start", "0.0 1.0");
        root.add_child_with_text("End", "2.0 3.0");
        let xml = root.to_xml();
        assert_eq!(
            xml,
            "<Line>\n  <Start>0.0 1.0</Start>\n  <End>2.0 3.0</End>\n</Line>\n"
        );
    }
}
