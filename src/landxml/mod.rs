//! LandXML collaborator boundary.
//!
//! The geometry kernel never touches an XML library directly: it reads and
//! writes through the two capability traits below. [`element::XmlElement`] and
//! [`element::XmlTreeWriter`] provide an in-memory implementation; any real
//! XML backend can implement the same traits over its reader/writer handles.

pub mod element;
pub mod xml_utils;

pub use element::{XmlElement, XmlTreeWriter};

use crate::error::Result;

/// Read access to one serialized element.
pub trait XmlElementRead {
    /// Name of the element.
    fn name(&self) -> &str;

    /// Value of the named attribute, if present.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Text content of the first child element with the given name, if the
    /// child is present.
    fn child_text(&self, name: &str) -> Option<&str>;
}

/// Event-style write access to a serialized document.
pub trait XmlElementWrite {
    /// Opens a new element nested in the currently open one.
    ///
    /// # Errors
    ///
    /// Returns an error if the element cannot be written.
    fn start_element(&mut self, name: &str) -> Result<()>;

    /// Writes an attribute on the currently open element.
    ///
    /// # Errors
    ///
    /// Returns an error if no element is open or the attribute cannot be
    /// written.
    fn write_attribute(&mut self, name: &str, value: &str) -> Result<()>;

    /// Writes text content into the currently open element.
    ///
    /// # Errors
    ///
    /// Returns an error if no element is open.
    fn write_text(&mut self, text: &str) -> Result<()>;

    /// Closes the currently open element.
    ///
    /// # Errors
    ///
    /// Returns an error if no element is open.
    fn end_element(&mut self) -> Result<()>;
}
