use thiserror::Error;

/// Top-level error type for the Alinea alignment kernel.
#[derive(Debug, Error)]
pub enum AlineaError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    LandXml(#[from] LandXmlError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to LandXML reading and writing.
#[derive(Debug, Error)]
pub enum LandXmlError {
    #[error("attribute '{attribute}=\"\"' missing in element <{element}>")]
    MissingAttribute { attribute: String, element: String },

    #[error("missing <{element}> element in <{parent}>")]
    MissingElement { element: String, parent: String },

    #[error("missing content in element <{element}>")]
    MissingContent { element: String },

    #[error("attribute '{attribute}=\"{value}\"' in element <{element}>: {expected} expected")]
    InvalidAttribute {
        attribute: String,
        element: String,
        value: String,
        expected: &'static str,
    },

    #[error("attribute '{attribute}={value}' numerical value expected in element <{element}>")]
    MalformedNumber {
        attribute: String,
        element: String,
        value: String,
    },

    #[error("content of two numerical values (Northing Easting) expected in element <{element}>")]
    MalformedPoint { element: String },

    #[error("unknown alignment element <{element}>")]
    UnknownElement { element: String },

    #[error("error writing element <{element}>")]
    Write { element: String },
}

/// Convenience type alias for results using [`AlineaError`].
pub type Result<T> = std::result::Result<T, AlineaError>;
