//! Error types for OCX translation
//!
//! Only two classes of problems abort a translation: a schema mismatch
//! detected while reading the document, and calling [`transfer`] before a
//! successful [`read_file`]. Everything else (missing optional subtrees,
//! unparseable numbers, unknown element tags, geometry kernel rejections,
//! GUID lookup misses) is reported through the `log` facade and the
//! affected element is skipped, so the pipeline always produces the most
//! complete shape tree it can.
//!
//! [`read_file`]: crate::reader::OcxReader::read_file
//! [`transfer`]: crate::reader::OcxReader::transfer

use std::io;
use thiserror::Error;

/// Result type for OCX translation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while translating an OCX document
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// XML parsing error from the underlying reader
    ///
    /// Raised for malformed XML syntax, invalid encoding or unclosed tags.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error
    #[error("XML attribute error: {0}")]
    XmlAttr(String),

    /// Invalid XML structure
    ///
    /// The document is well-formed XML but structurally unusable, e.g. a
    /// DTD declaration or text outside the root element.
    #[error("Invalid XML structure: {0}")]
    InvalidXml(String),

    /// The document is not a supported OCX document
    ///
    /// Raised when the root element's local name is not `ocxXML`, the
    /// namespace prefix is inconsistent, or the `schemaVersion` attribute
    /// is missing or differs from the supported literal. This aborts the
    /// whole translation; no context is constructed.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A reader was invoked outside its contract
    ///
    /// Calling `transfer` before `read_file` has succeeded is a programming
    /// error on the caller's side. It is reported as a failure rather than
    /// left as undefined behavior.
    #[error("Precondition violation: {0}")]
    Precondition(String),

    /// The geometry kernel rejected a construction request
    ///
    /// Callers inside the translation pipeline catch this at the request
    /// site, log it, and treat the stage's geometry as absent; it never
    /// aborts a translation on its own.
    #[error("Geometry kernel operation failed: {0}")]
    Kernel(String),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(format!("Attribute parsing failed: {}", err))
    }
}

impl Error {
    /// Create a SchemaMismatch error with element context
    pub fn schema_mismatch(element: &str, message: &str) -> Self {
        Error::SchemaMismatch(format!("Element '<{}>': {}", element, message))
    }

    /// Create a Kernel error naming the rejected request
    pub fn kernel(request: &str, message: impl Into<String>) -> Self {
        Error::Kernel(format!("{}: {}", request, message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_helper() {
        let err = Error::schema_mismatch("vessel:ocxXML", "missing schemaVersion");
        assert!(err.to_string().contains("Schema mismatch"));
        assert!(err.to_string().contains("'<vessel:ocxXML>'"));
        assert!(err.to_string().contains("missing schemaVersion"));
    }

    #[test]
    fn test_kernel_helper() {
        let err = Error::kernel("sew", "open shell");
        assert!(err.to_string().contains("kernel operation failed"));
        assert!(err.to_string().contains("sew: open shell"));
    }
}
