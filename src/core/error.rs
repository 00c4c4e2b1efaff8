//! Error types for SVG cleaning operations
//!
//! This module defines all error types used throughout svgscrub.

use thiserror::Error;

/// Error types for SVG cleaning operations
#[derive(Debug, Error)]
pub enum SvgError {
    /// The input is not well-formed XML
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A required external tool is not on the search path
    #[error("missing dependency: {0}")]
    MissingDependency(String),

    /// A removal-rule path expression failed to parse
    #[error("bad selector: {0}")]
    BadSelector(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for SVG cleaning operations
pub type SvgResult<T> = Result<T, SvgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SvgError::MalformedDocument("unclosed tag".to_string());
        assert!(err.to_string().contains("malformed document: unclosed tag"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let svg_err: SvgError = io_err.into();
        assert!(matches!(svg_err, SvgError::Io(_)));
    }
}
