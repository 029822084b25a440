//! Error types for the docstyle library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docstyle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing, styling or rendering a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input, configuration or theme file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file is not a WordprocessingML (.docx) document.
    #[error("Unsupported file type (expected .docx): {0}")]
    UnsupportedFormat(String),

    /// The container opened but its content is unusable.
    #[error("Corrupted document: {0}")]
    Corrupted(String),

    /// Malformed XML inside a document part.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// ZIP container read or write failure.
    #[error("Container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed YAML in a design-system or theme file.
    #[error("Configuration syntax error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The design-system configuration has an unexpected shape.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A color name is neither a hex literal nor defined in the palette.
    #[error("Unknown color name: '{0}'")]
    ColorNotFound(String),

    /// A component style was requested that the configuration does not define.
    #[error("Unknown component: '{0}'")]
    UnknownComponent(String),

    /// An embedded part referenced by the document is missing.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Error while producing output (DOCX, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether the error stems from the design-system configuration rather
    /// than from the input document.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::Yaml(_) | Error::Config(_) | Error::ColorNotFound(_) | Error::UnknownComponent(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ColorNotFound("sky".to_string());
        assert_eq!(err.to_string(), "Unknown color name: 'sky'");

        let err = Error::FileNotFound(PathBuf::from("missing.docx"));
        assert_eq!(err.to_string(), "File not found: missing.docx");

        let err = Error::UnsupportedFormat("notes.txt".to_string());
        assert_eq!(
            err.to_string(),
            "Unsupported file type (expected .docx): notes.txt"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_config_error_classification() {
        assert!(Error::UnknownComponent("hero".into()).is_config_error());
        assert!(Error::ColorNotFound("sky".into()).is_config_error());
        assert!(!Error::Corrupted("bad zip".into()).is_config_error());
    }
}
