//! Error types for flatext.

use std::fmt::Display;

use thiserror::Error;

/// Failure reported to the caller of an extraction.
///
/// The taxonomy is flat: every failure raised while decoding a recognized
/// format collapses into [`ExtractError::Processing`], keeping only the
/// underlying error's message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// No upload was attached to the request.
    #[error("No file uploaded")]
    NoFileProvided,

    /// The filename suffix is not one of the recognized extensions.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Decoding, parsing or OCR of a recognized format failed.
    #[error("Error processing file: {0}")]
    Processing(String),
}

impl ExtractError {
    /// Build a processing failure from any displayable error.
    pub fn processing(err: impl Display) -> Self {
        Self::Processing(err.to_string())
    }

    /// Whether the failure was caused by the request rather than the content.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NoFileProvided | Self::UnsupportedFormat(_))
    }

    /// Short machine-readable label for the failure kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoFileProvided => "no_file_provided",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::Processing(_) => "processing_failure",
        }
    }
}

/// Result type alias for extraction calls.
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_provided_display() {
        assert_eq!(ExtractError::NoFileProvided.to_string(), "No file uploaded");
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = ExtractError::UnsupportedFormat("report.xyz".to_string());
        assert_eq!(err.to_string(), "Unsupported file type: report.xyz");
    }

    #[test]
    fn test_processing_display() {
        let err = ExtractError::Processing("invalid file header".to_string());
        assert_eq!(
            err.to_string(),
            "Error processing file: invalid file header"
        );
    }

    #[test]
    fn test_processing_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated stream");
        let err = ExtractError::processing(io_err);
        assert!(matches!(err, ExtractError::Processing(ref msg) if msg == "truncated stream"));
    }

    #[test]
    fn test_client_errors() {
        assert!(ExtractError::NoFileProvided.is_client_error());
        assert!(ExtractError::UnsupportedFormat("a.bin".to_string()).is_client_error());
        assert!(!ExtractError::Processing("boom".to_string()).is_client_error());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ExtractError::NoFileProvided.kind(), "no_file_provided");
        assert_eq!(
            ExtractError::UnsupportedFormat(String::new()).kind(),
            "unsupported_format"
        );
        assert_eq!(
            ExtractError::Processing(String::new()).kind(),
            "processing_failure"
        );
    }

    #[test]
    fn test_result_type_alias() {
        fn failing() -> Result<String> {
            Err(ExtractError::NoFileProvided)
        }

        assert!(failing().is_err());
    }
}
