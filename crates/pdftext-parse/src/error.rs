//! Error types for the parsing and interpreter layers.
//!
//! [`BackendError`] is derived with [`thiserror`] and converts into the core
//! [`PdfError`] so callers see one error type.

use pdftext_core::PdfError;
use thiserror::Error;

/// Error type for PDF backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Font(msg) => PdfError::FontError(msg),
            BackendError::Interpreter(msg) => PdfError::InterpreterError(msg),
            BackendError::Core(e) => e,
        }
    }
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_parse_display() {
        let err = BackendError::Parse("invalid xref table".to_string());
        assert_eq!(err.to_string(), "PDF parse error: invalid xref table");
    }

    #[test]
    fn backend_error_io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn backend_error_to_pdf_error() {
        let pdf_err: PdfError = BackendError::Parse("bad syntax".to_string()).into();
        assert_eq!(pdf_err, PdfError::ParseError("bad syntax".to_string()));

        let pdf_err: PdfError = BackendError::Interpreter("stack".to_string()).into();
        assert_eq!(pdf_err, PdfError::InterpreterError("stack".to_string()));
    }

    #[test]
    fn core_error_passes_through() {
        let err: BackendError = PdfError::PasswordRequired.into();
        assert_eq!(err.to_string(), "PDF is encrypted and requires a password");
        let back: PdfError = err.into();
        assert_eq!(back, PdfError::PasswordRequired);
    }
}
