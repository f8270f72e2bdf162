//! Error and warning types.
//!
//! [`PdfError`] is fatal and stops processing, [`ExtractWarning`] records a
//! non-fatal issue and lets extraction continue best-effort, and
//! [`ExtractOptions`] holds resource limits and warning behavior.

use std::fmt;

use crate::unicode_norm::UnicodeNorm;

/// Fatal error types for PDF processing.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading PDF data.
    IoError(String),
    /// Error resolving font or encoding information.
    FontError(String),
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: usize,
        actual_value: usize,
    },
    /// The PDF is encrypted and no password was supplied.
    PasswordRequired,
    /// The supplied password does not decrypt this PDF.
    InvalidPassword,
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::FontError(msg) => write!(f, "font error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            PdfError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
            PdfError::InvalidPassword => write!(f, "the supplied password is incorrect"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Machine-readable category of a non-fatal extraction issue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// A font referenced by `Tf` is not in the page resources.
    MissingFont,
    /// A PDF object is malformed or has unexpected structure.
    MalformedObject,
    /// A configured limit cut extraction short.
    ResourceLimitReached,
    /// A glyph could not be mapped to Unicode through the font.
    EncodingFallback,
}

impl ExtractWarningCode {
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::MissingFont => "MISSING_FONT",
            ExtractWarningCode::MalformedObject => "MALFORMED_OBJECT",
            ExtractWarningCode::ResourceLimitReached => "RESOURCE_LIMIT_REACHED",
            ExtractWarningCode::EncodingFallback => "ENCODING_FALLBACK",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered during extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    pub code: ExtractWarningCode,
    pub description: String,
    /// Page where the warning occurred (0-indexed), if known.
    pub page: Option<usize>,
    /// Index of the operator in the content stream, if applicable.
    pub operator_index: Option<usize>,
    /// Font resource name involved, if applicable.
    pub font_name: Option<String>,
}

impl ExtractWarning {
    /// Create a warning with a specific code and description.
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            operator_index: None,
            font_name: None,
        }
    }

    /// Create a warning tied to an operator and a font.
    pub fn with_operator_context(
        code: ExtractWarningCode,
        description: impl Into<String>,
        operator_index: usize,
        font_name: impl Into<String>,
    ) -> Self {
        Self {
            operator_index: Some(operator_index),
            font_name: Some(font_name.into()),
            ..Self::with_code(code, description)
        }
    }

    /// Attach a page index, returning the modified warning.
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        if let Some(index) = self.operator_index {
            write!(f, " [operator #{index}]")?;
        }
        Ok(())
    }
}

/// Options controlling extraction behavior and resource limits.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Maximum nesting depth for Form XObjects (default: 10).
    pub max_recursion_depth: usize,
    /// Whether to collect warnings on each page (default: true).
    pub collect_warnings: bool,
    /// Unicode normalization applied to char text (default: none).
    pub unicode_norm: UnicodeNorm,
    /// Maximum input size in bytes (default: no limit).
    pub max_input_bytes: Option<usize>,
    /// Maximum number of pages in the document (default: no limit).
    pub max_pages: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 10,
            collect_warnings: true,
            unicode_norm: UnicodeNorm::None,
            max_input_bytes: None,
            max_pages: None,
        }
    }
}

impl ExtractOptions {
    /// Check a value against an optional limit.
    pub fn check_limit(
        limit_name: &str,
        limit: Option<usize>,
        actual: usize,
    ) -> Result<(), PdfError> {
        match limit {
            Some(max) if actual > max => Err(PdfError::ResourceLimitExceeded {
                limit_name: limit_name.to_string(),
                limit_value: max,
                actual_value: actual,
            }),
            _ => Ok(()),
        }
    }
}
