//! Whole-document text extraction.
//!
//! [`TextExtractor`] opens a document, walks its pages in order and joins the
//! text of every page that has any, each followed by a newline.

use std::path::Path;

use pdftext_core::{ExtractOptions, PdfError, TextOptions};
use thiserror::Error;

use crate::Pdf;

/// Horizontal spacing tolerance used when none is given, in points.
pub const DEFAULT_X_TOLERANCE: f64 = 2.0;

/// Errors returned by [`TextExtractor`].
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The document could not be opened: missing or unreadable file, bytes
    /// that are not a PDF, a missing or wrong password, or an input limit.
    #[error("failed to open PDF {origin}")]
    DocumentOpen {
        origin: String,
        #[source]
        source: PdfError,
    },
    /// Interpreting a page failed.
    #[error("failed to extract text from page {page}")]
    Extraction {
        /// 1-based page number.
        page: usize,
        #[source]
        source: PdfError,
    },
}

impl ExtractError {
    /// The underlying library error.
    pub fn pdf_error(&self) -> &PdfError {
        match self {
            ExtractError::DocumentOpen { source, .. } | ExtractError::Extraction { source, .. } => {
                source
            }
        }
    }
}

/// Text of one page, as produced by [`TextExtractor::page_texts`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageText {
    /// 1-based page number.
    pub page: usize,
    pub text: String,
}

/// Extracts the text of whole documents.
///
/// ```ignore
/// let text = TextExtractor::new(2.0).extract_path("report.pdf")?;
/// print!("{text}");
/// ```
#[derive(Debug, Clone)]
pub struct TextExtractor {
    text_options: TextOptions,
    extract_options: ExtractOptions,
    password: Option<Vec<u8>>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_X_TOLERANCE)
    }
}

impl TextExtractor {
    /// An extractor using `x_tolerance` and default options otherwise.
    pub fn new(x_tolerance: f64) -> Self {
        Self::with_options(
            TextOptions::with_x_tolerance(x_tolerance),
            ExtractOptions::default(),
        )
    }

    pub fn with_options(text_options: TextOptions, extract_options: ExtractOptions) -> Self {
        Self {
            text_options,
            extract_options,
            password: None,
        }
    }

    /// Decrypt encrypted documents with `password`.
    pub fn with_password(mut self, password: impl Into<Vec<u8>>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn text_options(&self) -> &TextOptions {
        &self.text_options
    }

    pub fn extract_options(&self) -> &ExtractOptions {
        &self.extract_options
    }

    /// Open the file at `path` with this extractor's options.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::DocumentOpen`] if the file cannot be read or
    /// parsed.
    pub fn open_path(&self, path: impl AsRef<Path>) -> Result<Pdf, ExtractError> {
        let path = path.as_ref();
        let options = Some(self.extract_options.clone());
        let opened = match &self.password {
            Some(password) => Pdf::open_file_with_password(path, password, options),
            None => Pdf::open_file(path, options),
        };
        opened.map_err(|source| ExtractError::DocumentOpen {
            origin: path.display().to_string(),
            source,
        })
    }

    /// Open an in-memory document with this extractor's options.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::DocumentOpen`] if the bytes cannot be parsed.
    pub fn open_bytes(&self, bytes: &[u8]) -> Result<Pdf, ExtractError> {
        let options = Some(self.extract_options.clone());
        let opened = match &self.password {
            Some(password) => Pdf::open_with_password(bytes, password, options),
            None => Pdf::open(bytes, options),
        };
        opened.map_err(|source| ExtractError::DocumentOpen {
            origin: format!("<{} bytes in memory>", bytes.len()),
            source,
        })
    }

    /// Extract the text of the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::DocumentOpen`] if the document cannot be
    /// opened and [`ExtractError::Extraction`] if a page fails.
    pub fn extract_path(&self, path: impl AsRef<Path>) -> Result<String, ExtractError> {
        let pdf = self.open_path(path)?;
        self.extract_pdf(&pdf)
    }

    /// Extract the text of an in-memory document.
    ///
    /// # Errors
    ///
    /// See [`TextExtractor::extract_path`].
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let pdf = self.open_bytes(bytes)?;
        self.extract_pdf(&pdf)
    }

    /// Extract the text of every page of an open document.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Extraction`] for the first page that fails.
    pub fn extract_pdf(&self, pdf: &Pdf) -> Result<String, ExtractError> {
        let mut output = String::new();
        for (index, page) in pdf.pages_iter().enumerate() {
            let page = page.map_err(|source| ExtractError::Extraction {
                page: index + 1,
                source,
            })?;
            push_page_text(&mut output, &page.extract_text(&self.text_options));
        }
        tracing::debug!(
            pages = pdf.page_count(),
            bytes = output.len(),
            "document text extracted"
        );
        Ok(output)
    }

    /// Extract the text of the pages at the given 0-based indices, in the
    /// order given.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Extraction`] for the first page that fails or
    /// is out of range.
    pub fn extract_pages(&self, pdf: &Pdf, indices: &[usize]) -> Result<String, ExtractError> {
        let mut output = String::new();
        for page in self.page_texts(pdf, indices)? {
            push_page_text(&mut output, &page.text);
        }
        Ok(output)
    }

    /// The text of each selected page, including pages with no text.
    ///
    /// # Errors
    ///
    /// See [`TextExtractor::extract_pages`].
    pub fn page_texts(&self, pdf: &Pdf, indices: &[usize]) -> Result<Vec<PageText>, ExtractError> {
        indices
            .iter()
            .map(|&index| {
                let page = pdf.page(index).map_err(|source| ExtractError::Extraction {
                    page: index + 1,
                    source,
                })?;
                Ok(PageText {
                    page: page.page_number(),
                    text: page.extract_text(&self.text_options),
                })
            })
            .collect()
    }
}

fn push_page_text(output: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    output.push_str(text);
    output.push('\n');
}

/// Extract the text of the PDF at `path` with the given spacing tolerance.
///
/// Non-empty page texts are concatenated in page order, each followed by
/// `\n`. A document with no text yields an empty string.
///
/// # Errors
///
/// See [`TextExtractor::extract_path`].
pub fn extract_text_with_spacing(
    path: impl AsRef<Path>,
    x_tolerance: f64,
) -> Result<String, ExtractError> {
    TextExtractor::new(x_tolerance).extract_path(path)
}
