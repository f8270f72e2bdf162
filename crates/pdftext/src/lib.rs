//! pdftext: extract page text from PDF documents.
//!
//! This is the public API facade crate for pdftext-rs. It re-exports types from
//! pdftext-core and uses pdftext-parse for PDF reading and interpretation.
//!
//! # Architecture
//!
//! - **pdftext-core**: Backend-independent data types and text assembly
//! - **pdftext-parse**: lopdf backend and content stream interpreter
//! - **pdftext** (this crate): [`Pdf`], [`Page`] and the [`TextExtractor`]
//!
//! # Example
//!
//! ```ignore
//! use pdftext::extract_text_with_spacing;
//!
//! let text = extract_text_with_spacing("report.pdf", 2.0)?;
//! print!("{text}");
//! ```

mod extract;
mod page;
mod pdf;

pub use extract::{
    DEFAULT_X_TOLERANCE, ExtractError, PageText, TextExtractor, extract_text_with_spacing,
};
pub use page::Page;
pub use pdf::{PagesIter, Pdf};

pub use pdftext_core;
pub use pdftext_core::{
    BBox, Char, DocumentMetadata, ExtractOptions, ExtractWarning, ExtractWarningCode, PdfError,
    TextDirection, TextLine, TextOptions, UnicodeNorm, Word, WordOptions,
};
pub use pdftext_parse;
