//! pdftext-core: backend-independent data types and text assembly.
//!
//! Provides the geometry and text types ([`BBox`], [`Char`], [`Word`],
//! [`TextLine`]), the grouping algorithms that turn chars into words and
//! lines, and the shared error and option types used by the other pdftext
//! crates.

pub mod error;
pub mod geometry;
pub mod layout;
pub mod metadata;
pub mod text;
pub mod unicode_norm;
pub mod words;

pub use error::{ExtractOptions, ExtractWarning, ExtractWarningCode, PdfError};
pub use geometry::{BBox, Ctm, Point};
pub use layout::{TextLine, TextOptions, cluster_words_into_lines, extract_text, words_to_text};
pub use metadata::DocumentMetadata;
pub use text::{Char, TextDirection, is_cjk, is_cjk_text};
pub use unicode_norm::{UnicodeNorm, normalize_chars};
pub use words::{Word, WordExtractor, WordOptions, cluster_chars_into_lines};
