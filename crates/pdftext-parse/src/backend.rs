//! PDF parsing backend trait.
//!
//! [`PdfBackend`] abstracts the operations text extraction needs from a PDF
//! reader, so the facade crate does not depend on lopdf types directly.

use pdftext_core::{BBox, DocumentMetadata, ExtractOptions, PdfError};

use crate::handler::ContentHandler;

/// Operations a PDF reader must provide for text extraction.
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// for index in 0..MyBackend::page_count(&doc) {
///     let page = MyBackend::get_page(&doc, index)?;
///     MyBackend::interpret_page(&doc, &page, &mut handler, &options)?;
/// }
/// ```
pub trait PdfBackend {
    /// The parsed PDF document type.
    type Document;

    /// A reference to a single page within a document.
    type Page;

    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable PDF, or if the
    /// document is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Parse PDF bytes, decrypting with `password` when the document is
    /// encrypted. Unencrypted documents ignore the password.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable PDF or the password
    /// is wrong.
    fn open_with_password(bytes: &[u8], password: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// The page MediaBox in PDF user space, `(x0, y0, x1, y1)` stored as
    /// `(x0, top, x1, bottom)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the MediaBox entry exists but is malformed.
    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<BBox, Self::Error>;

    /// Metadata from the `/Info` dictionary. Missing fields are `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    fn document_metadata(doc: &Self::Document) -> Result<DocumentMetadata, Self::Error>;

    /// Interpret the page's content streams, reporting glyphs and warnings
    /// to `handler`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page contents cannot be decoded or parsed.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error>;
}
