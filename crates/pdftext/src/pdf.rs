//! Top-level PDF document type.

use std::path::Path;

use pdftext_core::{
    BBox, Char, DocumentMetadata, ExtractOptions, ExtractWarning, PdfError, normalize_chars,
};
use pdftext_parse::{
    CharEvent, ContentHandler, LopdfBackend, LopdfDocument, PdfBackend, char_from_event,
};

use crate::Page;

/// Iterator over the pages of a [`Pdf`], interpreting each page on demand.
///
/// Created by [`Pdf::pages_iter()`]. Pages are not retained after being
/// yielded.
pub struct PagesIter<'a> {
    pdf: &'a Pdf,
    current: usize,
    count: usize,
}

impl Iterator for PagesIter<'_> {
    type Item = Result<Page, PdfError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.count {
            return None;
        }
        let result = self.pdf.page(self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PagesIter<'_> {}

/// A PDF document opened for extraction.
///
/// ```ignore
/// let pdf = Pdf::open_file("report.pdf", None)?;
/// let page = pdf.page(0)?;
/// let text = page.extract_text(&TextOptions::default());
/// ```
pub struct Pdf {
    doc: LopdfDocument,
    options: ExtractOptions,
    /// MediaBox of each page, in PDF user space.
    media_boxes: Vec<BBox>,
    metadata: DocumentMetadata,
}

impl std::fmt::Debug for Pdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdf")
            .field("page_count", &self.media_boxes.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Collects interpreter events for one page.
struct CollectingHandler {
    chars: Vec<CharEvent>,
    warnings: Vec<ExtractWarning>,
    page_index: usize,
    collect_warnings: bool,
}

impl CollectingHandler {
    fn new(page_index: usize, collect_warnings: bool) -> Self {
        Self {
            chars: Vec::new(),
            warnings: Vec::new(),
            page_index,
            collect_warnings,
        }
    }
}

impl ContentHandler for CollectingHandler {
    fn on_char(&mut self, event: CharEvent) {
        self.chars.push(event);
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        if !self.collect_warnings {
            return;
        }
        let warning = match warning.page {
            Some(_) => warning,
            None => warning.on_page(self.page_index),
        };
        self.warnings.push(warning);
    }
}

impl Pdf {
    /// Open a PDF document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IoError`] if the file cannot be read, and the
    /// errors of [`Pdf::open`] otherwise.
    pub fn open_file(
        path: impl AsRef<Path>,
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes, options)
    }

    /// Open a PDF document from bytes. Uses default options if `options` is
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PasswordRequired`] if the PDF is encrypted,
    /// [`PdfError::ResourceLimitExceeded`] if the input or page count exceed
    /// the configured limits, and [`PdfError::ParseError`] if the bytes are
    /// not a valid PDF.
    pub fn open(bytes: &[u8], options: Option<ExtractOptions>) -> Result<Self, PdfError> {
        let options = options.unwrap_or_default();
        ExtractOptions::check_limit("max_input_bytes", options.max_input_bytes, bytes.len())?;
        let doc = LopdfBackend::open(bytes)?;
        Self::from_doc(doc, options)
    }

    /// Open an encrypted PDF document from bytes. Unencrypted documents
    /// ignore the password.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::InvalidPassword`] if the password is wrong, and
    /// the errors of [`Pdf::open`] otherwise.
    pub fn open_with_password(
        bytes: &[u8],
        password: &[u8],
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let options = options.unwrap_or_default();
        ExtractOptions::check_limit("max_input_bytes", options.max_input_bytes, bytes.len())?;
        let doc = LopdfBackend::open_with_password(bytes, password)?;
        Self::from_doc(doc, options)
    }

    /// Open an encrypted PDF document from a file path.
    ///
    /// # Errors
    ///
    /// See [`Pdf::open_file`] and [`Pdf::open_with_password`].
    pub fn open_file_with_password(
        path: impl AsRef<Path>,
        password: &[u8],
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open_with_password(&bytes, password, options)
    }

    fn from_doc(doc: LopdfDocument, options: ExtractOptions) -> Result<Self, PdfError> {
        let page_count = LopdfBackend::page_count(&doc);
        ExtractOptions::check_limit("max_pages", options.max_pages, page_count)?;

        let media_boxes = (0..page_count)
            .map(|i| {
                let page = LopdfBackend::get_page(&doc, i)?;
                LopdfBackend::page_media_box(&doc, &page)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let metadata = LopdfBackend::document_metadata(&doc)?;

        Ok(Self {
            doc,
            options,
            media_boxes,
            metadata,
        })
    }

    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    /// Document metadata from the `/Info` dictionary.
    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Iterate over pages in document order.
    ///
    /// ```ignore
    /// for page in pdf.pages_iter() {
    ///     let page = page?;
    ///     println!("{}", page.extract_text(&TextOptions::default()));
    /// }
    /// ```
    pub fn pages_iter(&self) -> PagesIter<'_> {
        PagesIter {
            pdf: self,
            current: 0,
            count: self.page_count(),
        }
    }

    /// Interpret the page at a 0-based index.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the index is out of range or the page
    /// content cannot be interpreted.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        let backend_page = LopdfBackend::get_page(&self.doc, index)?;
        let media_box = self.media_boxes[index];

        let mut handler = CollectingHandler::new(index, self.options.collect_warnings);
        LopdfBackend::interpret_page(&self.doc, &backend_page, &mut handler, &self.options)?;

        // y is flipped against the top edge of the MediaBox
        let flip_height = media_box.bottom;
        let mut chars: Vec<Char> = handler
            .chars
            .iter()
            .map(|event| char_from_event(event, flip_height))
            .collect();
        normalize_chars(&mut chars, self.options.unicode_norm);

        tracing::debug!(
            page = index + 1,
            chars = chars.len(),
            warnings = handler.warnings.len(),
            "page interpreted"
        );
        Ok(Page::new(
            index,
            media_box.width(),
            media_box.height(),
            chars,
            handler.warnings,
        ))
    }
}
