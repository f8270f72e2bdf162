//! lopdf-based PDF parsing backend.
//!
//! Implements [`PdfBackend`] on top of [`lopdf::Document`].

use lopdf::{Dictionary, Document, Object, ObjectId};
use pdftext_core::{BBox, DocumentMetadata, ExtractOptions, PdfError};

use crate::backend::PdfBackend;
use crate::error::BackendError;
use crate::handler::ContentHandler;
use crate::interpreter::{InterpreterState, interpret_content_stream};
use crate::objects::{number, resolve, stream_bytes};
use crate::text_state::TextState;

/// US Letter, used when neither a page nor its ancestors carry a MediaBox.
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: Document,
    /// Page object ids in document order.
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    fn new(inner: Document) -> Self {
        let page_ids = inner.get_pages().into_values().collect();
        Self { inner, page_ids }
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A reference to a single page within a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    pub object_id: ObjectId,
    /// 0-based page index.
    pub index: usize,
}

/// The lopdf-based PDF backend.
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = load(bytes)?;
        if inner.is_encrypted() {
            return Err(BackendError::Core(PdfError::PasswordRequired));
        }
        let doc = LopdfDocument::new(inner);
        tracing::debug!(pages = doc.page_ids.len(), "opened document");
        Ok(doc)
    }

    fn open_with_password(bytes: &[u8], password: &[u8]) -> Result<Self::Document, Self::Error> {
        let mut inner = load(bytes)?;
        if inner.is_encrypted() {
            // objects of an encrypted file are only parsed once a password
            // authenticates, so the document is loaded again
            let password = String::from_utf8_lossy(password);
            inner = Document::load_mem_with_password(bytes, &password).map_err(|e| match e {
                lopdf::Error::InvalidPassword => BackendError::Core(PdfError::InvalidPassword),
                other => BackendError::Parse(format!("failed to decrypt PDF: {other}")),
            })?;
        }
        let doc = LopdfDocument::new(inner);
        tracing::debug!(pages = doc.page_ids.len(), "opened document");
        Ok(doc)
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        let object_id = doc.page_ids.get(index).copied().ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            ))
        })?;
        Ok(LopdfPage { object_id, index })
    }

    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<BBox, Self::Error> {
        let Some(obj) = resolve_inherited(&doc.inner, page.object_id, b"MediaBox")? else {
            tracing::warn!(page = page.index + 1, "no MediaBox, assuming US Letter");
            let [x0, y0, x1, y1] = DEFAULT_MEDIA_BOX;
            return Ok(BBox::new(x0, y0, x1, y1));
        };
        let array = resolve(&doc.inner, obj)
            .as_array()
            .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
        bbox_from_array(&doc.inner, array)
    }

    fn document_metadata(doc: &Self::Document) -> Result<DocumentMetadata, Self::Error> {
        Ok(extract_document_metadata(&doc.inner))
    }

    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error> {
        let inner = &doc.inner;
        let page_dict = inner
            .get_dictionary(page.object_id)
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        let content = page_content_bytes(inner, page_dict)?;
        let empty = Dictionary::new();
        let resources = match resolve_inherited(inner, page.object_id, b"Resources")? {
            Some(obj) => resolve(inner, obj)
                .as_dict()
                .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string()))?,
            None => &empty,
        };

        tracing::debug!(
            page = page.index + 1,
            bytes = content.len(),
            "interpreting page"
        );
        interpret_content_stream(
            inner,
            &content,
            resources,
            handler,
            options,
            0,
            &mut InterpreterState::new(),
            &mut TextState::new(),
        )
    }
}

fn load(bytes: &[u8]) -> Result<Document, BackendError> {
    Document::load_mem(bytes).map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))
}

/// Look up `key` on a page, walking up `/Parent` links when the page does
/// not carry it.
fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current = page_id;
    // the page tree is shallow; the bound only guards against /Parent cycles
    for _ in 0..64 {
        let dict = doc
            .get_dictionary(current)
            .map_err(|e| BackendError::Parse(format!("failed to get page tree node: {e}")))?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => current = parent,
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse("page tree /Parent chain is cyclic".to_string()))
}

fn bbox_from_array(doc: &Document, array: &[Object]) -> Result<BBox, BackendError> {
    let values: Option<Vec<f64>> = array.iter().map(|o| number(resolve(doc, o))).collect();
    match values.as_deref() {
        Some([a, b, c, d]) => Ok(BBox::new(a.min(*c), b.min(*d), a.max(*c), b.max(*d))),
        _ => Err(BackendError::Parse(format!(
            "expected 4 numbers for a page box, got {array:?}"
        ))),
    }
}

/// Concatenate the page's content streams. A page without `/Contents` is
/// empty.
fn page_content_bytes(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };
    let streams: Vec<&Object> = match resolve(doc, contents) {
        Object::Array(items) => items.iter().map(|o| resolve(doc, o)).collect(),
        single => vec![single],
    };

    let mut content = Vec::new();
    for obj in streams {
        let stream = obj
            .as_stream()
            .map_err(|e| BackendError::Parse(format!("/Contents entry is not a stream: {e}")))?;
        if !content.is_empty() {
            content.push(b' ');
        }
        content.extend_from_slice(&stream_bytes(stream)?);
    }
    Ok(content)
}

fn extract_document_metadata(doc: &Document) -> DocumentMetadata {
    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok());
    let Some(info) = info else {
        return DocumentMetadata::default();
    };
    let field = |key: &[u8]| info_string(doc, info, key);

    DocumentMetadata {
        title: field(b"Title"),
        author: field(b"Author"),
        subject: field(b"Subject"),
        keywords: field(b"Keywords"),
        creator: field(b"Creator"),
        producer: field(b"Producer"),
        creation_date: field(b"CreationDate"),
        mod_date: field(b"ModDate"),
    }
}

fn info_string(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    match resolve(doc, dict.get(key).ok()?) {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE with a byte order mark, otherwise
/// UTF-8 or Latin-1.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return crate::cmap::decode_utf16be(rest);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
