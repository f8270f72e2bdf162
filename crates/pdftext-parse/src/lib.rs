//! pdftext-parse: PDF parsing backend and content stream interpreter.
//!
//! Reads documents through lopdf, interprets page content streams and
//! reports positioned glyphs to a [`ContentHandler`]. Shared data types live
//! in pdftext-core.

pub mod backend;
pub mod char_extraction;
pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font;
pub mod font_metrics;
pub mod handler;
pub mod interpreter;
pub mod lopdf_backend;
mod objects;
pub mod text_renderer;
pub mod text_state;
pub mod tokenizer;

pub use backend::PdfBackend;
pub use char_extraction::char_from_event;
pub use error::BackendError;
pub use handler::{CharEvent, ContentHandler};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use pdftext_core;
