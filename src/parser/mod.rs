//! PDF reading: content streams to page layouts.

mod backend;
mod content;
mod layout;
mod options;
mod pdf_parser;

pub use backend::{
    decode_text_simple, ContentOp, LopdfBackend, ObjectRef, PageId, PdfBackend, PdfValue, XObject,
};
pub use content::{ContentInterpreter, PageContent};
pub use layout::{LayoutAnalyzer, TextLine, TextSpan};
pub use options::{ErrorMode, PageSelection, ParseOptions, DEFAULT_BLOCK_START_PATTERN};
pub use pdf_parser::PdfParser;
