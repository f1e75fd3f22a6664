//! PDF rendering
//!
//! This module handles all PDF-specific operations:
//! - Embedding JPEG page tiles as image XObjects
//! - Building one output page per tile, scaled to the physical page size
//! - Assembling the page tree and serializing the document

mod page;
mod xobject;

pub use page::PdfSink;
pub use xobject::create_jpeg_xobject;
