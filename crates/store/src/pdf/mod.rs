//! PDF Export Module
//!
//! A small PDF writer for raster page exports with internal navigation.
//!
//! # Architecture
//!
//! - `objects`: PDF object model and serializer
//! - `document`: catalog, page tree, media box, info dictionary
//! - `content`: content stream builder
//! - `images`: JPEG image XObjects
//! - `annotations`: invisible link annotations with `/Fit` destinations
//! - `options`: metadata and compression options
//! - `writer`: low-level file writer and the planner document writer

mod annotations;
mod content;
mod document;
mod images;
mod objects;
mod options;
mod writer;

pub use annotations::LinkAnnotation;
pub use document::{pdf_date, DocumentInfo, MediaBox, PDF_VERSION};
pub use images::JpegImage;
pub use options::PdfOptions;
pub use writer::{DocumentWriter, PdfError, PdfWriter, PlannerPdfWriter, Result};

#[cfg(test)]
pub(crate) use images::tests::sample_jpeg;
