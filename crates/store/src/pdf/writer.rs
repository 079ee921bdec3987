//! PDF Writer
//!
//! Two layers:
//! - [`PdfWriter`]: object numbering, byte offsets, stream compression and
//!   the cross-reference table and trailer
//! - [`PlannerPdfWriter`]: the page-image-plus-links document writer used
//!   by the export pipeline, behind the [`DocumentWriter`] trait
//!
//! Page images are written to the output as soon as they are added. Page
//! dictionaries and link annotations are written at [`PlannerPdfWriter::finish`],
//! because a link may point at a page that has not been added yet.

use super::annotations::LinkAnnotation;
use super::content::ContentStream;
use super::document::{create_catalog, create_pages, MediaBox, PDF_VERSION};
use super::images::JpegImage;
use super::objects::{ObjectId, PdfDictionary, PdfObject, PdfSerializer, PdfStream};
use super::options::PdfOptions;
use doc_model::Rect;
use std::collections::BTreeMap;
use std::io::{self, Write};
use thiserror::Error;

/// Error type for PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Link to page {destination} but the document has {page_count} pages")]
    InvalidLinkTarget { destination: usize, page_count: usize },

    #[error("No page has been added yet")]
    NoCurrentPage,
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Low-level PDF file writer
pub struct PdfWriter<W: Write> {
    writer: W,
    /// Current byte position
    position: u64,
    /// Byte offset of every written object
    offsets: BTreeMap<ObjectId, u64>,
    next_id: ObjectId,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            position: 0,
            offsets: BTreeMap::new(),
            next_id: 1,
            compress: true,
        }
    }

    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Reserve the next object number
    pub fn allocate(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.write_str(&format!("%PDF-{}\n", PDF_VERSION))?;
        // Binary marker so transfer tools treat the file as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    /// Write an indirect object
    pub fn write_object(&mut self, id: ObjectId, object: &PdfObject) -> Result<()> {
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(object)?;
        let body = serializer.into_inner();
        self.write_indirect(id, &body)
    }

    /// Write a stream object, compressing it first if enabled
    pub fn write_stream(&mut self, id: ObjectId, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.encoded {
            stream = compress_stream(stream)?;
        }
        stream.dict.insert("Length", stream.data.len());

        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_stream(&stream)?;
        let body = serializer.into_inner();
        self.write_indirect(id, &body)
    }

    fn write_indirect(&mut self, id: ObjectId, body: &[u8]) -> Result<()> {
        if self.offsets.contains_key(&id) {
            return Err(PdfError::InvalidDocument(format!("object {} written twice", id)));
        }
        self.offsets.insert(id, self.position);
        self.write_str(&format!("{} 0 obj\n", id))?;
        self.write_bytes(body)?;
        self.write_str("\nendobj\n")
    }

    /// Write the cross-reference table and trailer
    pub fn write_xref_and_trailer(&mut self, root: ObjectId, info: Option<ObjectId>) -> Result<()> {
        let xref_offset = self.position;
        let size = self.next_id;

        let mut table = String::with_capacity(20 * size as usize + 16);
        table.push_str(&format!("xref\n0 {}\n", size));
        table.push_str("0000000000 65535 f \n");
        for id in 1..size {
            match self.offsets.get(&id) {
                Some(offset) => table.push_str(&format!("{:010} 00000 n \n", offset)),
                // Allocated but never written
                None => table.push_str("0000000000 65535 f \n"),
            }
        }
        self.write_str(&table)?;

        let mut trailer = PdfDictionary::new()
            .with("Size", size)
            .with("Root", PdfObject::Reference(root));
        if let Some(info) = info {
            trailer.insert("Info", PdfObject::Reference(info));
        }
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_dictionary(&trailer)?;
        let trailer = serializer.into_inner();

        self.write_str("trailer\n")?;
        self.write_bytes(&trailer)?;
        self.write_str(&format!("\nstartxref\n{}\n%%EOF\n", xref_offset))
    }

    /// Flush and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn compress_stream(stream: PdfStream) -> Result<PdfStream> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&stream.data)?;
    let data = encoder.finish()?;
    Ok(PdfStream::encoded(stream.dict, data, "FlateDecode"))
}

/// Consumed document-writer interface of the export pipeline.
///
/// Coordinates are canvas units with the origin at the top-left of the page;
/// page numbers are 1-based.
pub trait DocumentWriter {
    /// Start a new output page and return its page number
    fn add_page(&mut self, width: f64, height: f64) -> Result<usize>;

    /// Paint an image onto the most recent page
    fn add_page_image(&mut self, image: JpegImage, rect: Rect) -> Result<()>;

    /// Add an invisible clickable region on the most recent page
    fn add_link(&mut self, rect: Rect, destination: usize) -> Result<()>;

    fn page_count(&self) -> usize;
}

struct PageRecord {
    page_ref: ObjectId,
    media_box: MediaBox,
    content: ContentStream,
    /// Image resource name -> XObject
    images: Vec<(String, ObjectId)>,
    links: Vec<LinkAnnotation>,
}

/// PDF writer for planner exports: one raster per page plus link regions
pub struct PlannerPdfWriter<W: Write> {
    pdf: PdfWriter<W>,
    options: PdfOptions,
    catalog_ref: ObjectId,
    pages_ref: ObjectId,
    info_ref: ObjectId,
    pages: Vec<PageRecord>,
}

impl<W: Write> PlannerPdfWriter<W> {
    /// Start a document on `writer`; the header is written immediately
    pub fn new(writer: W, options: PdfOptions) -> Result<Self> {
        let mut pdf = PdfWriter::new(writer);
        pdf.set_compression(options.compress);
        pdf.write_header()?;

        let catalog_ref = pdf.allocate();
        let pages_ref = pdf.allocate();
        let info_ref = pdf.allocate();

        Ok(Self {
            pdf,
            options,
            catalog_ref,
            pages_ref,
            info_ref,
            pages: Vec::new(),
        })
    }

    fn current_page(&mut self) -> Result<&mut PageRecord> {
        self.pages.last_mut().ok_or(PdfError::NoCurrentPage)
    }

    /// Write page tree, annotations, catalog, info and trailer
    pub fn finish(mut self) -> Result<W> {
        if self.pages.is_empty() {
            return Err(PdfError::InvalidDocument("No pages to export".to_string()));
        }

        let page_count = self.pages.len();
        let page_refs: Vec<ObjectId> = self.pages.iter().map(|p| p.page_ref).collect();

        for page in std::mem::take(&mut self.pages) {
            let mut annot_refs = Vec::with_capacity(page.links.len());
            for link in &page.links {
                if link.destination == 0 || link.destination > page_count {
                    return Err(PdfError::InvalidLinkTarget {
                        destination: link.destination,
                        page_count,
                    });
                }
                let annot_ref = self.pdf.allocate();
                let dest_ref = page_refs[link.destination - 1];
                let annot = link.to_dictionary(page.page_ref, dest_ref);
                self.pdf.write_object(annot_ref, &annot.into())?;
                annot_refs.push(PdfObject::Reference(annot_ref));
            }

            let content_ref = self.pdf.allocate();
            self.pdf
                .write_stream(content_ref, PdfStream::new(page.content.into_bytes()))?;

            let mut xobjects = PdfDictionary::new();
            for (name, image_ref) in &page.images {
                xobjects.insert(name.clone(), PdfObject::Reference(*image_ref));
            }
            let resources = PdfDictionary::new()
                .with("XObject", xobjects)
                .with("ProcSet", vec![PdfObject::name("PDF"), PdfObject::name("ImageC")]);

            let mut page_dict = PdfDictionary::typed("Page")
                .with("Parent", PdfObject::Reference(self.pages_ref))
                .with("MediaBox", page.media_box.to_array())
                .with("Contents", PdfObject::Reference(content_ref))
                .with("Resources", resources);
            if !annot_refs.is_empty() {
                page_dict.insert("Annots", annot_refs);
            }
            self.pdf.write_object(page.page_ref, &page_dict.into())?;
        }

        self.pdf
            .write_object(self.pages_ref, &create_pages(&page_refs).into())?;
        self.pdf
            .write_object(self.catalog_ref, &create_catalog(self.pages_ref).into())?;
        let info = self.options.document_info().to_dictionary();
        self.pdf.write_object(self.info_ref, &info.into())?;

        self.pdf
            .write_xref_and_trailer(self.catalog_ref, Some(self.info_ref))?;
        tracing::debug!(pages = page_count, "PDF finished");
        self.pdf.finish()
    }
}

impl<W: Write> DocumentWriter for PlannerPdfWriter<W> {
    fn add_page(&mut self, width: f64, height: f64) -> Result<usize> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(PdfError::InvalidDocument(format!(
                "page size must be positive, got {} x {}",
                width, height
            )));
        }
        let page_ref = self.pdf.allocate();
        self.pages.push(PageRecord {
            page_ref,
            media_box: MediaBox::new(width, height),
            content: ContentStream::new(),
            images: Vec::new(),
            links: Vec::new(),
        });
        Ok(self.pages.len())
    }

    fn add_page_image(&mut self, image: JpegImage, rect: Rect) -> Result<()> {
        // Fail before writing anything if there is no page
        self.current_page()?;

        let image_ref = self.pdf.allocate();
        self.pdf.write_stream(image_ref, image.to_xobject())?;

        let page = self.current_page()?;
        let name = format!("Im{}", page.images.len());
        let lly = page.media_box.height - rect.bottom();
        page.content
            .draw_image(&name, rect.x, lly, rect.width, rect.height);
        page.images.push((name, image_ref));
        Ok(())
    }

    fn add_link(&mut self, rect: Rect, destination: usize) -> Result<()> {
        let page = self.current_page()?;
        let link = LinkAnnotation::from_canvas(rect, page.media_box.height, destination);
        page.links.push(link);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}
