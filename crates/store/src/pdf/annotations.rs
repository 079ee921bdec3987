//! Internal link annotations
//!
//! Links are invisible `/Link` annotations that jump to another page of the
//! same file with a `/Fit` destination.

use super::objects::{ObjectId, PdfDictionary, PdfObject};
use doc_model::Rect;

/// A link rectangle in PDF user space (origin at lower-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkAnnotation {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
    /// 1-based page number the link jumps to
    pub destination: usize,
}

impl LinkAnnotation {
    /// Convert a canvas rectangle (origin top-left, y down) on a page of
    /// `page_height` units into PDF user space
    pub fn from_canvas(rect: Rect, page_height: f64, destination: usize) -> Self {
        Self {
            llx: rect.x,
            lly: page_height - rect.bottom(),
            urx: rect.right(),
            ury: page_height - rect.y,
            destination,
        }
    }

    /// Annotation dictionary for a link on `page_ref` pointing at `dest_ref`
    pub fn to_dictionary(&self, page_ref: ObjectId, dest_ref: ObjectId) -> PdfDictionary {
        PdfDictionary::typed("Annot")
            .with("Subtype", PdfObject::name("Link"))
            .with("Rect", PdfObject::rect(self.llx, self.lly, self.urx, self.ury))
            .with("Border", vec![PdfObject::Integer(0); 3])
            .with("P", PdfObject::Reference(page_ref))
            .with(
                "Dest",
                vec![PdfObject::Reference(dest_ref), PdfObject::name("Fit")],
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_canvas_flips_y() {
        let link = LinkAnnotation::from_canvas(Rect::new(1477.0, 166.0, 59.0, 125.0), 2048.0, 3);
        assert_eq!(link.llx, 1477.0);
        assert_eq!(link.urx, 1536.0);
        assert_eq!(link.ury, 2048.0 - 166.0);
        assert_eq!(link.lly, 2048.0 - 291.0);
    }

    #[test]
    fn test_dictionary_is_invisible_fit_link() {
        let link = LinkAnnotation::from_canvas(Rect::new(0.0, 0.0, 10.0, 10.0), 100.0, 1);
        let dict = link.to_dictionary(5, 9);
        assert_eq!(dict.get("Subtype"), Some(&PdfObject::name("Link")));
        assert_eq!(
            dict.get("Border"),
            Some(&PdfObject::Array(vec![PdfObject::Integer(0); 3]))
        );
        assert_eq!(
            dict.get("Dest"),
            Some(&PdfObject::Array(vec![PdfObject::Reference(9), PdfObject::name("Fit")]))
        );
    }
}
