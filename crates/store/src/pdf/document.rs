//! PDF Document Structure
//!
//! Catalog, page tree, page media box and the info dictionary.

use super::objects::{ObjectId, PdfDictionary, PdfObject};
use chrono::{DateTime, Utc};

/// Header version written by the planner writer
pub const PDF_VERSION: &str = "1.4";

/// PDF document information
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Vec<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    pub fn new() -> Self {
        Self {
            producer: Some("Planner Studio PDF Export".to_string()),
            creation_date: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn to_dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        let text_fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                dict.insert(key, PdfObject::string(value.as_str()));
            }
        }
        if !self.keywords.is_empty() {
            dict.insert("Keywords", PdfObject::string(self.keywords.join(", ")));
        }
        if let Some(date) = self.creation_date {
            dict.insert("CreationDate", PdfObject::string(pdf_date(date)));
        }
        dict
    }
}

/// PDF date string, e.g. `D:20260101093000+00'00'`
pub fn pdf_date(date: DateTime<Utc>) -> String {
    format!("D:{}+00'00'", date.format("%Y%m%d%H%M%S"))
}

/// Page media box (page dimensions, origin at lower-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub width: f64,
    pub height: f64,
}

impl MediaBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn to_array(&self) -> PdfObject {
        PdfObject::rect(0.0, 0.0, self.width, self.height)
    }
}

/// Document catalog pointing at the page tree
pub fn create_catalog(pages_ref: ObjectId) -> PdfDictionary {
    PdfDictionary::typed("Catalog")
        .with("Pages", PdfObject::Reference(pages_ref))
        .with("PageMode", PdfObject::name("UseNone"))
}

/// Flat page tree root
pub fn create_pages(page_refs: &[ObjectId]) -> PdfDictionary {
    let kids = page_refs.iter().map(|&r| PdfObject::Reference(r)).collect::<Vec<_>>();
    PdfDictionary::typed("Pages")
        .with("Kids", kids)
        .with("Count", page_refs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pdf_date_format() {
        let date = Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap();
        assert_eq!(pdf_date(date), "D:20260105093000+00'00'");
    }

    #[test]
    fn test_info_skips_missing_fields() {
        let info = DocumentInfo {
            title: Some("Planner".to_string()),
            ..Default::default()
        };
        let dict = info.to_dictionary();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("Title"), Some(&PdfObject::string("Planner")));
    }

    #[test]
    fn test_pages_tree() {
        let pages = create_pages(&[4, 7]);
        assert_eq!(pages.get("Count"), Some(&PdfObject::Integer(2)));
        assert_eq!(
            pages.get("Kids"),
            Some(&PdfObject::Array(vec![PdfObject::Reference(4), PdfObject::Reference(7)]))
        );
    }
}
