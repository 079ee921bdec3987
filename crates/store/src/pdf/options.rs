//! PDF Export Options

use super::document::DocumentInfo;
use serde::{Deserialize, Serialize};

/// Metadata and stream options for the planner PDF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfOptions {
    #[serde(default = "default_title")]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_creator")]
    pub creator: Option<String>,
    /// Flate-compress content streams (page images are already JPEG)
    #[serde(default = "default_compress")]
    pub compress: bool,
}

fn default_title() -> Option<String> {
    Some("Therapist Planner 2026".to_string())
}

fn default_creator() -> Option<String> {
    Some("Planner Studio".to_string())
}

fn default_compress() -> bool {
    true
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            title: default_title(),
            author: None,
            subject: None,
            keywords: Vec::new(),
            creator: default_creator(),
            compress: default_compress(),
        }
    }
}

impl PdfOptions {
    /// Info dictionary contents for a file written now
    pub fn document_info(&self) -> DocumentInfo {
        DocumentInfo {
            title: self.title.clone(),
            author: self.author.clone(),
            subject: self.subject.clone(),
            keywords: self.keywords.clone(),
            creator: self.creator.clone(),
            ..DocumentInfo::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let options: PdfOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, PdfOptions::default());
        assert!(options.compress);
    }

    #[test]
    fn test_document_info_carries_metadata() {
        let options = PdfOptions {
            author: Some("Dr. Reyes".to_string()),
            ..PdfOptions::default()
        };
        let info = options.document_info();
        assert_eq!(info.author.as_deref(), Some("Dr. Reyes"));
        assert!(info.producer.is_some());
        assert!(info.creation_date.is_some());
    }
}
