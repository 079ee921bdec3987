//! The planner document: ordered pages plus the editing cursor
//! (current page and selected block).

use crate::{AssetRef, Block, BlockId, CanvasSize, DocModelError, Page, PageId, Result, StartDay};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

/// Construction-time configuration for a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentConfig {
    /// Fixed page dimensions
    pub canvas: CanvasSize,
    /// Background given to blank pages
    pub default_background: AssetRef,
    /// Initial week-start convention
    pub start_day: StartDay,
    /// Name of the page every new document starts with
    pub first_page_name: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::PLANNER,
            default_background: AssetRef::new("backgroundwithtabs.png"),
            start_day: StartDay::Sunday,
            first_page_name: "Planner Start".to_string(),
        }
    }
}

/// In-memory editing state for one planner.
///
/// Deserialization checks the same invariants the constructors keep: at
/// least one page, a valid current page, a selection that resolves and
/// unique page and block ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct PlannerDocument {
    config: DocumentConfig,
    /// Pages in output order
    pages: Vec<Page>,
    /// Always a valid index into `pages`
    current_page_index: usize,
    /// Always resolves on the current page when set
    selected_block: Option<BlockId>,
    /// Global week-start convention for new bundles and exports
    start_day: StartDay,
}

impl PlannerDocument {
    /// Create a document holding a single blank page
    pub fn new(config: DocumentConfig) -> Self {
        let first = Page::new(config.first_page_name.clone(), config.default_background.clone());
        Self {
            start_day: config.start_day,
            config,
            pages: vec![first],
            current_page_index: 0,
            selected_block: None,
        }
    }

    /// Create a document from existing pages
    pub fn with_pages(config: DocumentConfig, pages: Vec<Page>) -> Result<Self> {
        if pages.is_empty() {
            return Err(DocModelError::EmptyDocument);
        }
        Ok(Self {
            start_day: config.start_day,
            config,
            pages,
            current_page_index: 0,
            selected_block: None,
        })
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn canvas(&self) -> CanvasSize {
        self.config.canvas
    }

    pub fn default_background(&self) -> &AssetRef {
        &self.config.default_background
    }

    pub fn start_day(&self) -> StartDay {
        self.start_day
    }

    pub fn set_start_day(&mut self, start_day: StartDay) {
        self.start_day = start_day;
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Result<&Page> {
        let len = self.pages.len();
        self.pages
            .get(index)
            .ok_or(DocModelError::PageIndexOutOfRange { index, len })
    }

    pub fn page_mut(&mut self, index: usize) -> Result<&mut Page> {
        let len = self.pages.len();
        self.pages
            .get_mut(index)
            .ok_or(DocModelError::PageIndexOutOfRange { index, len })
    }

    /// Iterate over every page mutably
    pub fn pages_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.pages.iter_mut()
    }

    /// Index of a page by id
    pub fn index_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id() == id)
    }

    pub fn current_page_index(&self) -> usize {
        self.current_page_index
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current_page_index]
    }

    pub fn current_page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.current_page_index]
    }

    /// Switch the current page. The selection is cleared.
    pub fn set_current_page(&mut self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(DocModelError::PageIndexOutOfRange {
                index,
                len: self.pages.len(),
            });
        }
        self.current_page_index = index;
        self.selected_block = None;
        Ok(())
    }

    pub fn selected_block_id(&self) -> Option<BlockId> {
        self.selected_block
    }

    /// The selected block on the current page, if any
    pub fn selected_block(&self) -> Option<&Block> {
        self.selected_block
            .and_then(|id| self.current_page().block(id))
    }

    /// Select a block on the current page, or clear the selection
    pub fn select_block(&mut self, id: Option<BlockId>) -> Result<()> {
        if let Some(id) = id {
            if !self.current_page().contains_block(id) {
                return Err(DocModelError::BlockNotFound(id));
            }
        }
        self.selected_block = id;
        Ok(())
    }

    /// Append a page and make it current
    pub fn push_page(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.current_page_index = self.pages.len() - 1;
        self.selected_block = None;
        self.current_page_index
    }

    /// Append several pages at once without moving the current page.
    /// Returns the index range the pages now occupy.
    pub fn append_pages(&mut self, pages: Vec<Page>) -> Range<usize> {
        let start = self.pages.len();
        self.pages.extend(pages);
        start..self.pages.len()
    }

    /// Whether a page with this id exists
    pub fn contains_page_id(&self, id: PageId) -> bool {
        self.pages.iter().any(|p| p.id() == id)
    }

    /// Re-establish the cursor invariants after an arbitrary mutation
    pub fn normalize(&mut self) {
        if self.current_page_index >= self.pages.len() {
            self.current_page_index = self.pages.len().saturating_sub(1);
        }
        if let Some(id) = self.selected_block {
            if !self.current_page().contains_block(id) {
                self.selected_block = None;
            }
        }
    }
}

#[derive(Deserialize)]
struct RawDocument {
    config: DocumentConfig,
    pages: Vec<Page>,
    current_page_index: usize,
    selected_block: Option<BlockId>,
    start_day: StartDay,
}

impl TryFrom<RawDocument> for PlannerDocument {
    type Error = DocModelError;

    fn try_from(raw: RawDocument) -> Result<Self> {
        let mut doc = PlannerDocument::with_pages(raw.config, raw.pages)?;
        doc.start_day = raw.start_day;

        let mut page_ids = HashSet::new();
        let mut block_ids = HashSet::new();
        for page in &doc.pages {
            if !page_ids.insert(page.id()) {
                return Err(DocModelError::DuplicateId(page.id().to_string()));
            }
            for block in page.blocks() {
                if !block_ids.insert(block.id()) {
                    return Err(DocModelError::DuplicateId(block.id().to_string()));
                }
            }
        }

        doc.set_current_page(raw.current_page_index)?;
        doc.select_block(raw.selected_block)?;
        Ok(doc)
    }
}

impl Default for PlannerDocument {
    fn default() -> Self {
        Self::new(DocumentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;

    #[test]
    fn test_new_document_has_one_blank_page() {
        let doc = PlannerDocument::default();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.current_page_index(), 0);
        assert!(doc.current_page().blocks().is_empty());
        assert_eq!(doc.current_page().name, "Planner Start");
    }

    #[test]
    fn test_with_pages_rejects_empty() {
        let result = PlannerDocument::with_pages(DocumentConfig::default(), vec![]);
        assert_eq!(result.unwrap_err(), DocModelError::EmptyDocument);
    }

    #[test]
    fn test_push_page_moves_cursor() {
        let mut doc = PlannerDocument::default();
        let index = doc.push_page(Page::new("Second", "bg.png"));
        assert_eq!(index, 1);
        assert_eq!(doc.current_page_index(), 1);
    }

    #[test]
    fn test_select_block_must_resolve() {
        let mut doc = PlannerDocument::default();
        let block = Block::new("a.svg", Rect::new(0.0, 0.0, 10.0, 10.0), false).unwrap();
        let id = block.id();

        assert!(doc.select_block(Some(id)).is_err());
        doc.current_page_mut().push_block(block);
        doc.select_block(Some(id)).unwrap();
        assert_eq!(doc.selected_block_id(), Some(id));
    }

    #[test]
    fn test_normalize_clears_dangling_selection() {
        let mut doc = PlannerDocument::default();
        let block = Block::new("a.svg", Rect::new(0.0, 0.0, 10.0, 10.0), false).unwrap();
        let id = block.id();
        doc.current_page_mut().push_block(block);
        doc.select_block(Some(id)).unwrap();

        doc.current_page_mut().remove_block(id);
        doc.normalize();
        assert_eq!(doc.selected_block_id(), None);
    }

    #[test]
    fn test_set_current_page_out_of_range() {
        let mut doc = PlannerDocument::default();
        assert_eq!(
            doc.set_current_page(3),
            Err(DocModelError::PageIndexOutOfRange { index: 3, len: 1 })
        );
    }

    fn document_json() -> serde_json::Value {
        let mut doc = PlannerDocument::default();
        let block = Block::new("a.svg", Rect::new(0.0, 0.0, 10.0, 10.0), false).unwrap();
        let id = block.id();
        doc.current_page_mut().push_block(block);
        doc.select_block(Some(id)).unwrap();
        doc.push_page(Page::new("Second", "bg.png"));
        doc.set_current_page(0).unwrap();
        doc.select_block(Some(id)).unwrap();
        serde_json::to_value(&doc).unwrap()
    }

    #[test]
    fn test_deserialize_valid_document() {
        let doc: PlannerDocument = serde_json::from_value(document_json()).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert!(doc.selected_block().is_some());
    }

    #[test]
    fn test_deserialize_rejects_empty_pages() {
        let mut json = document_json();
        json["pages"] = serde_json::json!([]);
        assert!(serde_json::from_value::<PlannerDocument>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_bad_cursor() {
        let mut json = document_json();
        json["current_page_index"] = 2.into();
        assert!(serde_json::from_value::<PlannerDocument>(json).is_err());

        let mut json = document_json();
        json["current_page_index"] = 1.into();
        // Selection lives on page 0
        assert!(serde_json::from_value::<PlannerDocument>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_duplicate_ids() {
        let mut json = document_json();
        let first = json["pages"][0].clone();
        json["pages"][1] = first;
        assert!(serde_json::from_value::<PlannerDocument>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_invalid_block_geometry() {
        let mut json = document_json();
        json["pages"][0]["blocks"][0]["rect"]["height"] = 0.0.into();
        assert!(serde_json::from_value::<PlannerDocument>(json).is_err());
    }
}
