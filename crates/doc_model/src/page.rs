//! Pages: ordered block lists with a background and a semantic classification

use crate::bundle::calendar_asset;
use crate::{AssetRef, Block, BlockId, MonthCode, PageId, Section, StartDay};
use serde::{Deserialize, Serialize};

/// Structural role of a page within a month bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PageType {
    #[default]
    None,
    Month,
    Week,
    Day,
}

/// One canvas-sized page of the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    id: PageId,
    /// Human-readable label, not required to be unique
    pub name: String,
    pub section: Section,
    pub page_type: PageType,
    /// Background asset, drawn beneath every block
    pub background: AssetRef,
    /// Blocks in z-order; later entries draw on top
    blocks: Vec<Block>,
}

impl Page {
    /// Create an empty page with a fresh id
    pub fn new(name: impl Into<String>, background: impl Into<AssetRef>) -> Self {
        Self {
            id: PageId::new(),
            name: name.into(),
            section: Section::None,
            page_type: PageType::None,
            background: background.into(),
            blocks: Vec::new(),
        }
    }

    /// Set the semantic classification
    pub fn with_classification(mut self, section: Section, page_type: PageType) -> Self {
        self.section = section;
        self.page_type = page_type;
        self
    }

    /// Append blocks
    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = Block>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id() == id)
    }

    pub fn contains_block(&self, id: BlockId) -> bool {
        self.block(id).is_some()
    }

    /// Append a block on top of the others
    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Remove a block, returning it if present
    pub fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|b| b.id() == id)?;
        Some(self.blocks.remove(index))
    }

    /// Replace the whole block list
    pub fn replace_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
    }

    /// Drop every unlocked block. Returns how many were removed.
    pub fn retain_locked(&mut self) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.locked);
        before - self.blocks.len()
    }

    /// Deep copies of this page's blocks, each with a new id
    pub fn duplicate_blocks(&self) -> Vec<Block> {
        self.blocks.iter().map(Block::duplicate).collect()
    }

    /// Structural copy of the whole page with new page and block ids
    pub fn duplicate(&self) -> Page {
        Page {
            id: PageId::new(),
            blocks: self.duplicate_blocks(),
            ..self.clone()
        }
    }

    /// Month this page belongs to: the section, or a month code found in the name
    pub fn resolve_month(&self) -> Option<MonthCode> {
        self.section.month().or_else(|| MonthCode::find_in(&self.name))
    }

    /// Whether `block` is the calendar grid of this month page: a block
    /// bound to one of the page month's calendar assets
    pub fn is_calendar_grid(&self, block: &Block) -> bool {
        if self.page_type != PageType::Month {
            return false;
        }
        let Some(month) = self.section.month() else {
            return false;
        };
        StartDay::ALL
            .into_iter()
            .any(|start_day| block.asset == calendar_asset(month, start_day))
    }

    /// The calendar grid block, if this is a month page that carries one
    pub fn calendar_grid(&self) -> Option<&Block> {
        self.blocks.iter().find(|b| self.is_calendar_grid(b))
    }

    /// Whether this page is a month overview (by type, or by name)
    pub fn is_month_overview(&self) -> bool {
        self.page_type == PageType::Month || self.name.to_uppercase().contains("OVERVIEW")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;

    fn block(asset: &str, locked: bool) -> Block {
        Block::new(asset, Rect::new(0.0, 0.0, 100.0, 100.0), locked).unwrap()
    }

    #[test]
    fn test_retain_locked() {
        let mut page = Page::new("Test", "bg.png")
            .with_blocks([block("a.svg", true), block("b.svg", false), block("c.svg", false)]);
        assert_eq!(page.retain_locked(), 2);
        assert_eq!(page.blocks().len(), 1);
        assert_eq!(page.retain_locked(), 0);
    }

    #[test]
    fn test_duplicate_remaps_every_id() {
        let page = Page::new("Test", "bg.png").with_blocks([block("a.svg", false), block("b.svg", true)]);
        let copy = page.duplicate();

        assert_ne!(copy.id(), page.id());
        assert_eq!(copy.blocks().len(), page.blocks().len());
        for (a, b) in copy.blocks().iter().zip(page.blocks()) {
            assert_ne!(a.id(), b.id());
            assert!(a.same_content(b));
        }
    }

    #[test]
    fn test_calendar_grid_only_on_month_pages() {
        let pages = crate::generate_month_bundle(MonthCode::Mar, StartDay::Monday, &AssetRef::new("bg.png")).unwrap();
        let grid = pages[0].calendar_grid().unwrap();
        assert!(grid.locked);
        assert_eq!(grid.asset.as_str(), "marmondaystart.svg");

        let header = &pages[0].blocks()[1];
        assert!(!pages[0].is_calendar_grid(header));

        // Same asset on a non-month page is just a block
        let loose = Page::new("Notes", "bg.png").with_blocks([grid.clone()]);
        assert!(loose.calendar_grid().is_none());
    }

    #[test]
    fn test_overview_detection() {
        let by_type = Page::new("Anything", "bg.png")
            .with_classification(Section::Month(MonthCode::Apr), PageType::Month);
        let by_name = Page::new("May Overview", "bg.png");
        let neither = Page::new("May Day 1", "bg.png");

        assert!(by_type.is_month_overview());
        assert!(by_name.is_month_overview());
        assert!(!neither.is_month_overview());
        assert_eq!(by_name.resolve_month(), Some(MonthCode::May));
    }
}
