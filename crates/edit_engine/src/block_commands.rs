//! Block commands: add, move/resize, lock, delete, select and template apply

use crate::{BlockTarget, Command, CommandResult, EditError, Result};
use doc_model::sizing::TEMPLATE_AREA;
use doc_model::{
    AssetRef, Block, BlockId, DocModelError, PageType, PlannerDocument, Rect, SizeProfile,
};
use serde::{Deserialize, Serialize};

/// Add a block to the current page and select it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBlock {
    pub asset: AssetRef,
    pub profile: SizeProfile,
}

impl AddBlock {
    pub fn new(asset: impl Into<AssetRef>, profile: SizeProfile) -> Self {
        Self {
            asset: asset.into(),
            profile,
        }
    }

    /// Let the sizing policy pick the geometry from the asset name
    pub fn auto(asset: impl Into<AssetRef>) -> Self {
        Self::new(asset, SizeProfile::Auto)
    }
}

impl Command for AddBlock {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        let mut doc = document.clone();
        let placement = self.profile.placement(&self.asset, doc.canvas());

        let block = Block::new(self.asset.clone(), placement.rect, placement.locked)?;
        let block_id = block.id();
        doc.current_page_mut().push_block(block);
        doc.select_block(Some(block_id))?;

        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Add Block"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Replace a block's geometry after a drag or resize on the render surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBlockGeometry {
    pub block_id: BlockId,
    pub rect: Rect,
}

impl UpdateBlockGeometry {
    pub fn new(block_id: BlockId, rect: Rect) -> Self {
        Self { block_id, rect }
    }
}

impl Command for UpdateBlockGeometry {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        let mut doc = document.clone();
        let block = doc
            .current_page_mut()
            .block_mut(self.block_id)
            .ok_or(DocModelError::BlockNotFound(self.block_id))?;

        if block.locked {
            return Err(EditError::BlockLocked(self.block_id));
        }
        block.set_rect(self.rect)?;

        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Move Block"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Flip a block's lock state. A month page's calendar grid stays locked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleLock {
    pub target: BlockTarget,
}

impl ToggleLock {
    pub fn new(target: impl Into<BlockTarget>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn selected() -> Self {
        Self {
            target: BlockTarget::Selected,
        }
    }
}

impl Command for ToggleLock {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        let Some(block_id) = self.target.resolve(document) else {
            return Ok(CommandResult::unchanged(document));
        };

        let page = document.current_page();
        let block = page
            .block(block_id)
            .ok_or(DocModelError::BlockNotFound(block_id))?;
        if block.locked && page.is_calendar_grid(block) {
            return Err(EditError::CalendarGridProtected {
                page: document.current_page_index(),
            });
        }

        let mut doc = document.clone();
        let block = doc
            .current_page_mut()
            .block_mut(block_id)
            .ok_or(DocModelError::BlockNotFound(block_id))?;
        block.locked = !block.locked;

        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Toggle Lock"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Remove a block from the current page. A month page's calendar grid
/// cannot be removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBlock {
    pub target: BlockTarget,
}

impl DeleteBlock {
    pub fn new(target: impl Into<BlockTarget>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn selected() -> Self {
        Self {
            target: BlockTarget::Selected,
        }
    }
}

impl Command for DeleteBlock {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        let Some(block_id) = self.target.resolve(document) else {
            return Ok(CommandResult::unchanged(document));
        };

        let page = document.current_page();
        if page.block(block_id).is_some_and(|b| page.is_calendar_grid(b)) {
            return Err(EditError::CalendarGridProtected {
                page: document.current_page_index(),
            });
        }

        let mut doc = document.clone();
        doc.current_page_mut()
            .remove_block(block_id)
            .ok_or(DocModelError::BlockNotFound(block_id))?;
        doc.normalize();

        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Delete Block"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Select a block on the current page, or clear the selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectBlock {
    pub block_id: Option<BlockId>,
}

impl SelectBlock {
    pub fn new(block_id: BlockId) -> Self {
        Self {
            block_id: Some(block_id),
        }
    }

    pub fn clear() -> Self {
        Self { block_id: None }
    }
}

impl Command for SelectBlock {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        if document.selected_block_id() == self.block_id {
            return Ok(CommandResult::unchanged(document));
        }

        let mut doc = document.clone();
        doc.select_block(self.block_id)?;
        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Select Block"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Replace every block on the current page with one locked full-page template.
/// Refused on month pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyTemplate {
    pub asset: AssetRef,
}

impl ApplyTemplate {
    pub fn new(asset: impl Into<AssetRef>) -> Self {
        Self {
            asset: asset.into(),
        }
    }
}

impl Command for ApplyTemplate {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        if document.current_page().page_type == PageType::Month {
            return Err(EditError::CalendarGridProtected {
                page: document.current_page_index(),
            });
        }
        let mut doc = document.clone();

        let template = Block::new(self.asset.clone(), TEMPLATE_AREA, true)?;
        let template_id = template.id();
        doc.current_page_mut().replace_blocks(vec![template]);
        doc.select_block(Some(template_id))?;

        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Apply Template"
    }

    fn is_destructive(&self) -> bool {
        true
    }

    fn confirmation_prompt(&self) -> Option<&str> {
        Some("This will clear the current page and apply the template. Continue?")
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}
