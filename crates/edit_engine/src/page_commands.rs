//! Page commands: create, duplicate, copy layout, clear, background, rename,
//! navigation and the global start-day setting

use crate::{Command, CommandResult, EditError, Result};
use doc_model::{AssetRef, Page, PageType, PlannerDocument, StartDay};
use serde::{Deserialize, Serialize};

/// Append an empty page and make it current
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddBlankPage;

impl AddBlankPage {
    pub fn new() -> Self {
        Self
    }
}

impl Command for AddBlankPage {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        let mut doc = document.clone();
        let page = Page::new("New Page", doc.default_background().clone());
        doc.push_page(page);
        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Add Page"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Append a deep copy of the current page and make it current
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateCurrentPage;

impl DuplicateCurrentPage {
    pub fn new() -> Self {
        Self
    }
}

impl Command for DuplicateCurrentPage {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        let mut doc = document.clone();
        let mut copy = doc.current_page().duplicate();
        copy.name = format!("{} (Copy)", copy.name);
        doc.push_page(copy);
        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Duplicate Page"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Copy the current page's blocks and background onto the following page.
///
/// A month page never receives another layout, since that would drop its
/// calendar grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyLayoutToNextPage;

impl ApplyLayoutToNextPage {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ApplyLayoutToNextPage {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        let next_index = document.current_page_index() + 1;
        if next_index >= document.page_count() {
            return Err(EditError::NoNextPage);
        }
        if document.page(next_index)?.page_type == PageType::Month {
            return Err(EditError::CalendarGridProtected { page: next_index });
        }

        let mut doc = document.clone();
        let blocks = doc.current_page().duplicate_blocks();
        let background = doc.current_page().background.clone();

        let next = doc.page_mut(next_index)?;
        next.replace_blocks(blocks);
        next.background = background;

        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Apply Layout To Next Page"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Remove every unlocked block from the current page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearCurrentPage;

impl ClearCurrentPage {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ClearCurrentPage {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        let mut doc = document.clone();
        if doc.current_page_mut().retain_locked() == 0 {
            return Ok(CommandResult::unchanged(document));
        }
        doc.normalize();
        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Clear Page"
    }

    fn is_destructive(&self) -> bool {
        true
    }

    fn confirmation_prompt(&self) -> Option<&str> {
        Some("Clear all unlocked items?")
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Set the background of the current page, or of every page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeBackground {
    pub asset: AssetRef,
    pub apply_to_all: bool,
}

impl ChangeBackground {
    pub fn current(asset: impl Into<AssetRef>) -> Self {
        Self {
            asset: asset.into(),
            apply_to_all: false,
        }
    }

    pub fn all(asset: impl Into<AssetRef>) -> Self {
        Self {
            asset: asset.into(),
            apply_to_all: true,
        }
    }
}

impl Command for ChangeBackground {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        let mut doc = document.clone();
        if self.apply_to_all {
            for page in doc.pages_mut() {
                page.background = self.asset.clone();
            }
        } else {
            doc.current_page_mut().background = self.asset.clone();
        }
        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Change Background"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Rename a page; blank names are ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePage {
    pub index: usize,
    pub name: String,
}

impl RenamePage {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

impl Command for RenamePage {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        // Validate the index even when the name is blank
        document.page(self.index)?;

        let name = self.name.trim();
        if name.is_empty() {
            return Ok(CommandResult::unchanged(document));
        }

        let mut doc = document.clone();
        doc.page_mut(self.index)?.name = name.to_string();
        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Rename Page"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Make another page current
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectPage {
    pub index: usize,
}

impl SelectPage {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Command for SelectPage {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        if document.current_page_index() == self.index {
            return Ok(CommandResult::unchanged(document));
        }
        let mut doc = document.clone();
        doc.set_current_page(self.index)?;
        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Select Page"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Change the week-start convention used by later bundles and exports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStartDay {
    pub start_day: StartDay,
}

impl SetStartDay {
    pub fn new(start_day: StartDay) -> Self {
        Self { start_day }
    }
}

impl Command for SetStartDay {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        if document.start_day() == self.start_day {
            return Ok(CommandResult::unchanged(document));
        }
        let mut doc = document.clone();
        doc.set_start_day(self.start_day);
        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Set Start Day"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}
