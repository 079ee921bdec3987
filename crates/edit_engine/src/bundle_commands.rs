//! Month bundle generation as an editing command

use crate::{Command, CommandResult, Result};
use doc_model::{generate_month_bundle, MonthCode, PlannerDocument};
use serde::{Deserialize, Serialize};

/// Append a 37-page month bundle and jump to its overview page.
///
/// Every page takes the current page's background; the calendar grid asset
/// follows the document's start day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMonthBundle {
    pub month: MonthCode,
}

impl AddMonthBundle {
    pub fn new(month: MonthCode) -> Self {
        Self { month }
    }
}

impl Command for AddMonthBundle {
    fn apply(&self, document: &PlannerDocument) -> Result<CommandResult> {
        let mut doc = document.clone();
        let background = doc.current_page().background.clone();
        let pages = generate_month_bundle(self.month, doc.start_day(), &background)?;

        let range = doc.append_pages(pages);
        doc.set_current_page(range.start)?;

        Ok(CommandResult::applied(doc))
    }

    fn display_name(&self) -> &str {
        "Add Month Bundle"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}
