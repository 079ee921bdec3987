//! Fixed link geometry printed into the planner artwork: the month-tab
//! strip down the right edge and the 7-column calendar grid of overview
//! pages.

use doc_model::{MonthCode, Rect};
use serde::{Deserialize, Serialize};

/// Calendar day grid on month overview pages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGrid {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub columns: usize,
}

impl DayGrid {
    /// Cell for a zero-based grid slot, filled row by row
    pub fn cell(&self, slot: usize) -> Rect {
        let columns = self.columns.max(1);
        let column = slot % columns;
        let row = slot / columns;
        Rect::new(
            self.origin_x + column as f64 * self.cell_width,
            self.origin_y + row as f64 * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }
}

/// Vertical strip of month tabs, January at the top
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabStrip {
    pub x: f64,
    pub start_y: f64,
    pub tab_width: f64,
    pub tab_height: f64,
}

impl TabStrip {
    pub fn tab(&self, month: MonthCode) -> Rect {
        Rect::new(
            self.x,
            self.start_y + month.ordinal() as f64 * self.tab_height,
            self.tab_width,
            self.tab_height,
        )
    }
}

/// Where link regions are stamped on exported pages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportLayout {
    pub day_grid: DayGrid,
    pub tabs: TabStrip,
}

impl ExportLayout {
    /// Geometry of the stock planner artwork on the 1536 x 2048 canvas
    pub const PLANNER: ExportLayout = ExportLayout {
        day_grid: DayGrid {
            origin_x: 253.0,
            origin_y: 330.0,
            cell_width: 168.0,
            cell_height: 200.0,
            columns: 7,
        },
        tabs: TabStrip {
            x: 1477.0,
            start_y: 166.0,
            tab_width: 59.0,
            tab_height: 125.0,
        },
    };
}

impl Default for ExportLayout {
    fn default() -> Self {
        Self::PLANNER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{StartDay, BUNDLE_DAYS};
    use proptest::prelude::*;

    #[test]
    fn test_first_and_last_tab() {
        let tabs = ExportLayout::PLANNER.tabs;
        assert_eq!(tabs.tab(MonthCode::Jan), Rect::new(1477.0, 166.0, 59.0, 125.0));
        assert_eq!(tabs.tab(MonthCode::Dec), Rect::new(1477.0, 166.0 + 11.0 * 125.0, 59.0, 125.0));
    }

    #[test]
    fn test_grid_cells_wrap_after_seven() {
        let grid = ExportLayout::PLANNER.day_grid;
        assert_eq!(grid.cell(0), Rect::new(253.0, 330.0, 168.0, 200.0));
        assert_eq!(grid.cell(4), Rect::new(253.0 + 4.0 * 168.0, 330.0, 168.0, 200.0));
        assert_eq!(grid.cell(7), Rect::new(253.0, 530.0, 168.0, 200.0));
        assert_eq!(grid.cell(36).x, 253.0 + 168.0);
        assert_eq!(grid.cell(36).y, 330.0 + 5.0 * 200.0);
    }

    proptest! {
        #[test]
        fn day_cells_stay_inside_the_grid(
            month in 0usize..12,
            monday in any::<bool>(),
            day in 0usize..BUNDLE_DAYS,
        ) {
            let grid = ExportLayout::PLANNER.day_grid;
            let month = MonthCode::ALL[month];
            let start_day = if monday { StartDay::Monday } else { StartDay::Sunday };
            let cell = grid.cell(day + month.offset(start_day));

            let right = grid.origin_x + grid.columns as f64 * grid.cell_width;
            // a month spans at most six calendar rows
            let bottom = grid.origin_y + 6.0 * grid.cell_height;
            prop_assert!(cell.x >= grid.origin_x && cell.x + cell.width <= right);
            prop_assert!(cell.y >= grid.origin_y && cell.y + cell.height <= bottom);
        }
    }
}
