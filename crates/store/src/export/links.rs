//! Link planning: which clickable regions go on which output page.
//!
//! Every output page carries the 12 month tabs. Month overview pages also
//! get one link per calendar day, placed in the day grid after the month's
//! leading blank cells.

use super::layout::ExportLayout;
use doc_model::{MonthCode, Page, PageType, PlannerDocument, Rect, Section, StartDay, BUNDLE_DAYS};

/// A clickable rectangle (canvas units) and the 1-based page it opens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkRegion {
    pub rect: Rect,
    pub destination: usize,
}

/// Index of the page a month tab should open.
///
/// Prefers the month's overview page (`section` and `type` match); falls
/// back to the first non-day page whose name contains the month code.
pub fn find_month_page(pages: &[Page], month: MonthCode) -> Option<usize> {
    let section = Section::Month(month);
    pages
        .iter()
        .position(|p| p.section == section && p.page_type == PageType::Month)
        .or_else(|| {
            pages.iter().position(|p| {
                p.page_type != PageType::Day && p.name.to_uppercase().contains(month.code())
            })
        })
}

/// Index of the first day page of a month
pub fn find_first_day_page(pages: &[Page], month: MonthCode) -> Option<usize> {
    let section = Section::Month(month);
    pages
        .iter()
        .position(|p| p.section == section && p.page_type == PageType::Day)
}

/// Links computed once per export from a document snapshot
#[derive(Debug, Clone)]
pub struct LinkPlan {
    layout: ExportLayout,
    start_day: StartDay,
    /// 1-based destination of each month tab, January first
    tab_destinations: [usize; 12],
}

impl LinkPlan {
    pub fn new(document: &PlannerDocument, layout: ExportLayout) -> Self {
        let pages = document.pages();
        let tab_destinations = MonthCode::ALL.map(|month| match find_month_page(pages, month) {
            Some(index) => index + 1,
            // Unresolved tabs still open the first page
            None => 1,
        });
        Self {
            layout,
            start_day: document.start_day(),
            tab_destinations,
        }
    }

    pub fn tab_destination(&self, month: MonthCode) -> usize {
        self.tab_destinations[month.ordinal()]
    }

    /// The 12 month-tab links stamped on every page
    pub fn tab_links(&self) -> Vec<LinkRegion> {
        MonthCode::ALL
            .into_iter()
            .map(|month| LinkRegion {
                rect: self.layout.tabs.tab(month),
                destination: self.tab_destination(month),
            })
            .collect()
    }

    /// Day-grid links for the page at `index`; empty unless it is a month
    /// overview whose month has day pages
    pub fn day_links(&self, pages: &[Page], index: usize) -> Vec<LinkRegion> {
        let Some(page) = pages.get(index) else {
            return Vec::new();
        };
        if !page.is_month_overview() {
            return Vec::new();
        }
        let Some(month) = page.resolve_month() else {
            return Vec::new();
        };
        let Some(first_day) = find_first_day_page(pages, month) else {
            return Vec::new();
        };

        let offset = month.offset(self.start_day);
        (0..BUNDLE_DAYS)
            .map(|day| (day, first_day + day + 1))
            // Short runs of day pages (e.g. a hand-built month) get fewer links
            .take_while(|&(_, destination)| destination <= pages.len())
            .map(|(day, destination)| LinkRegion {
                rect: self.layout.day_grid.cell(day + offset),
                destination,
            })
            .collect()
    }

    /// Every link for the page at `index`, tabs first
    pub fn links_for(&self, pages: &[Page], index: usize) -> Vec<LinkRegion> {
        let mut links = self.tab_links();
        links.extend(self.day_links(pages, index));
        links
    }
}
