//! Month-bundle generation
//!
//! A bundle is the fixed run of pages created for one calendar month: one
//! overview page, five week pages and thirty-one day pages.
//!
//! Every bundle has 31 day pages regardless of the month's real length. The
//! day grid is sized for the longest month, so the surplus day pages of
//! shorter months stand for dates that do not exist. This is a known
//! simplification of the planner layout.

use crate::{AssetRef, Block, MonthCode, Page, PageType, Rect, Result, Section, StartDay};
use crate::sizing::MONTH_HEADER_BADGE;

/// Week pages per bundle
pub const BUNDLE_WEEKS: usize = 5;

/// Day pages per bundle
pub const BUNDLE_DAYS: usize = 31;

/// Total pages per bundle
pub const BUNDLE_LEN: usize = 1 + BUNDLE_WEEKS + BUNDLE_DAYS;

/// Where the locked calendar grid sits on an overview page
pub const CALENDAR_GRID: Rect = Rect::new(253.0, 330.0, 1167.0, 1000.0);

/// Calendar-grid asset for a month and week start, e.g. `marsundaystart.svg`
pub fn calendar_asset(month: MonthCode, start_day: StartDay) -> AssetRef {
    AssetRef::new(format!("{}{}start.svg", month.asset_prefix(), start_day))
}

/// Month title asset, e.g. `marheader.svg`
pub fn header_asset(month: MonthCode) -> AssetRef {
    AssetRef::new(format!("{}header.svg", month.asset_prefix()))
}

/// Build the 37 pages of a month bundle. All pages share `background`.
pub fn generate_month_bundle(
    month: MonthCode,
    start_day: StartDay,
    background: &AssetRef,
) -> Result<Vec<Page>> {
    let section = Section::Month(month);
    let mut pages = Vec::with_capacity(BUNDLE_LEN);

    let calendar = Block::new(calendar_asset(month, start_day), CALENDAR_GRID, true)?;
    let header = Block::new(header_asset(month), MONTH_HEADER_BADGE, false)?;
    pages.push(
        Page::new(format!("{} Overview", month), background.clone())
            .with_classification(section, PageType::Month)
            .with_blocks([calendar, header]),
    );

    for week in 1..=BUNDLE_WEEKS {
        pages.push(
            Page::new(format!("{} Wk {}", month, week), background.clone())
                .with_classification(section, PageType::Week),
        );
    }

    for day in 1..=BUNDLE_DAYS {
        pages.push(
            Page::new(format!("{} Day {}", month, day), background.clone())
                .with_classification(section, PageType::Day),
        );
    }

    tracing::debug!(%month, %start_day, pages = pages.len(), "generated month bundle");
    Ok(pages)
}
