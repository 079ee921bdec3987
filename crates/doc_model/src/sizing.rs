//! Block sizing policy
//!
//! Chooses the initial geometry (and lock state) of a newly added block from
//! an explicit size profile, or from the asset name when the profile is
//! [`SizeProfile::Auto`].

use crate::{AssetRef, CanvasSize, Rect};
use serde::{Deserialize, Serialize};

/// Printable template area shared by full-page layouts
pub const TEMPLATE_AREA: Rect = Rect::new(253.0, 150.0, 1167.0, 1800.0);

/// Week-day header strip that sits above a calendar grid
pub const WEEK_HEADER_STRIP: Rect = Rect::new(253.0, 220.0, 1167.0, 100.0);

/// Month title badge at the top of a page
pub const MONTH_HEADER_BADGE: Rect = Rect::new(540.0, 100.0, 450.0, 100.0);

/// Default square block
pub const DEFAULT_SQUARE: Rect = Rect::new(400.0, 400.0, 600.0, 600.0);

/// Named initial geometry for a new block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeProfile {
    /// Infer from the asset name
    #[default]
    Auto,
    /// Whole template area
    Full,
    /// Top half of the template area
    Half,
    /// Top-left quarter of the template area
    Quarter,
    /// Top-left eighth of the template area
    Eighth,
    /// Week-day header strip
    WeekHeader,
    /// Month title badge
    MonthHeader,
    /// Full-bleed cover, locked
    Cover,
    /// Default square
    Square,
}

/// Geometry and lock state chosen for a new block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub rect: Rect,
    pub locked: bool,
}

impl SizeProfile {
    /// Resolve `Auto` against an asset name; other profiles are returned as-is
    pub fn resolve(self, asset: &AssetRef) -> SizeProfile {
        if self != SizeProfile::Auto {
            return self;
        }

        if asset.contains_ignore_case("cover") {
            SizeProfile::Cover
        } else if asset.contains_ignore_case("header") {
            if asset.contains_ignore_case("start") {
                SizeProfile::WeekHeader
            } else {
                SizeProfile::MonthHeader
            }
        } else {
            SizeProfile::Square
        }
    }

    /// Compute the placement for this profile on a canvas
    pub fn placement(self, asset: &AssetRef, canvas: CanvasSize) -> Placement {
        let area = TEMPLATE_AREA;
        let unlocked = |rect| Placement { rect, locked: false };

        match self.resolve(asset) {
            SizeProfile::Cover => Placement {
                rect: canvas.bounds(),
                locked: true,
            },
            SizeProfile::Full => unlocked(area),
            SizeProfile::Half => unlocked(Rect::new(area.x, area.y, area.width, area.height / 2.0)),
            SizeProfile::Quarter => unlocked(Rect::new(
                area.x,
                area.y,
                area.width / 2.0,
                area.height / 2.0,
            )),
            SizeProfile::Eighth => unlocked(Rect::new(
                area.x,
                area.y,
                area.width / 2.0,
                area.height / 4.0,
            )),
            SizeProfile::WeekHeader => unlocked(WEEK_HEADER_STRIP),
            SizeProfile::MonthHeader => unlocked(MONTH_HEADER_BADGE),
            SizeProfile::Square | SizeProfile::Auto => unlocked(DEFAULT_SQUARE),
        }
    }
}
