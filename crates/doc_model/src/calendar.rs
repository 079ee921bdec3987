//! Calendar classification: month codes, week-start convention and the
//! fixed day-offset table used to align month grids.

use crate::{DocModelError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the twelve calendar months, in calendar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MonthCode {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl MonthCode {
    /// All months in calendar order
    pub const ALL: [MonthCode; 12] = [
        MonthCode::Jan,
        MonthCode::Feb,
        MonthCode::Mar,
        MonthCode::Apr,
        MonthCode::May,
        MonthCode::Jun,
        MonthCode::Jul,
        MonthCode::Aug,
        MonthCode::Sep,
        MonthCode::Oct,
        MonthCode::Nov,
        MonthCode::Dec,
    ];

    /// Zero-based position in the year (JAN = 0)
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Three-letter upper-case code, e.g. `"MAR"`
    pub fn code(self) -> &'static str {
        match self {
            MonthCode::Jan => "JAN",
            MonthCode::Feb => "FEB",
            MonthCode::Mar => "MAR",
            MonthCode::Apr => "APR",
            MonthCode::May => "MAY",
            MonthCode::Jun => "JUN",
            MonthCode::Jul => "JUL",
            MonthCode::Aug => "AUG",
            MonthCode::Sep => "SEP",
            MonthCode::Oct => "OCT",
            MonthCode::Nov => "NOV",
            MonthCode::Dec => "DEC",
        }
    }

    /// Lower-case code as used in asset file names, e.g. `"mar"`
    pub fn asset_prefix(self) -> String {
        self.code().to_lowercase()
    }

    /// Number of blank grid cells before day 1 for the given week start
    pub fn offset(self, start_day: StartDay) -> usize {
        const SUNDAY: [usize; 12] = [4, 0, 0, 3, 5, 1, 3, 6, 2, 4, 0, 2];
        const MONDAY: [usize; 12] = [3, 6, 6, 2, 4, 0, 2, 5, 1, 3, 6, 1];

        match start_day {
            StartDay::Sunday => SUNDAY[self.ordinal()],
            StartDay::Monday => MONDAY[self.ordinal()],
        }
    }

    /// First month whose code appears in `text` (case-insensitive).
    ///
    /// This is a substring scan, so a page named "Retrospective for Janet"
    /// resolves to JAN. Callers use it only as a fallback after exact
    /// section matching.
    pub fn find_in(text: &str) -> Option<MonthCode> {
        let upper = text.to_uppercase();
        MonthCode::ALL
            .into_iter()
            .find(|month| upper.contains(month.code()))
    }
}

impl std::fmt::Display for MonthCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MonthCode {
    type Err = DocModelError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        MonthCode::ALL
            .into_iter()
            .find(|month| month.code() == upper)
            .ok_or_else(|| DocModelError::UnknownMonth(s.to_string()))
    }
}

/// Week-start convention for calendar grids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartDay {
    #[default]
    Sunday,
    Monday,
}

impl StartDay {
    pub const ALL: [StartDay; 2] = [StartDay::Sunday, StartDay::Monday];

    /// Lower-case name used in calendar asset names
    pub fn as_str(self) -> &'static str {
        match self {
            StartDay::Sunday => "sunday",
            StartDay::Monday => "monday",
        }
    }
}

impl std::fmt::Display for StartDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StartDay {
    type Err = DocModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(StartDay::Sunday),
            "monday" | "mon" => Ok(StartDay::Monday),
            _ => Err(DocModelError::UnknownStartDay(s.to_string())),
        }
    }
}

/// Which calendar month, if any, a page belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Month(MonthCode),
    #[default]
    None,
}

impl Section {
    /// The month for this section, if any
    pub fn month(self) -> Option<MonthCode> {
        match self {
            Section::Month(month) => Some(month),
            Section::None => None,
        }
    }
}

impl From<MonthCode> for Section {
    fn from(month: MonthCode) -> Self {
        Section::Month(month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_follow_calendar_order() {
        for (i, month) in MonthCode::ALL.iter().enumerate() {
            assert_eq!(month.ordinal(), i);
        }
    }

    #[test]
    fn test_offset_table() {
        assert_eq!(MonthCode::Jan.offset(StartDay::Sunday), 4);
        assert_eq!(MonthCode::Jan.offset(StartDay::Monday), 3);
        assert_eq!(MonthCode::Jun.offset(StartDay::Monday), 0);
        assert_eq!(MonthCode::Aug.offset(StartDay::Sunday), 6);
    }

    #[test]
    fn test_monday_offset_is_sunday_shifted_by_one() {
        for month in MonthCode::ALL {
            let sunday = month.offset(StartDay::Sunday);
            let monday = month.offset(StartDay::Monday);
            assert_eq!(monday, (sunday + 6) % 7, "{month}");
        }
    }

    #[test]
    fn test_parse_month() {
        assert_eq!("mar".parse::<MonthCode>().unwrap(), MonthCode::Mar);
        assert_eq!(" DEC ".parse::<MonthCode>().unwrap(), MonthCode::Dec);
        assert!("March".parse::<MonthCode>().is_err());
    }

    #[test]
    fn test_find_in_name() {
        assert_eq!(MonthCode::find_in("Mar Overview"), Some(MonthCode::Mar));
        assert_eq!(MonthCode::find_in("Planner Start"), None);
        // Substring matching is deliberately loose
        assert_eq!(MonthCode::find_in("Janet's notes"), Some(MonthCode::Jan));
    }

    #[test]
    fn test_start_day_parse_and_display() {
        assert_eq!("Mon".parse::<StartDay>().unwrap(), StartDay::Monday);
        assert_eq!(StartDay::Sunday.to_string(), "sunday");
        assert!("friday".parse::<StartDay>().is_err());
    }

    #[test]
    fn test_section_serde() {
        let json = serde_json::to_string(&Section::Month(MonthCode::Mar)).unwrap();
        assert_eq!(json, r#"{"month":"MAR"}"#);
        let none: Section = serde_json::from_str(r#""none""#).unwrap();
        assert_eq!(none, Section::None);
    }
}
