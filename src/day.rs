//! Calendar days for date-scoped note queries.
//!
//! The notes API filters with `from`/`to` query parameters carrying ISO
//! dates (`YYYY-MM-DD`); the TUI pages through the feed one day at a time.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate};

/// A single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Day(NaiveDate);

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in the local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn next(self) -> Self {
        // NaiveDate::MAX is ~262143 CE, overflow is not reachable from real dates
        Self(self.0.checked_add_days(Days::new(1)).unwrap_or(self.0))
    }

    pub fn previous(self) -> Self {
        Self(self.0.checked_sub_days(Days::new(1)).unwrap_or(self.0))
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for Day {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Day)
            .map_err(|_| crate::Error::InvalidInput(format!("invalid date (want YYYY-MM-DD): {}", s)))
    }
}

/// Inclusive day range for feed queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub from: Day,
    pub to: Day,
}

impl DayRange {
    pub fn new(from: Day, to: Day) -> Self {
        Self { from, to }
    }

    /// Range covering exactly one day.
    pub fn single(day: Day) -> Self {
        Self { from: day, to: day }
    }

    /// Query-parameter pairs for GET /api/notes.
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [
            ("from", self.from.to_string()),
            ("to", self.to.to_string()),
        ]
    }
}
