//! Astronomical-style seasons used for the season feature columns.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Season of a calendar date, split on the 21st of March, June, September and December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// March 21 up to June 20.
    Spring,
    /// June 21 up to September 20.
    Summer,
    /// September 21 up to December 20.
    Autumn,
    /// December 21 up to March 20.
    Winter,
}

impl Season {
    pub fn from_date(date: NaiveDate) -> Self {
        match (date.month(), date.day()) {
            (3, 21..=31) | (4..=5, _) | (6, 1..=20) => Season::Spring,
            (6, 21..=31) | (7..=8, _) | (9, 1..=20) => Season::Summer,
            (9, 21..=31) | (10..=11, _) | (12, 1..=20) => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Position in the yearly cycle, starting at spring.
    pub fn index(&self) -> u8 {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Autumn => 2,
            Season::Winter => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
