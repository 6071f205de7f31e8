//! Growing season window
//!
//! A season is a month/day range inside one calendar year. The default is
//! the Northern Hemisphere vine season, March 1 through November 30.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::DomainError;

/// A calendar day without a year, e.g. `03-01`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Create a month/day pair
    ///
    /// February 29 is accepted; resolving it in a non-leap year fails.
    pub fn new(month: u32, day: u32) -> Result<Self, DomainError> {
        // 2000 is a leap year, so every day that exists in some year passes
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(DomainError::InvalidDateTime(format!(
                "{month:02}-{day:02} is not a calendar day"
            )));
        }
        Ok(Self { month, day })
    }

    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Place this month/day in a concrete year
    pub fn in_year(self, year: i32) -> Result<NaiveDate, DomainError> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).ok_or_else(|| {
            DomainError::validation(format!("{self} does not exist in year {year}"))
        })
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidDateTime(format!("expected MM-DD, got '{s}'"));
        let (month, day) = s.trim().split_once('-').ok_or_else(invalid)?;
        let month = month.parse().map_err(|_| invalid())?;
        let day = day.parse().map_err(|_| invalid())?;
        Self::new(month, day)
    }
}

impl Serialize for MonthDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Start and end of the growing season, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct SeasonWindow {
    start: MonthDay,
    end: MonthDay,
}

#[derive(Deserialize)]
struct RawWindow {
    start: MonthDay,
    end: MonthDay,
}

impl TryFrom<RawWindow> for SeasonWindow {
    type Error = DomainError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl SeasonWindow {
    /// Create a window; the start may not fall after the end
    pub fn new(start: MonthDay, end: MonthDay) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::validation(format!(
                "season start {start} falls after season end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two `MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(start.parse()?, end.parse()?)
    }

    #[must_use]
    pub const fn start(&self) -> MonthDay {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> MonthDay {
        self.end
    }

    /// Concrete dates of the season in the given year
    pub fn resolve(&self, year: i32) -> Result<SeasonDates, DomainError> {
        SeasonDates::new(self.start.in_year(year)?, self.end.in_year(year)?)
    }
}

impl Default for SeasonWindow {
    fn default() -> Self {
        Self {
            start: MonthDay { month: 3, day: 1 },
            end: MonthDay { month: 11, day: 30 },
        }
    }
}

/// A resolved season: an inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeasonDates {
    start: NaiveDate,
    end: NaiveDate,
}

impl SeasonDates {
    /// Create an inclusive date range
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::validation(format!(
                "range start {start} falls after range end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Calendar year of the season start
    #[must_use]
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// Number of days in the range, both ends included
    #[must_use]
    pub fn day_count(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    /// Every date in the range, ascending
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}
