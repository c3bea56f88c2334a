//! Calendar month periods
//!
//! A [`Period`] is a (month, year) pair. Out-of-range months roll over into
//! neighbouring years, so month 13 of 2024 is January 2025 and month 0 of
//! 2024 is December 2023.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Earliest year accepted from callers
pub const MIN_YEAR: i32 = 1;
/// Latest year accepted from callers
pub const MAX_YEAR: i32 = 9999;

/// One calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Build a period from an already valid month (1..=12)
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidData(format!("Invalid month: {}", month)));
        }
        Self::normalized(i64::from(month), i64::from(year))
    }

    /// Build a period, rolling months outside 1..=12 into adjacent years
    pub fn normalized(month: i64, year: i64) -> Result<Self> {
        let zero_based = month
            .checked_sub(1)
            .ok_or_else(|| Error::InvalidData(format!("Invalid month: {}", month)))?;
        let year = year
            .checked_add(zero_based.div_euclid(12))
            .ok_or_else(|| Error::InvalidData(format!("Invalid year: {}", year)))?;

        if year < i64::from(MIN_YEAR) || year > i64::from(MAX_YEAR) {
            return Err(Error::InvalidData(format!(
                "Year must be between {} and {}, got {}",
                MIN_YEAR, MAX_YEAR, year
            )));
        }

        Ok(Self {
            year: year as i32,
            month: (zero_based.rem_euclid(12) + 1) as u32,
        })
    }

    /// The period containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Fill in whichever of month/year is missing from `today`
    pub fn resolve(month: Option<i64>, year: Option<i64>, today: NaiveDate) -> Result<Self> {
        let month = month.unwrap_or_else(|| i64::from(today.month()));
        let year = year.unwrap_or_else(|| i64::from(today.year()));
        Self::normalized(month, year)
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> NaiveDate {
        ymd(self.year, self.month, 1)
    }

    /// Day before the first day of the following month
    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MIN)
    }

    /// Inclusive date range covered by this period
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.last_day())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The calendar month immediately before this one
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The `n` periods ending with this one, oldest first
    pub fn trailing(&self, n: usize) -> Vec<Self> {
        let mut periods = Vec::with_capacity(n);
        let mut current = *self;
        for _ in 0..n {
            periods.push(current);
            current = current.previous();
        }
        periods.reverse();
        periods
    }

    /// "YYYY-MM"
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// Periods only reach years a few steps outside MIN_YEAR..=MAX_YEAR, all of
// which chrono represents.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Parse a month or year query value
pub fn parse_component(name: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidData(format!("Invalid {}: {}", name, value)))
}
