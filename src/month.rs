/// Reporting period (`YYYY-MM`) used by the dashboard and export.
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid month `{0}`, expected YYYY-MM")]
pub struct ParseMonthError(String);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn next(&self) -> Self {
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

    pub fn prev(&self) -> Self {
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

    pub fn days(&self) -> u32 {
        self.next()
            .first_day()
            .signed_duration_since(self.first_day())
            .num_days() as u32
    }

    /// Human label, e.g. "March 2025".
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| ParseMonthError(trimmed.to_string()))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(ParseMonthError(trimmed.to_string()));
        }
        let year = year
            .parse::<i32>()
            .map_err(|_| ParseMonthError(trimmed.to_string()))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| ParseMonthError(trimmed.to_string()))?;
        YearMonth::new(year, month).ok_or_else(|| ParseMonthError(trimmed.to_string()))
    }
}
