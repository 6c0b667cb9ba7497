use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use regex::Regex;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A billing month, always stored as the first day of that month.
///
/// Parsed from either `MM-YYYY` or `YYYY-MM`, displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct CalendarMonth(NaiveDate);

impl CalendarMonth {
    /// Build a month from its year and 1-based month number
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| Error::InvalidMonthFormat(format!("{:04}-{:02}", year, month)))
    }

    /// Clamp any date to the first day of its month
    pub fn normalize(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }

    fn from_parts(year: &str, month: &str) -> Option<Self> {
        let year = year.parse().ok()?;
        let month = month.parse().ok()?;
        Self::new(year, month).ok()
    }
}

impl FromStr for CalendarMonth {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        lazy_static::lazy_static! {
            static ref MONTH_YEAR: Regex = Regex::new(r"^(\d{2})-(\d{4})$").unwrap();
            static ref YEAR_MONTH: Regex = Regex::new(r"^(\d{4})-(\d{2})$").unwrap();
        }

        // MM-YYYY first, then YYYY-MM
        let parsed = MONTH_YEAR
            .captures(value)
            .and_then(|caps| Self::from_parts(&caps[2], &caps[1]))
            .or_else(|| {
                YEAR_MONTH
                    .captures(value)
                    .and_then(|caps| Self::from_parts(&caps[1], &caps[2]))
            });

        parsed.ok_or_else(|| Error::InvalidMonthFormat(value.to_string()))
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl Serialize for CalendarMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
