//! Calendar month identifiers and inclusive date ranges.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A calendar month, written as `YYYY-MM` at every boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthId(NaiveDate);

impl MonthId {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        if !(0..=9999).contains(&year) {
            return Err(MonthError::OutOfRange);
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or(MonthError::OutOfRange)
    }

    /// Parses a strict `YYYY-MM` identifier.
    pub fn parse(input: &str) -> Result<Self, MonthError> {
        let raw = input.trim();
        let invalid = || MonthError::Invalid(raw.to_string());
        let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    /// Returns the month a date belongs to.
    pub fn containing(date: NaiveDate) -> Self {
        Self(date - Duration::days(i64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().0 - Duration::days(1)
    }

    pub fn previous(&self) -> Self {
        Self(self.0 - Months::new(1))
    }

    pub fn next(&self) -> Self {
        Self(self.0 + Months::new(1))
    }

    /// Inclusive `[first_day, last_day]` range of the month.
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.first_day(),
            end: self.last_day(),
        }
    }

    /// Whole months from `self` to `other`; negative when `other` is earlier.
    pub fn months_until(&self, other: MonthId) -> i32 {
        let index = |m: &MonthId| m.year() * 12 + m.month() as i32;
        index(&other) - index(self)
    }
}

impl fmt::Display for MonthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthId {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MonthId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        MonthId::parse(&raw).map_err(de::Error::custom)
    }
}

/// Inclusive date range used for transaction queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, MonthError> {
        if end < start {
            return Err(MonthError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Errors that can occur when constructing [`MonthId`] or [`DateRange`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthError {
    Invalid(String),
    OutOfRange,
    InvalidRange,
}

impl fmt::Display for MonthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthError::Invalid(raw) => write!(f, "invalid month `{raw}`, expected YYYY-MM"),
            MonthError::OutOfRange => f.write_str("month is out of range"),
            MonthError::InvalidRange => f.write_str("date range end must not precede start"),
        }
    }
}

impl std::error::Error for MonthError {}
