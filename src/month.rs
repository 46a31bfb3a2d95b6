//! Parsing of `YYYY-MM` month strings into half-open UTC date-time ranges.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};

use crate::{Error, validation::ValidationIssue};

/// Why a month string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MonthParseError {
    /// The string is not four digits, a hyphen and two digits.
    #[error("expected a month in the format YYYY-MM, e.g. 2026-02")]
    InvalidFormat,
    /// The month-of-year is not between 01 and 12.
    #[error("month must be between 01 and 12")]
    MonthOutOfRange,
    /// The month, or the month after it, cannot be represented as a date.
    #[error("month is outside the supported range of dates")]
    YearOutOfRange,
}

impl From<MonthParseError> for Error {
    fn from(error: MonthParseError) -> Self {
        Error::InvalidQuery(vec![ValidationIssue::new("month", error.to_string())])
    }
}

/// A calendar month, e.g. February 2026.
///
/// Parsed from strings of the form `YYYY-MM` with a zero padded month between
/// 01 and 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    /// Create a year-month from its parts.
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month as a half-open UTC range starting at midnight on the first day
    /// of the month and ending at midnight on the first day of the next month.
    ///
    /// # Errors
    ///
    /// Returns [MonthParseError::YearOutOfRange] if either end of the range is not a valid
    /// [Date], e.g. for December 9999.
    pub fn range(&self) -> Result<MonthRange, MonthParseError> {
        let (end_year, end_month) = match self.month {
            Month::December => (self.year + 1, Month::January),
            month => (self.year, month.next()),
        };

        Ok(MonthRange {
            start: first_of_month_utc(self.year, self.month)?,
            end: first_of_month_utc(end_year, end_month)?,
        })
    }
}

fn first_of_month_utc(year: i32, month: Month) -> Result<OffsetDateTime, MonthParseError> {
    Date::from_calendar_date(year, month, 1)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| MonthParseError::YearOutOfRange)
}

impl FromStr for YearMonth {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);

        if !well_formed {
            return Err(MonthParseError::InvalidFormat);
        }

        let year: i32 = s[..4]
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat)?;
        let month: u8 = s[5..]
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat)?;
        let month = Month::try_from(month).map_err(|_| MonthParseError::MonthOutOfRange)?;

        let year_month = Self { year, month };
        year_month.range()?;

        Ok(year_month)
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

impl Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A half-open interval `[start, end)` of UTC date-times covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRange {
    /// Midnight UTC on the first day of the month, inclusive.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// Midnight UTC on the first day of the following month, exclusive.
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

impl MonthRange {
    /// Whether `date_time` falls within the range.
    pub fn contains(&self, date_time: OffsetDateTime) -> bool {
        self.start <= date_time && date_time < self.end
    }
}

/// The query string of endpoints that report on a single month, e.g. `?month=2026-02`.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    /// Parse the `month` parameter.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidQuery] with an issue for the `month` field if the parameter is
    /// missing or malformed.
    pub fn year_month(&self) -> Result<YearMonth, Error> {
        let year_month = self.month.as_deref().unwrap_or_default().parse::<YearMonth>()?;

        Ok(year_month)
    }

    /// Parse the `month` parameter into the range of date-times it covers.
    ///
    /// # Errors
    ///
    /// Same as [MonthQuery::year_month].
    pub fn range(&self) -> Result<MonthRange, Error> {
        Ok(self.year_month()?.range()?)
    }
}
