//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Database identifier for a category.
pub type CategoryId = i64;

/// Whether money was earned or spent.
///
/// Serialized and stored as `INCOME` or `EXPENSE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    /// The canonical text form of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "INCOME",
            Kind::Expense => "EXPENSE",
        }
    }
}

/// The error for strings that are neither `INCOME` nor `EXPENSE`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected INCOME or EXPENSE, got {0:?}")]
pub struct KindParseError(String);

impl FromStr for Kind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(Kind::Income),
            "EXPENSE" => Ok(Kind::Expense),
            other => Err(KindParseError(other.to_owned())),
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Kind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Kind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Why a category name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CategoryNameError {
    #[error("name cannot be empty")]
    Empty,
    #[error("name must be at most {} characters", CategoryName::MAX_LENGTH)]
    TooLong,
}

/// A validated category name: trimmed, non-empty and at most 40 characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// The maximum number of characters in a name.
    pub const MAX_LENGTH: usize = 40;

    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns [CategoryNameError::Empty] if nothing is left after trimming and
    /// [CategoryNameError::TooLong] if more than [CategoryName::MAX_LENGTH] characters are.
    pub fn new(name: &str) -> Result<Self, CategoryNameError> {
        let name = name.trim();

        if name.is_empty() {
            Err(CategoryNameError::Empty)
        } else if name.chars().count() > Self::MAX_LENGTH {
            Err(CategoryNameError::TooLong)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user defined label for transactions of one kind, e.g. 'Groceries' for expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    #[serde(rename = "type")]
    pub kind: Kind,
}

/// The categories created for a user by the seed endpoint.
pub const DEFAULT_CATEGORIES: &[(&str, Kind)] = &[
    ("Food & Drink", Kind::Expense),
    ("Transport", Kind::Expense),
    ("Shopping", Kind::Expense),
    ("Housing", Kind::Expense),
    ("Bills", Kind::Expense),
    ("Phone & Internet", Kind::Expense),
    ("Health", Kind::Expense),
    ("Entertainment", Kind::Expense),
    ("Education", Kind::Expense),
    ("Other", Kind::Expense),
    ("Salary", Kind::Income),
    ("Bonus", Kind::Income),
    ("Freelance", Kind::Income),
    ("Gifts", Kind::Income),
    ("Dividends", Kind::Income),
    ("Other", Kind::Income),
];
