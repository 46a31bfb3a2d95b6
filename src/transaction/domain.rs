//! Core transaction domain types and input validation.

use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{
    Error,
    category::{Category, CategoryId, Kind},
    validation::Issues,
};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// The maximum number of characters in a transaction note.
pub const MAX_NOTE_LENGTH: usize = 200;

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    /// The amount in the smallest unit of the currency. Always positive.
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: Kind,
    /// When the transaction happened, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub category_id: CategoryId,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A transaction along with the category it belongs to.
///
/// `category` is `None` if the category no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionWithCategory {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category: Option<Category>,
}

/// A validated transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: i64,
    pub kind: Kind,
    pub date: OffsetDateTime,
    pub category_id: CategoryId,
    pub note: Option<String>,
}

/// The JSON body for creating a transaction.
///
/// Fields are optional here so that every missing or invalid field can be reported at once.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransactionData {
    /// A positive integer, either as a JSON number or a string of digits.
    pub amount: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// An RFC 3339 date-time or a `YYYY-MM-DD` date.
    pub date: Option<String>,
    pub category_id: Option<CategoryId>,
    pub note: Option<String>,
}

impl NewTransactionData {
    /// Check every field and convert the request into a [NewTransaction].
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidBody] listing an issue for each invalid field.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let mut issues = Issues::default();

        let amount = issues.check("amount", parse_amount(self.amount.as_ref()));
        let kind = issues.check(
            "type",
            self.kind
                .as_deref()
                .ok_or_else(|| "type is required".to_owned())
                .and_then(|kind| kind.parse::<Kind>().map_err(|error| error.to_string())),
        );
        let date = issues.check(
            "date",
            self.date
                .as_deref()
                .ok_or(DateParseError::Missing)
                .and_then(parse_transaction_date),
        );
        let category_id = issues.check(
            "categoryId",
            self.category_id.ok_or("categoryId is required"),
        );

        if self
            .note
            .as_ref()
            .is_some_and(|note| note.chars().count() > MAX_NOTE_LENGTH)
        {
            issues.push(
                "note",
                format!("note must be at most {MAX_NOTE_LENGTH} characters"),
            );
        }

        match (amount, kind, date, category_id) {
            (Some(amount), Some(kind), Some(date), Some(category_id)) if issues.is_empty() => {
                Ok(NewTransaction {
                    amount,
                    kind,
                    date,
                    category_id,
                    note: self.note,
                })
            }
            _ => Err(Error::InvalidBody(issues.into_vec())),
        }
    }
}

/// Why an amount was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is required")]
    Missing,
    #[error("amount must be a whole number")]
    NotAnInteger,
    #[error("amount must be greater than zero")]
    NotPositive,
}

/// Parse an amount given as a JSON number or a string of digits.
pub fn parse_amount(value: Option<&serde_json::Value>) -> Result<i64, AmountError> {
    let amount = match value {
        None | Some(serde_json::Value::Null) => return Err(AmountError::Missing),
        Some(serde_json::Value::Number(number)) => {
            number.as_i64().ok_or(AmountError::NotAnInteger)?
        }
        Some(serde_json::Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| AmountError::NotAnInteger)?,
        Some(_) => return Err(AmountError::NotAnInteger),
    };

    if amount <= 0 {
        return Err(AmountError::NotPositive);
    }

    Ok(amount)
}

/// Why a transaction date was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("date is required")]
    Missing,
    #[error("expected an RFC 3339 date-time or a date in the format YYYY-MM-DD")]
    InvalidFormat,
}

/// Parse an RFC 3339 date-time, or a `YYYY-MM-DD` date taken as midnight UTC.
///
/// The result is always in UTC.
pub fn parse_transaction_date(raw: &str) -> Result<OffsetDateTime, DateParseError> {
    if let Ok(date_time) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(date_time.to_offset(UtcOffset::UTC));
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| DateParseError::InvalidFormat)
}

#[cfg(test)]
mod validation_tests {
    use serde_json::json;
    use time::macros::datetime;

    use crate::{Error, category::Kind};

    use super::{
        AmountError, DateParseError, NewTransaction, NewTransactionData, parse_amount,
        parse_transaction_date,
    };

    #[test]
    fn parses_plain_date_as_utc_midnight() {
        assert_eq!(
            parse_transaction_date("2026-02-04"),
            Ok(datetime!(2026-02-04 00:00:00 UTC))
        );
    }

    #[test]
    fn normalizes_rfc3339_offset_to_utc() {
        let got = parse_transaction_date("2026-03-01T06:30:00+07:00").unwrap();

        assert_eq!(got, datetime!(2026-02-28 23:30:00 UTC));
        assert!(got.offset().is_utc());
    }

    #[test]
    fn rejects_other_date_formats() {
        for input in ["04/02/2026", "2026-02", "", "2026-02-30"] {
            assert_eq!(
                parse_transaction_date(input),
                Err(DateParseError::InvalidFormat),
                "want {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn amount_accepts_numbers_and_digit_strings() {
        assert_eq!(parse_amount(Some(&json!(50000))), Ok(50000));
        assert_eq!(parse_amount(Some(&json!("50000"))), Ok(50000));
    }

    #[test]
    fn amount_must_be_positive_integer() {
        assert_eq!(parse_amount(None), Err(AmountError::Missing));
        assert_eq!(parse_amount(Some(&json!(0))), Err(AmountError::NotPositive));
        assert_eq!(parse_amount(Some(&json!(-5))), Err(AmountError::NotPositive));
        assert_eq!(parse_amount(Some(&json!(1.5))), Err(AmountError::NotAnInteger));
        assert_eq!(parse_amount(Some(&json!("abc"))), Err(AmountError::NotAnInteger));
        assert_eq!(parse_amount(Some(&json!(true))), Err(AmountError::NotAnInteger));
    }

    #[test]
    fn validate_builds_new_transaction() {
        let data = NewTransactionData {
            amount: Some(json!(1200)),
            kind: Some("EXPENSE".to_owned()),
            date: Some("2026-02-04".to_owned()),
            category_id: Some(3),
            note: Some("coffee".to_owned()),
        };

        assert_eq!(
            data.validate(),
            Ok(NewTransaction {
                amount: 1200,
                kind: Kind::Expense,
                date: datetime!(2026-02-04 00:00:00 UTC),
                category_id: 3,
                note: Some("coffee".to_owned()),
            })
        );
    }

    #[test]
    fn validate_reports_every_invalid_field() {
        let data = NewTransactionData {
            note: Some("x".repeat(201)),
            ..Default::default()
        };

        let Err(Error::InvalidBody(issues)) = data.validate() else {
            panic!("want a validation error");
        };

        let fields: Vec<&str> = issues.iter().map(|issue| issue.field.as_str()).collect();
        assert_eq!(fields, vec!["amount", "type", "date", "categoryId", "note"]);
    }
}
