//! The read-only queries the monthly summary needs, behind traits so the aggregator can be
//! tested without a database.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    category::{CategoryId, Kind, get_category_names},
    month::MonthRange,
};

/// The summed amount of one category's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub total: i64,
}

/// Aggregate queries over a user's transactions.
pub trait TransactionStore {
    /// Sum the amounts of the user's transactions of `kind` dated within `range`.
    ///
    /// Returns `None` if there are no such transactions.
    fn sum_amount(
        &self,
        user_id: UserID,
        kind: Kind,
        range: &MonthRange,
    ) -> Result<Option<i64>, Error>;

    /// Sum the amounts of the user's transactions of `kind` dated within `range` per category.
    ///
    /// The totals are ordered from largest to smallest and at most `limit` are returned.
    fn group_sum_by_category(
        &self,
        user_id: UserID,
        kind: Kind,
        range: &MonthRange,
        limit: usize,
    ) -> Result<Vec<CategoryTotal>, Error>;
}

/// Lookups of category details.
pub trait CategoryStore {
    /// Get the names of the categories in `category_ids` owned by `user_id`.
    ///
    /// Unknown IDs and IDs owned by other users are left out of the map.
    fn find_names(
        &self,
        user_id: UserID,
        category_ids: &[CategoryId],
    ) -> Result<HashMap<CategoryId, String>, Error>;
}

/// Runs summary queries against the transaction table of a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn sum_amount(
        &self,
        user_id: UserID,
        kind: Kind,
        range: &MonthRange,
    ) -> Result<Option<i64>, Error> {
        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        connection
            .prepare(
                "SELECT SUM(amount) FROM \"transaction\"
                 WHERE user_id = ?1 AND kind = ?2 AND date >= ?3 AND date < ?4",
            )?
            .query_row(
                (
                    user_id.as_i64(),
                    kind,
                    range.start.unix_timestamp(),
                    range.end.unix_timestamp(),
                ),
                |row| row.get(0),
            )
            .map_err(|error| error.into())
    }

    fn group_sum_by_category(
        &self,
        user_id: UserID,
        kind: Kind,
        range: &MonthRange,
        limit: usize,
    ) -> Result<Vec<CategoryTotal>, Error> {
        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        connection
            .prepare(
                "SELECT category_id, SUM(amount) AS total FROM \"transaction\"
                 WHERE user_id = ?1 AND kind = ?2 AND date >= ?3 AND date < ?4
                 GROUP BY category_id
                 ORDER BY total DESC
                 LIMIT ?5",
            )?
            .query_map(
                (
                    user_id.as_i64(),
                    kind,
                    range.start.unix_timestamp(),
                    range.end.unix_timestamp(),
                    limit,
                ),
                |row| {
                    Ok(CategoryTotal {
                        category_id: row.get(0)?,
                        total: row.get(1)?,
                    })
                },
            )?
            .map(|maybe_total| maybe_total.map_err(|error| error.into()))
            .collect()
    }
}

/// Looks up categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    fn find_names(
        &self,
        user_id: UserID,
        category_ids: &[CategoryId],
    ) -> Result<HashMap<CategoryId, String>, Error> {
        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_category_names(user_id, category_ids, &connection)
    }
}
