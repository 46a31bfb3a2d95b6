//! Database operations for transactions.

use rusqlite::{Connection, Row, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryName, get_category},
    month::MonthRange,
    transaction::{NewTransaction, Transaction, TransactionWithCategory},
};

/// Create a transaction for `user_id` and return it with its category.
///
/// # Errors
///
/// This function will return a:
/// - [Error::CategoryNotFound] if the category does not exist or belongs to another user,
/// - [Error::KindMismatch] if the transaction kind differs from the category kind,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<TransactionWithCategory, Error> {
    let category = match get_category(user_id, new_transaction.category_id, connection) {
        Ok(category) => category,
        Err(Error::NotFound) => return Err(Error::CategoryNotFound),
        Err(error) => return Err(error),
    };

    if category.kind != new_transaction.kind {
        return Err(Error::KindMismatch);
    }

    let created_at = OffsetDateTime::now_utc().unix_timestamp();

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, category_id, amount, kind, date, note, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, amount, kind, date, category_id, note, created_at",
        )?
        .query_row(
            (
                user_id.as_i64(),
                new_transaction.category_id,
                new_transaction.amount,
                new_transaction.kind,
                new_transaction.date.unix_timestamp(),
                new_transaction.note,
                created_at,
            ),
            map_transaction_row,
        )?;

    Ok(TransactionWithCategory {
        transaction,
        category: Some(category),
    })
}

/// Retrieve the transactions of `user_id` that happened within `range`, newest first.
///
/// Transactions whose category no longer exists are included with no category.
pub fn get_transactions_in_range(
    user_id: UserID,
    range: &MonthRange,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.amount, t.kind, t.date, t.category_id, t.note, t.created_at,
                    c.id, c.name, c.kind
             FROM \"transaction\" t
             LEFT JOIN category c ON c.id = t.category_id AND c.user_id = t.user_id
             WHERE t.user_id = ?1 AND t.date >= ?2 AND t.date < ?3
             ORDER BY t.date DESC, t.id DESC",
        )?
        .query_map(
            (
                user_id.as_i64(),
                range.start.unix_timestamp(),
                range.end.unix_timestamp(),
            ),
            |row| {
                let transaction = map_transaction_row(row)?;
                let category = match row.get::<_, Option<i64>>(7)? {
                    Some(id) => Some(Category {
                        id,
                        name: CategoryName::new_unchecked(&row.get::<_, String>(8)?),
                        kind: row.get(9)?,
                    }),
                    None => None,
                };

                Ok(TransactionWithCategory {
                    transaction,
                    category,
                })
            },
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Initialize the transaction table and indexes.
///
/// `category_id` is not a foreign key: deleting a category leaves its transactions in place.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            amount INTEGER NOT NULL CHECK (amount > 0),
            kind TEXT NOT NULL CHECK (kind IN ('INCOME', 'EXPENSE')),
            date INTEGER NOT NULL,
            note TEXT,
            created_at INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_user_kind_date ON \"transaction\"(user_id, kind, date);",
    )?;

    Ok(())
}

/// Map a row starting with the columns
/// `id, amount, kind, date, category_id, note, created_at` to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        kind: row.get(2)?,
        date: timestamp_from_column(row, 3)?,
        category_id: row.get(4)?,
        note: row.get(5)?,
        created_at: timestamp_from_column(row, 6)?,
    })
}

fn timestamp_from_column(row: &Row, index: usize) -> Result<OffsetDateTime, rusqlite::Error> {
    let seconds: i64 = row.get(index)?;

    OffsetDateTime::from_unix_timestamp(seconds).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error))
    })
}
