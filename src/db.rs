//! Creates the application's database schema.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    auth::create_user_table, category::create_category_table,
    transaction::create_transaction_table,
};

/// Create all the application tables that do not exist yet.
///
/// The tables are created in a single exclusive transaction, so either all of them are
/// created or none are.
///
/// # Errors
///
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
