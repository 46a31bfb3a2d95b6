//! Transactions record money that was earned or spent, each filed under one of the user's
//! categories.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_transaction, create_transaction_table, get_transactions_in_range, map_transaction_row,
};
pub use domain::{
    AmountError, DateParseError, MAX_NOTE_LENGTH, NewTransaction, NewTransactionData,
    Transaction, TransactionId, TransactionWithCategory, parse_amount, parse_transaction_date,
};
pub use endpoints::{
    TransactionEndpointState, create_transaction_endpoint, get_transactions_endpoint,
};
