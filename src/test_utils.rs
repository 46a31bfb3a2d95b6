//! Helpers shared by the unit tests.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    auth::{PasswordHash, UserID, ValidatedPassword, create_user},
    db::initialize,
};

/// The bcrypt cost used in tests. The minimum cost keeps tests fast.
pub(crate) const TEST_PASSWORD_COST: u32 = 4;

/// Get an in-memory database with all the application tables.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Get an in-memory database with all the application tables, ready to be shared by handlers.
pub(crate) fn get_test_connection_shared() -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(get_test_connection()))
}

/// Register a user with `email` and `password` and return their ID.
pub(crate) fn create_test_user(email: &str, password: &str, connection: &Connection) -> UserID {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(password),
        TEST_PASSWORD_COST,
    )
    .expect("Could not hash password");

    create_user(email, None, password_hash, connection)
        .expect("Could not create test user")
        .id
}
