//! The endpoint for registering a new user.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{PasswordHash, UserID, ValidatedPassword, user::create_user},
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost used when hashing new passwords.
    pub password_cost: u32,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            password_cost: state.password_cost,
        }
    }
}

/// The JSON body of a registration request.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterData {
    /// The email the user will log in with.
    #[serde(default)]
    pub email: String,
    /// The user's raw password.
    #[serde(default)]
    pub password: String,
    /// An optional display name.
    pub name: Option<String>,
}

/// The user details returned after registration. Never includes the password hash.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisteredUser {
    pub id: UserID,
    pub email: String,
    pub name: Option<String>,
}

/// A route handler for registering a new user.
///
/// Responds with 201 and the new user on success, 400 if the email or password is missing and
/// 409 if the email is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    payload: Result<Json<RegisterData>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(user_data) = payload?;

    if user_data.email.is_empty() {
        return Err(Error::MissingCredentials);
    }

    let validated_password = ValidatedPassword::new(&user_data.password)?;
    let password_hash = PasswordHash::new(validated_password, state.password_cost)
        .inspect_err(|error| {
            tracing::error!("an error occurred while hashing a password: {error}")
        })?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = create_user(
        &user_data.email,
        user_data.name.as_deref(),
        password_hash,
        &connection,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id,
            email: user.email,
            name: user.name,
        }),
    )
        .into_response())
}
