//! The endpoint for logging in with an email and password.
//!
//! A successful log-in sets the encrypted session cookie that the auth guard checks.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{UserID, cookie::set_auth_cookie, user::get_user_by_email},
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which sessions are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials sent in a log-in request.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the password hash in the database.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// The body returned on a successful log-in.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedIn {
    pub id: UserID,
    pub email: String,
}

/// Handler for log-in requests.
///
/// On success the session cookie is set and the user's ID and email are returned.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the email is unknown or the password is wrong. Both
/// cases produce the same response so that clients cannot probe for registered emails.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    payload: Result<Json<LogInData>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(user_data) = payload?;

    if user_data.email.is_empty() || user_data.password.is_empty() {
        return Err(Error::InvalidCredentials);
    }

    let user = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_email(&user_data.email, &connection)?.ok_or(Error::InvalidCredentials)?
    };

    let is_password_valid = user
        .password_hash
        .verify(&user_data.password)
        .map_err(|error| {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            Error::HashingError(error.to_string())
        })?;

    if !is_password_valid {
        return Err(Error::InvalidCredentials);
    }

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((
        jar,
        Json(LoggedIn {
            id: user.id,
            email: user.email,
        }),
    )
        .into_response())
}

#[cfg(test)]
mod log_in_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_extra::extract::cookie::Key;
    use axum_test::TestServer;
    use serde_json::json;
    use sha2::{Digest, Sha512};

    use crate::{
        auth::{DEFAULT_COOKIE_DURATION, cookie::COOKIE_TOKEN},
        test_utils::{create_test_user, get_test_connection_shared},
    };

    use super::{LoggedIn, LoginState, post_log_in};

    fn get_test_server() -> TestServer {
        let db_connection = get_test_connection_shared();
        create_test_user("foo@bar.baz", "hunter2", &db_connection.lock().unwrap());

        let state = LoginState {
            cookie_key: Key::from(&Sha512::digest("foobar")),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection,
        };
        let app = Router::new()
            .route("/log_in", post(post_log_in))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = get_test_server();

        let response = server
            .post("/log_in")
            .json(&json!({"email": "foo@bar.baz", "password": "hunter2"}))
            .await;

        response.assert_status_ok();
        let body: LoggedIn = response.json();
        assert_eq!(body.email, "foo@bar.baz");
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = get_test_server();

        let response = server
            .post("/log_in")
            .json(&json!({"email": "foo@bar.baz", "password": "hunter3"}))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert!(response.maybe_cookie(COOKIE_TOKEN).is_none());
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = get_test_server();

        let response = server
            .post("/log_in")
            .json(&json!({"email": "bar@bar.baz", "password": "hunter2"}))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_empty_credentials() {
        let server = get_test_server();

        let response = server.post("/log_in").json(&json!({})).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
