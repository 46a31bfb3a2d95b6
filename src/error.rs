//! Defines the app level error type and its conversion to JSON responses.
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::validation::ValidationIssue;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password combination did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request did not carry a valid session.
    #[error("no valid session in the request")]
    Unauthorized,

    /// The email or password was missing from a registration request.
    #[error("email and password are required")]
    MissingCredentials,

    /// The query string of a request failed validation.
    #[error("query validation failed: {0:?}")]
    InvalidQuery(Vec<ValidationIssue>),

    /// The JSON body of a request failed validation.
    #[error("body validation failed: {0:?}")]
    InvalidBody(Vec<ValidationIssue>),

    /// The request body was not JSON, or could not be parsed as JSON.
    #[error("the request body is not valid JSON")]
    MalformedJson,

    /// The email is already used by another user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The user already has a category with the same name and kind.
    #[error("the category already exists")]
    DuplicateCategory,

    /// The category does not exist or belongs to another user.
    #[error("the category could not be found")]
    CategoryNotFound,

    /// A transaction was created with a kind different from its category's kind.
    #[error("the transaction kind must match the category kind")]
    KindMismatch,

    /// The session cookie could not be created.
    #[error("could not create the session cookie: {0}")]
    SessionError(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A blocking database task panicked or was cancelled before finishing.
    #[error("a background database task failed: {0}")]
    BackgroundTaskFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.contains("category.") =>
            {
                Error::DuplicateCategory
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        tracing::error!("a blocking database task failed: {value}");
        Error::BackgroundTaskFailed(value.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(value: JsonRejection) -> Self {
        match value {
            // The body was valid JSON but did not fit the expected shape, e.g. a string
            // where a number was expected.
            JsonRejection::JsonDataError(error) => {
                Error::InvalidBody(vec![ValidationIssue::new("body", error.body_text())])
            }
            _ => Error::MalformedJson,
        }
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<Vec<ValidationIssue>>,
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            message,
            issues: None,
        }),
    )
        .into_response()
}

fn json_validation_error(message: &str, issues: Vec<ValidationIssue>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody {
            message,
            issues: Some(issues),
        }),
    )
        .into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidCredentials => {
                json_error(StatusCode::UNAUTHORIZED, "Incorrect email or password")
            }
            Error::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "Unauthorized"),
            Error::MissingCredentials => {
                json_error(StatusCode::BAD_REQUEST, "Email and password are required")
            }
            Error::InvalidQuery(issues) => json_validation_error("Query validation failed", issues),
            Error::InvalidBody(issues) => json_validation_error("Validation failed", issues),
            Error::MalformedJson => json_error(StatusCode::BAD_REQUEST, "Body must be JSON"),
            Error::DuplicateEmail => json_error(StatusCode::CONFLICT, "Email is already in use"),
            Error::DuplicateCategory => {
                json_error(StatusCode::CONFLICT, "Category already exists")
            }
            Error::CategoryNotFound => json_error(StatusCode::NOT_FOUND, "Category not found"),
            Error::KindMismatch => json_error(
                StatusCode::BAD_REQUEST,
                "Transaction type must match the category type",
            ),
            Error::NotFound => json_error(StatusCode::NOT_FOUND, "Not found"),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
