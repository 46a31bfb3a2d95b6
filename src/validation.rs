//! Structured validation issues returned to API clients.
//!
//! Request inputs are parsed into typed structs at the boundary. Anything that
//! fails is reported as a list of [ValidationIssue]s so the client can see
//! every problem with its request at once.

use serde::Serialize;

/// A single problem with a field of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// The name of the offending field as it appears in the request, e.g. "month".
    pub field: String,
    /// A human readable explanation of what is wrong with the field.
    pub message: String,
}

impl ValidationIssue {
    /// Create an issue for `field`.
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_owned(),
            message: message.into(),
        }
    }
}

/// Collects validation issues while checking the fields of a request.
#[derive(Debug, Default)]
pub(crate) struct Issues(Vec<ValidationIssue>);

impl Issues {
    pub(crate) fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(ValidationIssue::new(field, message));
    }

    /// Record the error of `result` against `field` and return its value, if any.
    pub(crate) fn check<T, E: std::fmt::Display>(
        &mut self,
        field: &str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(field, error.to_string());
                None
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_vec(self) -> Vec<ValidationIssue> {
        self.0
    }
}
