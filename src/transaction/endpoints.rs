//! Endpoints for listing and creating transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    month::MonthQuery,
    transaction::{
        NewTransactionData, TransactionWithCategory, create_transaction, get_transactions_in_range,
    },
};

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the user's transactions in the month given by the `month` query parameter.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionEndpointState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<TransactionWithCategory>>, Error> {
    let range = query.range()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions_in_range(user_id, &range, &connection).map(Json)
}

/// Create a transaction for the user.
///
/// Responds with 201 and the transaction with its category, 422 if the body is invalid, 404 if
/// the category is not the user's and 400 if the transaction and category kinds differ.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionEndpointState>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<NewTransactionData>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(data) = payload?;
    let new_transaction = data.validate()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(user_id, new_transaction, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)).into_response())
}
