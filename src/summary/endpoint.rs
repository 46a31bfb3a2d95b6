//! The monthly summary endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    month::MonthQuery,
    summary::{
        MonthlySummary, compute_summary,
        store::{SQLiteCategoryStore, SQLiteTransactionStore},
    },
};

/// The state needed for computing summaries.
#[derive(Debug, Clone)]
pub struct SummaryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Get the summary of the user's transactions in the month given by the `month` query
/// parameter, e.g. `?month=2026-02`.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlySummary>, Error> {
    let month = query.month.unwrap_or_default();
    let transactions = SQLiteTransactionStore::new(state.db_connection.clone());
    let categories = SQLiteCategoryStore::new(state.db_connection);

    compute_summary(user_id, &month, &transactions, &categories)
        .await
        .map(Json)
}
