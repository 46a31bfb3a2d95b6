//! A REST API for tracking personal income and expenses.
//!
//! Users register and log in with an email and password, file their transactions under
//! income and expense categories, and request a summary of any month: total income, total
//! expenses, the balance and the five biggest expense categories.

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod config;
mod db;
mod endpoints;
mod error;
mod logging;
mod month;
mod routing;
mod summary;
mod transaction;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, create_cookie_key};
pub use auth::{PasswordHash, User, UserID, ValidatedPassword, create_user};
pub use category::{
    Category, CategoryId, CategoryName, Kind, get_categories, seed_default_categories,
};
pub use config::Config;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::{MonthRange, YearMonth};
pub use routing::build_router;
pub use summary::{MonthlySummary, TopCategory, compute_summary};
pub use transaction::{NewTransaction, Transaction, create_transaction};
pub use validation::ValidationIssue;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
