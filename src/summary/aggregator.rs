//! Computes a user's income, expenses and biggest expense categories for one month.

use serde::Serialize;

use crate::{
    Error,
    auth::UserID,
    category::{CategoryId, Kind},
    month::{MonthRange, YearMonth},
    summary::store::{CategoryStore, TransactionStore},
};

/// The maximum number of expense categories listed in a summary.
pub const TOP_CATEGORY_LIMIT: usize = 5;

/// The name given to categories that could not be found.
pub const UNKNOWN_CATEGORY_LABEL: &str = "(Unknown)";

/// A category's share of the month's expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCategory {
    pub category_id: CategoryId,
    pub name: String,
    pub total: i64,
}

/// The totals for one month of a user's transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub range: MonthRange,
    pub total_income: i64,
    pub total_expense: i64,
    /// Income minus expenses. Negative when the user spent more than they earned.
    pub balance: i64,
    /// The largest expense categories, largest first.
    pub top_categories: Vec<TopCategory>,
}

/// Summarize the transactions of `user_id` in `month`, a string of the form `YYYY-MM`.
///
/// The income and expense totals are fetched concurrently. The expense categories are then
/// ranked and their names resolved. Categories that cannot be resolved are named
/// [UNKNOWN_CATEGORY_LABEL].
///
/// # Errors
///
/// Returns [Error::InvalidQuery] if `month` is malformed, in which case neither store is used.
/// Any store error aborts the whole computation and is returned as is.
pub async fn compute_summary<T, C>(
    user_id: UserID,
    month: &str,
    transactions: &T,
    categories: &C,
) -> Result<MonthlySummary, Error>
where
    T: TransactionStore + Clone + Send + 'static,
    C: CategoryStore + Clone + Send + 'static,
{
    let month: YearMonth = month.parse()?;
    let range = month.range()?;

    let (total_income, total_expense) = tokio::try_join!(
        run_blocking(transactions, move |store| {
            store.sum_amount(user_id, Kind::Income, &range)
        }),
        run_blocking(transactions, move |store| {
            store.sum_amount(user_id, Kind::Expense, &range)
        }),
    )?;
    let total_income = total_income.unwrap_or(0);
    let total_expense = total_expense.unwrap_or(0);

    let category_totals = run_blocking(transactions, move |store| {
        store.group_sum_by_category(user_id, Kind::Expense, &range, TOP_CATEGORY_LIMIT)
    })
    .await?;

    let category_ids: Vec<CategoryId> = category_totals
        .iter()
        .map(|category_total| category_total.category_id)
        .collect();
    let names = run_blocking(categories, move |store| {
        store.find_names(user_id, &category_ids)
    })
    .await?;

    let top_categories = category_totals
        .into_iter()
        .take(TOP_CATEGORY_LIMIT)
        .map(|category_total| TopCategory {
            category_id: category_total.category_id,
            name: names
                .get(&category_total.category_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_CATEGORY_LABEL.to_owned()),
            total: category_total.total,
        })
        .collect();

    Ok(MonthlySummary {
        month,
        range,
        total_income,
        total_expense,
        balance: total_income - total_expense,
        top_categories,
    })
}

/// Run a blocking store query on tokio's blocking thread pool.
async fn run_blocking<S, F, R>(store: &S, query: F) -> Result<R, Error>
where
    S: Clone + Send + 'static,
    F: FnOnce(S) -> Result<R, Error> + Send + 'static,
    R: Send + 'static,
{
    let store = store.clone();

    tokio::task::spawn_blocking(move || query(store)).await?
}
