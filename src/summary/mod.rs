//! The monthly summary of a user's income, expenses and top expense categories.

mod aggregator;
mod endpoint;
pub mod store;

pub use aggregator::{
    MonthlySummary, TOP_CATEGORY_LIMIT, TopCategory, UNKNOWN_CATEGORY_LABEL, compute_summary,
};
pub use endpoint::{SummaryState, get_summary_endpoint};
