//! The API endpoint URIs.

/// The route for registering a new user.
pub const REGISTER: &str = "/api/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for listing and creating categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route for creating the default categories.
pub const SEED_CATEGORIES: &str = "/api/categories/seed";
/// The route for listing and creating transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the monthly summary.
pub const SUMMARY: &str = "/api/summary";
