//! User accounts, password hashing and cookie based sessions.

pub(crate) mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register;
mod user;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use log_in::{LogInData, LoggedIn, LoginState, post_log_in};
pub use log_out::post_log_out;
pub use middleware::{AuthState, auth_guard};
pub use password::{PasswordHash, ValidatedPassword};
pub use register::{RegisterData, RegisteredUser, RegistrationState, register_user};
pub use user::{User, UserID, create_user, create_user_table, get_user_by_email};
