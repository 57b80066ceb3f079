//! Pure functions with no I/O.

mod auth;
mod retry;

pub use auth::basic_authorization;
pub use retry::retry_delay;
