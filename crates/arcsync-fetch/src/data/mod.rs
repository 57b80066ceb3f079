//! Immutable data types.

mod indicator;
mod options;
mod resource;

pub use indicator::ChangeIndicator;
pub use options::{ProxyConfig, RetryPolicy, TransportOptions};
pub use resource::{Credentials, ResourceDescriptor};
