//! Conditional fetch of remote resources into a build workspace.
//!
//! A fetch checks each resource's change indicator, skips resources whose
//! marker file already records it, and downloads and materializes the rest.
//! A poll compares current indicators against the ledger of the previous run
//! to decide whether a fetch is needed at all.
//!
//! - [`engine`] - [`FetchEngine`] and [`PollEngine`]
//! - [`ledger`] - [`ChangeLedger`] handed from fetch to poll
//! - [`config`] - TOML configuration for the command-line host
//! - [`state`] - run history persisted by the host

pub mod config;
pub mod engine;
mod error;
pub mod ledger;
pub mod state;

pub use config::Config;
pub use engine::{FetchEngine, FetchReport, PollEngine, PollReport, PollVerdict, PriorRun};
pub use error::{ConfigError, FetchError, PollCheckError, StateError};
pub use ledger::ChangeLedger;
pub use state::RunState;
