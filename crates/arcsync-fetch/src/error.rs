//! Error types for arcsync-fetch.

use std::io;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported URL scheme '{scheme}' in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("cannot connect to {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("transfer of {url} failed after {attempts} attempts: {source}")]
    TransferFailed {
        url: String,
        attempts: u32,
        #[source]
        source: BoxError,
    },

    #[error("staging file error: {0}")]
    Staging(#[source] io::Error),

    #[error("invalid proxy '{url}': {source}")]
    Proxy {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] BoxError),
}

impl TransportError {
    /// Whether the resource could not be reached at all, as opposed to a
    /// transfer that started and then failed.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. } | Self::UnsupportedScheme { .. } | Self::Connection { .. }
        )
    }
}
