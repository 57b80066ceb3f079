use std::io;
use std::path::PathBuf;

use arcsync_fetch::{ResourceDescriptor, TransportError};
use thiserror::Error;

/// Failure of a fetch. The first failing resource aborts the whole run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot reach {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to transfer {url}: {source}")]
    Transfer {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to materialize {url}: {source}")]
    Extraction {
        url: String,
        #[source]
        source: arcsync_archive::Error,
    },

    #[error("workspace error in {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: arcsync_fs::Error,
    },
}

impl FetchError {
    pub(crate) fn transport(resource: &ResourceDescriptor, source: TransportError) -> Self {
        let url = resource.url().to_string();
        if source.is_connection() {
            Self::Connection { url, source }
        } else {
            Self::Transfer { url, source }
        }
    }

    /// URL of the resource that failed, if the failure belongs to one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Connection { url, .. }
            | Self::Transfer { url, .. }
            | Self::Extraction { url, .. } => Some(url),
            Self::Workspace { .. } => None,
        }
    }
}

/// A change check that failed during a poll. Polling continues past it.
#[derive(Debug, Error)]
#[error("change check of {url} failed: {source}")]
pub struct PollCheckError {
    pub url: String,
    #[source]
    pub source: TransportError,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure reading or writing persisted run state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Fs(#[from] arcsync_fs::Error),

    #[error("malformed state file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),
}
