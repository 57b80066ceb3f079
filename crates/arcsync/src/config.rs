//! TOML configuration for the command-line host.

use std::path::{Path, PathBuf};
use std::time::Duration;

use arcsync_fetch::{ProxyConfig, ResourceDescriptor, RetryPolicy, TransportOptions};
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_STATE_FILE: &str = ".arcsync-state.json";

/// Host configuration.
///
/// ```toml
/// destination = "work"
/// clear_workspace = false
///
/// [proxy]
/// url = "http://proxy:3128"
/// username = "u"
/// password = "p"
///
/// [[resource]]
/// url = "https://example.com/app.tar.gz"
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub destination: PathBuf,
    #[serde(default)]
    pub clear_workspace: bool,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceDescriptor>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_ms: u64::try_from(policy.base_delay.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

fn default_state_file() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILE)
}

impl Config {
    /// Load from `path`; relative paths inside resolve against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.destination = base.join(&config.destination);
            config.state_file = base.join(&config.state_file);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.destination.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("destination must not be empty".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".into()));
        }
        for resource in &self.resources {
            resource
                .file_name()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(())
    }

    pub fn transport_options(&self) -> TransportOptions {
        let retry = RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.base_delay_ms),
        );
        let options = TransportOptions::default()
            .proxy(self.proxy.clone())
            .retry(retry);
        match self.connect_timeout_secs {
            Some(secs) => options.connect_timeout(Duration::from_secs(secs)),
            None => options,
        }
    }
}
