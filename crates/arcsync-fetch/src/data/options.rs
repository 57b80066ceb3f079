use std::time::Duration;

use serde::Deserialize;

use super::resource::Credentials;
use crate::core::basic_authorization;

/// Bounds on re-downloading after a body read failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Never below 1.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles after each further failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }
}

/// Proxy every request goes through. Absence means direct connections.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "ProxyEntry")]
pub struct ProxyConfig {
    pub url: String,
    pub credentials: Option<Credentials>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProxyEntry {
    url: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

impl From<ProxyEntry> for ProxyConfig {
    fn from(entry: ProxyEntry) -> Self {
        Self::new(entry.url).with_credentials(entry.username, entry.password)
    }
}

impl ProxyConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
        }
    }

    /// A blank username clears the credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Credentials::new(username, password);
        self
    }

    /// `Proxy-Authorization` header value, if credentials are set.
    pub fn authorization(&self) -> Option<String> {
        self.credentials
            .as_ref()
            .map(|c| basic_authorization(c.username(), c.password()))
    }
}

/// Settings applied when building a transport.
#[derive(Clone, Debug, Default)]
pub struct TransportOptions {
    pub proxy: Option<ProxyConfig>,
    pub retry: RetryPolicy,
    /// Unset means no connect timeout.
    pub connect_timeout: Option<Duration>,
}

impl TransportOptions {
    pub fn proxy(mut self, proxy: Option<ProxyConfig>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}
