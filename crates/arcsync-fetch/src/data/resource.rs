use std::fmt;

use serde::Deserialize;
use url::Url;

use crate::error::TransportError;

/// Username and password for HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Returns `None` when `username` is blank; the password is dropped with it.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Option<Self> {
        let username = username.into();
        if username.trim().is_empty() {
            return None;
        }
        Some(Self {
            username,
            password: password.into(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A remote resource to fetch.
///
/// Identity is the URL string: two descriptors with the same URL share one
/// ledger entry and one marker file.
///
/// # Examples
///
/// ```
/// use arcsync_fetch::ResourceDescriptor;
///
/// let anonymous = ResourceDescriptor::new("https://example.com/dist/app.tar.gz", "", "ignored");
/// assert!(anonymous.credentials().is_none());
/// assert_eq!(anonymous.file_name().unwrap(), "app.tar.gz");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "ResourceEntry")]
pub struct ResourceDescriptor {
    url: String,
    credentials: Option<Credentials>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ResourceEntry {
    url: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

impl From<ResourceEntry> for ResourceDescriptor {
    fn from(entry: ResourceEntry) -> Self {
        Self::new(entry.url, entry.username, entry.password)
    }
}

impl ResourceDescriptor {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            credentials: Credentials::new(username, password),
        }
    }

    pub fn anonymous(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn parse_url(&self) -> Result<Url, TransportError> {
        Url::parse(&self.url).map_err(|e| TransportError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }

    /// Final path segment of the URL, without query or fragment.
    pub fn file_name(&self) -> Result<String, TransportError> {
        let url = self.parse_url()?;
        url.path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| TransportError::InvalidUrl {
                url: self.url.clone(),
                reason: "path has no file name".to_string(),
            })
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
