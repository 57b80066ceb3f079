use std::future::Future;
use std::io::{Seek, SeekFrom};
use std::path::PathBuf;

use futures_util::TryStreamExt;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use url::Url;

use super::http::{HttpClient, HttpRequest};
use crate::core::retry_delay;
use crate::data::{ChangeIndicator, ProxyConfig, ResourceDescriptor, RetryPolicy};
use crate::error::{BoxError, TransportError};

/// Downloaded content, positioned at its first byte.
#[derive(Debug)]
pub struct Download {
    pub file: std::fs::File,
    pub bytes: u64,
}

/// Access to remote resources: change check and full download.
pub trait Transport: Send + Sync {
    /// Current change indicator of `resource`, [`ChangeIndicator::UNKNOWN`]
    /// when the source does not report one.
    fn check_changed(
        &self,
        resource: &ResourceDescriptor,
    ) -> impl Future<Output = Result<ChangeIndicator, TransportError>> + Send;

    fn download(
        &self,
        resource: &ResourceDescriptor,
    ) -> impl Future<Output = Result<Download, TransportError>> + Send;

    /// Proxy all requests go through, if any.
    fn proxy(&self) -> Option<&ProxyConfig> {
        None
    }
}

enum Scheme {
    Http,
    File(PathBuf),
}

/// [`Transport`] for `http`, `https` and `file` URLs.
pub struct UrlTransport<C> {
    client: C,
    retry: RetryPolicy,
    proxy: Option<ProxyConfig>,
}

#[cfg(feature = "reqwest")]
impl UrlTransport<super::ReqwestClient> {
    /// Transport over a reqwest client configured from `options`.
    pub fn from_options(options: crate::data::TransportOptions) -> Result<Self, TransportError> {
        let client = super::ReqwestClient::new(&options)?;
        Ok(Self {
            client,
            retry: options.retry,
            proxy: options.proxy,
        })
    }
}

impl<C: HttpClient> UrlTransport<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
            proxy: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Records the proxy `client` was built with, for reporting.
    pub fn with_proxy(mut self, proxy: Option<ProxyConfig>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn scheme(resource: &ResourceDescriptor, url: &Url) -> Result<Scheme, TransportError> {
        match url.scheme() {
            "http" | "https" => Ok(Scheme::Http),
            "file" => url
                .to_file_path()
                .map(Scheme::File)
                .map_err(|()| TransportError::InvalidUrl {
                    url: resource.url().to_string(),
                    reason: "not a local file path".to_string(),
                }),
            other => Err(TransportError::UnsupportedScheme {
                url: resource.url().to_string(),
                scheme: other.to_string(),
            }),
        }
    }

    async fn download_http(
        &self,
        resource: &ResourceDescriptor,
        url: &Url,
    ) -> Result<Download, TransportError> {
        let request = HttpRequest {
            url,
            credentials: resource.credentials(),
        };
        let staging = tempfile::tempfile().map_err(TransportError::Staging)?;
        let mut staging = tokio::fs::File::from_std(staging);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let failure: BoxError = match self.client.stream(request).await {
                Ok(mut body) => {
                    staging.set_len(0).await.map_err(TransportError::Staging)?;
                    staging.rewind().await.map_err(TransportError::Staging)?;

                    let mut bytes = 0u64;
                    let outcome = loop {
                        match body.try_next().await {
                            Ok(Some(chunk)) => {
                                staging
                                    .write_all(&chunk)
                                    .await
                                    .map_err(TransportError::Staging)?;
                                bytes += chunk.len() as u64;
                            }
                            Ok(None) => break Ok(bytes),
                            Err(e) => break Err(e),
                        }
                    };
                    match outcome {
                        Ok(bytes) => {
                            staging.flush().await.map_err(TransportError::Staging)?;
                            let mut file = staging.into_std().await;
                            file.seek(SeekFrom::Start(0))
                                .map_err(TransportError::Staging)?;
                            tracing::debug!(url = %resource, bytes, attempt, "transfer complete");
                            return Ok(Download { file, bytes });
                        }
                        Err(e) => {
                            tracing::debug!(url = %resource, bytes, attempt, error = %e, "transfer interrupted");
                            Box::new(e)
                        }
                    }
                }
                Err(e) if attempt == 1 => {
                    return Err(TransportError::Connection {
                        url: resource.url().to_string(),
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    tracing::debug!(url = %resource, attempt, error = %e, "reconnect failed");
                    Box::new(e)
                }
            };

            if attempt >= self.retry.max_attempts {
                return Err(TransportError::TransferFailed {
                    url: resource.url().to_string(),
                    attempts: attempt,
                    source: failure,
                });
            }
            let delay = retry_delay(attempt - 1, self.retry.base_delay);
            tracing::debug!(url = %resource, attempt, ?delay, "retrying download");
            tokio::time::sleep(delay).await;
        }
    }
}

impl<C: HttpClient> Transport for UrlTransport<C> {
    async fn check_changed(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<ChangeIndicator, TransportError> {
        let url = resource.parse_url()?;
        let connection = |source: BoxError| TransportError::Connection {
            url: resource.url().to_string(),
            source,
        };

        match Self::scheme(resource, &url)? {
            Scheme::Http => {
                let request = HttpRequest {
                    url: &url,
                    credentials: resource.credentials(),
                };
                let modified = self
                    .client
                    .last_modified(request)
                    .await
                    .map_err(|e| connection(Box::new(e)))?;
                Ok(modified.map_or(ChangeIndicator::UNKNOWN, ChangeIndicator::from))
            }
            Scheme::File(path) => {
                let metadata = tokio::fs::metadata(&path)
                    .await
                    .map_err(|e| connection(Box::new(e)))?;
                Ok(metadata
                    .modified()
                    .map_or(ChangeIndicator::UNKNOWN, ChangeIndicator::from))
            }
        }
    }

    async fn download(&self, resource: &ResourceDescriptor) -> Result<Download, TransportError> {
        let url = resource.parse_url()?;
        match Self::scheme(resource, &url)? {
            Scheme::Http => self.download_http(resource, &url).await,
            Scheme::File(path) => {
                let connection = |e: std::io::Error| TransportError::Connection {
                    url: resource.url().to_string(),
                    source: Box::new(e),
                };
                let file = tokio::fs::File::open(&path).await.map_err(connection)?;
                let file = file.into_std().await;
                let bytes = file.metadata().map_err(connection)?.len();
                Ok(Download { file, bytes })
            }
        }
    }

    fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }
}
