use std::future::Future;
use std::pin::Pin;
use std::time::SystemTime;

use bytes::Bytes;
use futures_util::Stream;
use url::Url;

use crate::data::Credentials;

/// Boxed response body stream.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// One request: the target and the credentials of the resource it belongs to.
#[derive(Clone, Copy, Debug)]
pub struct HttpRequest<'a> {
    pub url: &'a Url,
    pub credentials: Option<&'a Credentials>,
}

/// Asynchronous HTTP client abstraction.
///
/// Implementations follow redirects, apply the proxy they were built with
/// and map non-success statuses to errors.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// `Last-Modified` of the target without transferring the body.
    ///
    /// `Ok(None)` when the header is absent or unparseable. Servers that
    /// refuse `HEAD` are asked with `GET` and the body is left unread.
    fn last_modified(
        &self,
        request: HttpRequest<'_>,
    ) -> impl Future<Output = Result<Option<SystemTime>, Self::Error>> + Send;

    /// Open the target and return its body as a stream.
    ///
    /// An `Err` here means no connection; an `Err` item inside the stream
    /// means the transfer broke off.
    fn stream(
        &self,
        request: HttpRequest<'_>,
    ) -> impl Future<Output = Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error>>
    + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_client {
    use super::*;
    use reqwest::header::{CACHE_CONTROL, HeaderValue, LAST_MODIFIED, PRAGMA};
    use reqwest::{Client, Proxy, RequestBuilder, StatusCode};

    use crate::data::TransportOptions;
    use crate::error::TransportError;

    /// Production client. Proxy and its credentials are fixed at construction.
    #[derive(Clone, Debug)]
    pub struct ReqwestClient {
        client: Client,
    }

    impl ReqwestClient {
        pub fn new(options: &TransportOptions) -> Result<Self, TransportError> {
            let mut builder = Client::builder();
            if let Some(timeout) = options.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }

            builder = match &options.proxy {
                Some(config) => {
                    let proxy_error = |source: crate::error::BoxError| TransportError::Proxy {
                        url: config.url.clone(),
                        source,
                    };
                    let mut proxy =
                        Proxy::all(config.url.as_str()).map_err(|e| proxy_error(Box::new(e)))?;
                    if let Some(authorization) = config.authorization() {
                        let mut value = HeaderValue::from_str(&authorization)
                            .map_err(|e| proxy_error(Box::new(e)))?;
                        value.set_sensitive(true);
                        proxy = proxy.custom_http_auth(value);
                    }
                    builder.proxy(proxy)
                }
                None => builder.no_proxy(),
            };

            let client = builder
                .build()
                .map_err(|e| TransportError::ClientBuild(Box::new(e)))?;
            Ok(Self { client })
        }

        fn prepare(&self, builder: RequestBuilder, request: HttpRequest<'_>) -> RequestBuilder {
            let builder = builder
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
            match request.credentials {
                Some(credentials) => {
                    builder.basic_auth(credentials.username(), Some(credentials.password()))
                }
                None => builder,
            }
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn last_modified(
            &self,
            request: HttpRequest<'_>,
        ) -> Result<Option<SystemTime>, Self::Error> {
            let mut response = self
                .prepare(self.client.head(request.url.clone()), request)
                .send()
                .await?;
            if matches!(
                response.status(),
                StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
            ) {
                tracing::debug!(
                    url = %request.url,
                    status = %response.status(),
                    "HEAD refused, checking with GET"
                );
                // only the headers are read; dropping the response discards the body
                response = self
                    .prepare(self.client.get(request.url.clone()), request)
                    .send()
                    .await?;
            }
            let response = response.error_for_status()?;

            Ok(response
                .headers()
                .get(LAST_MODIFIED)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| httpdate::parse_http_date(s).ok()))
        }

        async fn stream(
            &self,
            request: HttpRequest<'_>,
        ) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
            let response = self
                .prepare(self.client.get(request.url.clone()), request)
                .send()
                .await?
                .error_for_status()?;
            Ok(Box::pin(response.bytes_stream()))
        }
    }

}

#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
