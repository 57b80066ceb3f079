//! I/O operations behind trait seams.

mod http;
mod transport;

pub use http::{BoxStream, HttpClient, HttpRequest};
pub use transport::{Download, Transport, UrlTransport};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
