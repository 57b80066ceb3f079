//! Conditional transport for remote resources.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable resource, indicator and option types
//! - [`core`] - Pure transformations (retry delays, authorization headers)
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Key Features
//!
//! - **Change Check**: modification time without transferring the body
//! - **Bounded Retry**: body read failures restart the download a fixed number of times
//! - **Scoped Credentials**: resource and proxy credentials travel with each request,
//!   never through process-global state

pub mod core;
pub mod data;
pub mod effects;
mod error;
mod reader;

pub use self::core::{basic_authorization, retry_delay};
pub use data::{ChangeIndicator, Credentials, ProxyConfig, ResourceDescriptor, RetryPolicy, TransportOptions};
pub use effects::{BoxStream, Download, HttpClient, HttpRequest, Transport, UrlTransport};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{BoxError, TransportError};
pub use reader::CountingReader;
