//! Fetch and poll over an ordered list of resources.
//!
//! Both engines process resources one at a time in list order and share a
//! [`Transport`](arcsync_fetch::Transport) for change checks.

mod fetch;
mod poll;

pub use fetch::{FetchEngine, FetchReport};
pub use poll::{PollEngine, PollReport, PollVerdict, PriorRun};

fn log_proxy(proxy: Option<&arcsync_fetch::ProxyConfig>) {
    match proxy {
        Some(proxy) => tracing::info!(
            proxy = %proxy.url,
            authenticated = proxy.credentials.is_some(),
            "using proxy"
        ),
        None => tracing::info!("not using proxy"),
    }
}
