use std::path::{Path, PathBuf};

use anyhow::Context;
use arcsync::Config;
use arcsync_fetch::{TransportOptions, UrlTransport};
use tracing_subscriber::EnvFilter;

mod dates;
mod fetch;
mod poll;

/// Fetch remote archives into a build workspace when they change
#[derive(Debug, clap::Parser)]
#[command(version, about, arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file
    #[arg(short, long, global = true, default_value = "arcsync.toml")]
    pub config: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    Fetch(fetch::Fetch),
    Poll(poll::Poll),
    Dates(dates::Dates),
}

impl Command {
    pub async fn run(self, config: &Path) -> anyhow::Result<()> {
        let config = Config::load(config)?;
        match self {
            Self::Fetch(cmd) => cmd.run(config).await,
            Self::Poll(cmd) => cmd.run(config).await,
            Self::Dates(cmd) => cmd.run(config),
        }
    }
}

/// `RUST_LOG` wins over `verbose` when set.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn transport(options: TransportOptions) -> anyhow::Result<UrlTransport<arcsync_fetch::ReqwestClient>> {
    UrlTransport::from_options(options).context("failed to set up transport")
}
