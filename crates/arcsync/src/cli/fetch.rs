use anyhow::Context;
use arcsync::{Config, FetchEngine, RunState};

/// Download changed resources into the destination
#[derive(Debug, clap::Args)]
pub struct Fetch {
    /// Delete the destination's contents first, overriding the config
    #[arg(long)]
    clear: bool,
}

impl Fetch {
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        let engine = FetchEngine::new(super::transport(config.transport_options())?)
            .clear_workspace(self.clear || config.clear_workspace);

        let mut state = RunState::load(&config.state_file)?;
        let result = engine.run(&config.resources, &config.destination).await;

        let ledger = result.as_ref().ok().map(|report| report.ledger.clone());
        let run = state.advance(ledger).number;
        state
            .save(&config.state_file)
            .with_context(|| format!("failed to record run {run}"))?;

        let report = result.with_context(|| format!("run {run} failed"))?;
        println!(
            "run {run}: {} downloaded, {} up to date",
            report.downloaded.len(),
            report.up_to_date.len()
        );
        Ok(())
    }
}
