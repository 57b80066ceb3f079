use arcsync::{Config, PollEngine, RunState};

/// Report whether a fetch is needed
#[derive(Debug, clap::Args)]
pub struct Poll {}

impl Poll {
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        let state = RunState::load(&config.state_file)?;
        let engine = PollEngine::new(super::transport(config.transport_options())?);

        let report = engine
            .poll(
                &config.resources,
                Some(config.destination.as_path()),
                state.last_run.as_ref(),
            )
            .await;

        for failure in &report.failures {
            eprintln!("warning: {failure}");
        }
        println!("{}", report.verdict);
        Ok(())
    }
}
