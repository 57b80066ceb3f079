use arcsync::{Config, RunState};

/// Print the modification dates recorded by the last successful fetch
#[derive(Debug, clap::Args)]
pub struct Dates {}

impl Dates {
    pub fn run(self, config: Config) -> anyhow::Result<()> {
        let state = RunState::load(&config.state_file)?;
        match state.last_ledger() {
            Some(ledger) => {
                for (url, date) in ledger.url_dates() {
                    println!("{url}\t{date}");
                }
            }
            None => eprintln!("no successful run recorded"),
        }
        Ok(())
    }
}
