use std::fmt;
use std::path::Path;

use arcsync_fetch::{ResourceDescriptor, Transport};
use serde::{Deserialize, Serialize};

use super::log_proxy;
use crate::error::PollCheckError;
use crate::ledger::ChangeLedger;

/// Whether the host should run a fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollVerdict {
    /// No usable previous run or destination.
    FetchNow,
    /// A resource differs from the last ledger, or there is no ledger.
    SignificantChange,
    NoChange,
}

impl PollVerdict {
    pub fn needs_fetch(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchNow => "fetch-now",
            Self::SignificantChange => "significant-change",
            Self::NoChange => "no-change",
        }
    }
}

impl fmt::Display for PollVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The most recent fetch as the host remembers it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorRun {
    pub number: u64,
    /// `None` when that run failed.
    pub ledger: Option<ChangeLedger>,
}

#[derive(Debug)]
pub struct PollReport {
    pub verdict: PollVerdict,
    /// Resources whose change check was attempted.
    pub checked: usize,
    pub failures: Vec<PollCheckError>,
}

impl PollReport {
    fn decided(verdict: PollVerdict) -> Self {
        Self {
            verdict,
            checked: 0,
            failures: Vec::new(),
        }
    }
}

/// Decides whether resources changed since a prior run. Never fails: a
/// check that errors is recorded and skipped.
pub struct PollEngine<T> {
    transport: T,
}

impl<T: Transport> PollEngine<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Stops checking at the first resource whose indicator differs from
    /// the one recorded in `previous`.
    pub async fn poll(
        &self,
        resources: &[ResourceDescriptor],
        destination: Option<&Path>,
        previous: Option<&PriorRun>,
    ) -> PollReport {
        let Some(previous) = previous else {
            tracing::info!("no previous run");
            return PollReport::decided(PollVerdict::FetchNow);
        };
        if let Some(destination) = destination
            && !destination.exists()
        {
            tracing::info!(dest = %destination.display(), "destination missing");
            return PollReport::decided(PollVerdict::FetchNow);
        }
        let Some(ledger) = previous.ledger.as_ref() else {
            tracing::info!(run = previous.number, "previous run left no ledger");
            return PollReport::decided(PollVerdict::SignificantChange);
        };

        log_proxy(self.transport.proxy());
        let mut report = PollReport::decided(PollVerdict::NoChange);
        for resource in resources {
            report.checked += 1;
            let current = match self.transport.check_changed(resource).await {
                Ok(indicator) => indicator,
                Err(source) => {
                    let failure = PollCheckError {
                        url: resource.url().to_string(),
                        source,
                    };
                    tracing::warn!(url = %resource, error = %failure.source, "change check failed");
                    report.failures.push(failure);
                    continue;
                }
            };

            let recorded = ledger.get(resource.url());
            if current != recorded {
                tracing::info!(
                    url = %resource,
                    recorded = %recorded,
                    current = %current,
                    "changed since run {}",
                    previous.number
                );
                report.verdict = PollVerdict::SignificantChange;
                return report;
            }
            tracing::debug!(url = %resource, "unchanged");
        }
        report
    }
}
