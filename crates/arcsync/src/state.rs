//! Run history persisted between invocations of the host.

use std::path::Path;

use arcsync_fs::{AtomicWriteOptions, atomic_read, atomic_write};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::engine::PriorRun;
use crate::error::StateError;
use crate::ledger::ChangeLedger;

/// What the host remembers about its last fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    #[serde(default)]
    pub last_run: Option<PriorRun>,
}

impl RunState {
    /// Missing file means no run has happened yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        read_json(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StateError> {
        write_json(path.as_ref(), self)
    }

    /// Records the next run. `None` marks a run that failed and left no ledger.
    pub fn advance(&mut self, ledger: Option<ChangeLedger>) -> &PriorRun {
        let number = self.last_run.as_ref().map_or(1, |run| run.number + 1);
        self.last_run.insert(PriorRun { number, ledger })
    }

    /// Ledger of the last run, if it succeeded.
    pub fn last_ledger(&self) -> Option<&ChangeLedger> {
        self.last_run.as_ref().and_then(|run| run.ledger.as_ref())
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StateError> {
    let bytes = atomic_read(path)?;
    serde_json::from_slice(&bytes).map_err(|source| StateError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StateError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(StateError::Encode)?;
    atomic_write(path, &bytes, AtomicWriteOptions::new().sync(true))?;
    Ok(())
}
