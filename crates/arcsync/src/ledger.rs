//! Per-URL change indicators recorded by a completed fetch.

use std::collections::BTreeMap;
use std::path::Path;

use arcsync_fetch::ChangeIndicator;
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::state::{read_json, write_json};

/// URL → change indicator observed during one fetch.
///
/// Created empty when a fetch starts and handed back only if the fetch
/// succeeds, so a failed run never replaces the previous baseline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeLedger {
    entries: BTreeMap<String, ChangeIndicator>,
}

impl ChangeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records for the same URL replace earlier ones.
    pub fn record(&mut self, url: impl Into<String>, indicator: ChangeIndicator) {
        self.entries.insert(url.into(), indicator);
    }

    /// Recorded indicator, [`ChangeIndicator::UNKNOWN`] for unseen URLs.
    pub fn get(&self, url: &str) -> ChangeIndicator {
        self.entries
            .get(url)
            .copied()
            .unwrap_or(ChangeIndicator::UNKNOWN)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ChangeIndicator)> {
        self.entries.iter().map(|(url, indicator)| (url.as_str(), *indicator))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Human-readable modification date per URL.
    pub fn url_dates(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(url, indicator)| (url.to_string(), indicator.to_string()))
            .collect()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StateError> {
        read_json(path.as_ref())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StateError> {
        write_json(path.as_ref(), self)
    }
}

impl<S: Into<String>> FromIterator<(S, ChangeIndicator)> for ChangeLedger {
    fn from_iter<I: IntoIterator<Item = (S, ChangeIndicator)>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for (url, indicator) in iter {
            ledger.record(url, indicator);
        }
        ledger
    }
}
