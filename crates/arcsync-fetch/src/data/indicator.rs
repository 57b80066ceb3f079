use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Remote modification time in epoch milliseconds.
///
/// [`ChangeIndicator::UNKNOWN`] marks a source that does not report one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeIndicator(i64);

impl ChangeIndicator {
    pub const UNKNOWN: Self = Self(0);

    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn millis(self) -> i64 {
        self.0
    }

    pub const fn is_known(self) -> bool {
        self.0 != Self::UNKNOWN.0
    }
}

impl From<SystemTime> for ChangeIndicator {
    fn from(time: SystemTime) -> Self {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_millis())
                .map(|m| -m)
                .unwrap_or(i64::MIN),
        };
        Self(millis)
    }
}

impl fmt::Display for ChangeIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_known() {
            return f.write_str("Last-modified not supported");
        }
        match DateTime::from_timestamp_millis(self.0) {
            Some(utc) => write!(f, "{}", utc.with_timezone(&Local).to_rfc2822()),
            None => write!(f, "{} ms", self.0),
        }
    }
}
