use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TRIAL_LENGTH_DAYS: u32 = 7;

/// Gating decision derived from the records and the current time. Never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LicenseDecision {
    Licensed {
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
    Trial {
        remaining_days: u32,
    },
    Expired,
}

impl LicenseDecision {
    /// Evaluate a trial that started at `start`.
    ///
    /// Whole elapsed days are counted (floor). A start date in the future
    /// counts as zero elapsed days.
    pub fn from_trial_start(start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days = (now - start).num_days().max(0);
        let elapsed = u32::try_from(days).unwrap_or(u32::MAX);
        match TRIAL_LENGTH_DAYS.saturating_sub(elapsed) {
            0 => LicenseDecision::Expired,
            remaining_days => LicenseDecision::Trial { remaining_days },
        }
    }

    /// Whether the daemon may be used.
    pub fn allows_use(&self) -> bool {
        !matches!(self, LicenseDecision::Expired)
    }

    pub fn key(&self) -> &'static str {
        match self {
            LicenseDecision::Licensed { .. } => "licensed",
            LicenseDecision::Trial { .. } => "trial",
            LicenseDecision::Expired => "expired",
        }
    }

    /// Human-readable one-liner for status bars and tray tooltips.
    pub fn summary(&self) -> String {
        match self {
            LicenseDecision::Licensed { .. } => "License active".to_string(),
            LicenseDecision::Trial { remaining_days: 1 } => "Trial: 1 day remaining".to_string(),
            LicenseDecision::Trial { remaining_days } => {
                format!("Trial: {remaining_days} days remaining")
            }
            LicenseDecision::Expired => "Trial expired. Please purchase a license.".to_string(),
        }
    }

    pub fn gate(&self) -> Gate {
        Gate {
            allowed: self.allows_use(),
            message: self.summary(),
        }
    }
}

impl fmt::Display for LicenseDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Yes/no answer for callers that only need to know whether to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gate {
    pub allowed: bool,
    pub message: String,
}
