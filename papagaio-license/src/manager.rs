//! License/trial state machine.
//!
//! ```text
//! .license with key ──────────────────────────────► licensed
//! .trial present ───── elapsed < 7 days ──────────► trial(remaining)
//!                 └─── elapsed ≥ 7 days ──────────► expired
//! neither ─── create .trial (create-if-absent) ───► trial(7)
//! ```
//!
//! The only write is the one-time `.trial` creation. A corrupt record fails
//! the decision instead of being replaced, so deleting or mangling data never
//! yields a fresh trial by accident of this code.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use papagaio_core::paths::{ensure_config_dir, home, license_path, trial_path};

use crate::decision::{Gate, LicenseDecision};
use crate::error::{io_err, LicenseError};
use crate::machine;
use crate::records::{self, TrialRecord};

#[derive(Debug, Clone)]
pub struct LicenseManager {
    home: PathBuf,
    machine_id: Option<String>,
}

impl LicenseManager {
    /// Manager rooted at `home` (records under `<home>/.config/papagaio`).
    pub fn at(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            machine_id: None,
        }
    }

    /// Manager for the current user's home directory.
    pub fn for_current_user() -> Result<Self, LicenseError> {
        Ok(Self::at(home()?))
    }

    /// Use a fixed machine identifier instead of probing the host.
    pub fn with_machine_id(mut self, id: impl Into<String>) -> Self {
        self.machine_id = Some(id.into());
        self
    }

    pub fn trial_path(&self) -> PathBuf {
        trial_path(&self.home)
    }

    pub fn license_path(&self) -> PathBuf {
        license_path(&self.home)
    }

    pub fn machine_id(&self) -> String {
        self.machine_id.clone().unwrap_or_else(machine::machine_id)
    }

    pub fn decide(&self) -> Result<LicenseDecision, LicenseError> {
        self.decide_at(Utc::now())
    }

    /// Decide as of `now`.
    pub fn decide_at(&self, now: DateTime<Utc>) -> Result<LicenseDecision, LicenseError> {
        if let Some(license) = records::read_license(&self.license_path())? {
            if license.is_active() {
                tracing::debug!("license record active");
                return Ok(LicenseDecision::Licensed {
                    email: license.email,
                });
            }
        }

        let trial = self.trial_path();
        if let Some(record) = records::read_trial(&trial)? {
            return Ok(LicenseDecision::from_trial_start(record.start_date, now));
        }

        let record = TrialRecord {
            start_date: now,
            machine_id: self.machine_id(),
        };
        if create_if_absent(&self.home, &trial, &record.to_json()?)? {
            tracing::info!(path = %trial.display(), "started trial");
            return Ok(LicenseDecision::from_trial_start(record.start_date, now));
        }

        // Lost a creation race: the winner's record is authoritative.
        let winner = records::read_trial(&trial)?.ok_or_else(|| LicenseError::Corrupt {
            path: trial.clone(),
            reason: "trial record vanished right after creation".to_string(),
        })?;
        Ok(LicenseDecision::from_trial_start(winner.start_date, now))
    }

    /// `decide` reduced to allowed / not allowed plus a message.
    pub fn check(&self) -> Result<Gate, LicenseError> {
        Ok(self.decide()?.gate())
    }
}

/// Publish `contents` at `path` only if nothing is there yet.
///
/// The content is fully written to a temp file first and then linked into
/// place without clobbering, so readers never see a half-written record.
/// Returns `false` when another writer got there first.
fn create_if_absent(home: &Path, path: &Path, contents: &str) -> Result<bool, LicenseError> {
    let dir = ensure_config_dir(home)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".trial.")
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(|e| io_err(&dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| io_err(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| io_err(tmp.path(), e))?;

    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(io_err(path, e.error)),
    }
}
