//! On-disk trial and license records.
//!
//! Both live next to `config.ini` as small JSON objects:
//!
//! ```text
//! ~/.config/papagaio/.trial    {"start_date": "...", "machine_id": "..."}
//! ~/.config/papagaio/.license  {"key": "...", "email": "...", ...}
//! ```
//!
//! `.license` is written by the activation tool; this crate only reads it.

use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, LicenseError};

/// Trial start, written once on the first ever evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    pub start_date: DateTime<Utc>,
    pub machine_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TrialRecordFile {
    start_date: String,
    #[serde(default)]
    machine_id: String,
}

impl TrialRecord {
    pub fn to_json(&self) -> Result<String, LicenseError> {
        let file = TrialRecordFile {
            start_date: self.start_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            machine_id: self.machine_id.clone(),
        };
        Ok(serde_json::to_string(&file)?)
    }

    fn from_json(path: &Path, contents: &str) -> Result<Self, LicenseError> {
        let file: TrialRecordFile =
            serde_json::from_str(contents).map_err(|e| corrupt(path, e.to_string()))?;
        let start_date = parse_timestamp(&file.start_date).ok_or_else(|| {
            corrupt(path, format!("unrecognized start_date '{}'", file.start_date))
        })?;
        Ok(Self {
            start_date,
            machine_id: file.machine_id,
        })
    }
}

/// License written by the activation flow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LicenseRecord {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<String>,
}

impl LicenseRecord {
    /// A record only counts once it carries a non-empty key.
    pub fn is_active(&self) -> bool {
        self.key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Read the trial record. `Ok(None)` when the file does not exist.
pub fn read_trial(path: &Path) -> Result<Option<TrialRecord>, LicenseError> {
    let Some(contents) = read_optional(path)? else {
        return Ok(None);
    };
    TrialRecord::from_json(path, &contents).map(Some)
}

/// Read the license record. `Ok(None)` when the file does not exist.
pub fn read_license(path: &Path) -> Result<Option<LicenseRecord>, LicenseError> {
    let Some(contents) = read_optional(path)? else {
        return Ok(None);
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| corrupt(path, e.to_string()))
}

/// RFC 3339, or the naive `YYYY-MM-DDTHH:MM:SS[.f]` form older tooling wrote
/// in local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn read_optional(path: &Path) -> Result<Option<String>, LicenseError> {
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| corrupt(path, "not valid UTF-8".to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_err(path, e)),
    }
}

fn corrupt(path: &Path, reason: String) -> LicenseError {
    LicenseError::Corrupt {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    #[test]
    fn missing_files_read_as_none() {
        let tmp = TempDir::new().unwrap();
        assert!(read_trial(&tmp.path().join(".trial")).unwrap().is_none());
        assert!(read_license(&tmp.path().join(".license")).unwrap().is_none());
    }

    #[test]
    fn trial_json_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".trial");
        let record = TrialRecord {
            start_date: Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap(),
            machine_id: "abc".to_string(),
        };
        std::fs::write(&path, record.to_json().unwrap()).unwrap();
        assert_eq!(read_trial(&path).unwrap(), Some(record));
    }

    #[test]
    fn trial_accepts_browser_iso_string() {
        let parsed = parse_timestamp("2025-03-01T12:30:00.000Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn trial_accepts_legacy_naive_timestamp() {
        let parsed = parse_timestamp("2025-03-01T12:30:00.123456").expect("naive parses");
        let expected = Local
            .with_ymd_and_hms(2025, 3, 1, 12, 30, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
            + Duration::microseconds(123_456);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn trial_without_machine_id_still_reads() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".trial");
        std::fs::write(&path, r#"{"start_date":"2025-03-01T00:00:00Z"}"#).unwrap();
        let record = read_trial(&path).unwrap().unwrap();
        assert!(record.machine_id.is_empty());
    }

    #[test]
    fn garbage_trial_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".trial");
        for body in ["", "{", "[]", r#"{"start_date": 5}"#, r#"{"start_date":"yesterday"}"#] {
            std::fs::write(&path, body).unwrap();
            let err = read_trial(&path).unwrap_err();
            assert!(matches!(err, LicenseError::Corrupt { .. }), "{body:?} gave {err}");
        }
    }

    #[test]
    fn license_activity_needs_non_empty_key() {
        let mut record = LicenseRecord::default();
        assert!(!record.is_active());
        record.key = Some("   ".to_string());
        assert!(!record.is_active());
        record.key = Some("ABCD-1234".to_string());
        assert!(record.is_active());
    }

    #[test]
    fn license_with_non_string_key_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".license");
        std::fs::write(&path, r#"{"key": 42}"#).unwrap();
        assert!(matches!(
            read_license(&path).unwrap_err(),
            LicenseError::Corrupt { .. }
        ));
    }
}
