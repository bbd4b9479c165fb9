//! Error types for papagaio-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from config store operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure, with the path it happened on.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An entry the `key = value` format cannot represent. Raised before any
    /// bytes are written, so the persisted file is left as it was.
    #[error("cannot store [{section}] {key}: {reason}")]
    InvalidEntry {
        section: String,
        key: String,
        reason: &'static str,
    },

    /// `dirs::home_dir()` returned `None`, so we cannot locate `~/.config/papagaio/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}

/// A value that does not parse as the type its key expects.
///
/// Only produced by the opt-in [`crate::settings`] layer; the store itself
/// accepts any string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    pub section: String,
    pub key: String,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value '{}' for {}.{}: {}",
            self.value, self.section, self.key, self.reason
        )
    }
}
