//! Error types for papagaio-license.

use std::path::PathBuf;

use thiserror::Error;

use papagaio_core::ConfigError;

/// All errors that can arise while deciding the license state.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// A record file could not be read or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record exists but is not well-formed. The file is left untouched and
    /// no new trial is granted.
    #[error("corrupt license data at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Home or config directory could not be resolved or created.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON serialization error (write path).
    #[error("record JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`LicenseError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LicenseError {
    LicenseError::Io {
        path: path.into(),
        source,
    }
}
