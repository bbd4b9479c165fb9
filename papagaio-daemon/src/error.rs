use std::path::PathBuf;

use thiserror::Error;

use crate::systemd::DaemonAction;

/// Error surface for service manager invocations.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The manager binary could not be spawned.
    #[error("I/O error running {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manager ran and reported failure. `message` is its own diagnostic,
    /// unmodified.
    #[error("{action} failed: {message}")]
    Control {
        action: DaemonAction,
        message: String,
    },

    /// `journalctl` ran and reported failure.
    #[error("journal query failed: {0}")]
    Journal(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
