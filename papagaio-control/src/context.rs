use std::path::PathBuf;

use papagaio_core::paths;
use papagaio_daemon::ServiceConfig;

use crate::error::ControlError;

/// Everything the surface needs to locate its state. Built once by the
/// caller and passed in; nothing is read from globals afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlContext {
    pub home: PathBuf,
    pub service: ServiceConfig,
}

impl ControlContext {
    pub fn new(home: impl Into<PathBuf>, service: ServiceConfig) -> Self {
        Self {
            home: home.into(),
            service,
        }
    }

    /// Current user's home with the stock `papagaio` unit.
    pub fn for_current_user() -> Result<Self, ControlError> {
        Ok(Self::new(paths::home()?, ServiceConfig::default()))
    }
}
