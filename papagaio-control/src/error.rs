use papagaio_core::ConfigError;
use papagaio_daemon::DaemonError;
use papagaio_license::LicenseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    License(#[from] LicenseError),

    #[error(transparent)]
    Daemon(#[from] DaemonError),
}
