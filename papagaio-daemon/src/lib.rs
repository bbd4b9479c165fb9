//! Daemon lifecycle control through the systemd user manager.
//!
//! The daemon is an externally supervised unit; this crate only asks
//! `systemctl` about it and tells `systemctl` what to do. No state is kept
//! between calls.

mod error;
pub mod runner;
pub mod systemd;

pub use error::DaemonError;
pub use runner::{CommandRunner, RunOutput, SystemRunner};
pub use systemd::{DaemonAction, DaemonController, DaemonStatus, ServiceConfig, SERVICE_NAME};
