//! Re-renderable tray/window state.
//!
//! Presentation code rebuilds a [`UiState`] from the latest query results on
//! every refresh instead of flipping widgets one by one.

use papagaio_daemon::DaemonStatus;
use serde::Serialize;

use crate::error::ControlError;
use crate::surface::LicenseStatusView;

/// Icon colour family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Daemon running (green).
    Active,
    /// Daemon stopped (gray).
    Idle,
    /// Daemon usable only after the operator acts, e.g. buys a license (orange).
    Attention,
    /// Service manager unreachable (red).
    Error,
}

impl Tone {
    pub fn color(self) -> &'static str {
        match self {
            Tone::Active => "#4CAF50",
            Tone::Idle => "#808080",
            Tone::Attention => "#FF9800",
            Tone::Error => "#F44336",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiState {
    pub tone: Tone,
    /// Tray tooltip, e.g. `Papagaio - Running`.
    pub title: String,
    /// Disabled first menu line, e.g. `Status: Running`.
    pub status_label: String,
    pub can_start: bool,
    pub can_stop: bool,
    pub can_restart: bool,
    pub license_banner: String,
    pub license_ok: bool,
}

impl UiState {
    pub fn build(status: &DaemonStatus, license: &LicenseStatusView) -> Self {
        Self::compose(status, license.allows_use(), license.message.clone())
    }

    /// State shown when the license records could not be read. Use is
    /// gated as for an expired license and the banner carries the error.
    pub fn license_unreadable(status: &DaemonStatus, err: &ControlError) -> Self {
        Self::compose(status, false, format!("License check failed: {err}"))
    }

    fn compose(status: &DaemonStatus, license_ok: bool, license_banner: String) -> Self {
        let word = match status {
            DaemonStatus::Running => "Running",
            DaemonStatus::Stopped => "Stopped",
            DaemonStatus::Unknown => "Unknown",
        };

        let (mut can_start, can_stop, mut can_restart) = match status {
            DaemonStatus::Running => (false, true, true),
            DaemonStatus::Stopped => (true, false, false),
            DaemonStatus::Unknown => (true, true, true),
        };
        if !license_ok {
            can_start = false;
            can_restart = false;
        }

        let tone = match (status, license_ok) {
            (DaemonStatus::Unknown, _) => Tone::Error,
            (_, false) => Tone::Attention,
            (DaemonStatus::Running, true) => Tone::Active,
            (DaemonStatus::Stopped, true) => Tone::Idle,
        };

        Self {
            tone,
            title: format!("Papagaio - {word}"),
            status_label: format!("Status: {word}"),
            can_start,
            can_stop,
            can_restart,
            license_banner,
            license_ok,
        }
    }
}
