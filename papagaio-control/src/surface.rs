//! Operations offered to the presentation layer.
//!
//! Each call re-reads its source of truth (config file, service manager,
//! license records); the surface itself holds no state beyond where to look.

use papagaio_core::{store, ConfigDocument};
use papagaio_daemon::{DaemonAction, DaemonController, DaemonError, DaemonStatus};
use papagaio_license::{LicenseDecision, LicenseManager};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::context::ControlContext;
use crate::error::ControlError;
use crate::protocol::{ControlRequest, ControlResponse};

/// License state as shown to the operator:
/// `{"status": "trial", "remaining_days": 3, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseStatusView {
    #[serde(flatten)]
    pub decision: LicenseDecision,
    pub message: String,
}

impl LicenseStatusView {
    pub fn status(&self) -> &'static str {
        self.decision.key()
    }

    pub fn allows_use(&self) -> bool {
        self.decision.allows_use()
    }
}

impl From<LicenseDecision> for LicenseStatusView {
    fn from(decision: LicenseDecision) -> Self {
        let message = decision.summary();
        Self { decision, message }
    }
}

/// Result of a save followed by a restart. The save itself succeeded
/// whenever this value exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRestartOutcome {
    pub restarted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ControlSurface {
    context: ControlContext,
    daemon: DaemonController,
    license: LicenseManager,
}

impl ControlSurface {
    pub fn new(context: ControlContext) -> Self {
        let daemon = DaemonController::new(context.service.clone());
        Self::with_daemon(context, daemon)
    }

    /// Use a preconfigured controller, e.g. one with a substitute runner.
    pub fn with_daemon(context: ControlContext, daemon: DaemonController) -> Self {
        let license = LicenseManager::at(&context.home);
        Self {
            context,
            daemon,
            license,
        }
    }

    pub fn with_license(mut self, license: LicenseManager) -> Self {
        self.license = license;
        self
    }

    pub fn context(&self) -> &ControlContext {
        &self.context
    }

    pub fn daemon(&self) -> &DaemonController {
        &self.daemon
    }

    pub fn license(&self) -> &LicenseManager {
        &self.license
    }

    pub fn load_config(&self) -> Result<ConfigDocument, ControlError> {
        Ok(store::load_at(&self.context.home)?)
    }

    pub fn save_config(&self, doc: &ConfigDocument) -> Result<(), ControlError> {
        store::save_at(&self.context.home, doc)?;
        Ok(())
    }

    pub fn daemon_status(&self) -> DaemonStatus {
        self.daemon.status()
    }

    pub fn daemon_control(&self, action: DaemonAction) -> Result<(), ControlError> {
        self.daemon.control(action)?;
        Ok(())
    }

    pub fn daemon_logs(&self, lines: u32) -> Result<String, ControlError> {
        Ok(self.daemon.logs(lines)?)
    }

    pub fn license_status(&self) -> Result<LicenseStatusView, ControlError> {
        Ok(self.license.decide()?.into())
    }

    /// Save, then restart the daemon so it picks up the new settings.
    ///
    /// A failed save is an error and nothing is restarted. A failed restart
    /// after a good save is reported as a warning in the outcome.
    pub fn save_and_restart(&self, doc: &ConfigDocument) -> Result<SaveRestartOutcome, ControlError> {
        self.save_config(doc)?;
        match self.daemon.control(DaemonAction::Restart) {
            Ok(()) => Ok(SaveRestartOutcome {
                restarted: true,
                warning: None,
            }),
            Err(err) => {
                tracing::warn!(error = %err, "settings saved but restart failed");
                Ok(SaveRestartOutcome {
                    restarted: false,
                    warning: Some(format!("settings saved, but the daemon was not restarted: {err}")),
                })
            }
        }
    }

    /// Dispatch one wire request. Never fails; errors become `ok: false`.
    pub fn handle(&self, request: ControlRequest) -> ControlResponse {
        tracing::debug!(?request, "handling control request");
        match request {
            ControlRequest::LoadConfig => respond(self.load_config()),
            ControlRequest::SaveConfig { config } => match self.save_config(&config) {
                Ok(()) => ControlResponse::done(),
                Err(err) => ControlResponse::error(err.to_string()),
            },
            ControlRequest::DaemonStatus => {
                ControlResponse::ok(json!({ "status": self.daemon_status() }))
            }
            ControlRequest::DaemonControl { action } => match self.daemon_control(action) {
                Ok(()) => ControlResponse::done(),
                Err(err) => ControlResponse::error(wire_message(err)),
            },
            ControlRequest::LicenseStatus => respond(self.license_status()),
            ControlRequest::SaveAndRestart { config } => respond(self.save_and_restart(&config)),
            ControlRequest::DaemonLogs { lines } => respond(self.daemon_logs(lines)),
        }
    }
}

/// The service manager's own diagnostic goes out verbatim; other errors use
/// their display form.
fn wire_message(err: ControlError) -> String {
    match err {
        ControlError::Daemon(DaemonError::Control { message, .. }) => message,
        other => other.to_string(),
    }
}

fn respond<T: Serialize>(result: Result<T, ControlError>) -> ControlResponse {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(data) => ControlResponse::ok(data),
            Err(err) => ControlResponse::error(format!("failed to encode response: {err}")),
        },
        Err(err) => ControlResponse::error(wire_message(err)),
    }
}
