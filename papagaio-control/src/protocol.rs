use papagaio_core::ConfigDocument;
use papagaio_daemon::DaemonAction;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_LOG_LINES: u32 = 100;

/// JSON newline-delimited request, discriminated by `cmd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ControlRequest {
    LoadConfig,
    SaveConfig {
        config: ConfigDocument,
    },
    DaemonStatus,
    DaemonControl {
        action: DaemonAction,
    },
    LicenseStatus,
    SaveAndRestart {
        config: ConfigDocument,
    },
    DaemonLogs {
        #[serde(default = "default_log_lines")]
        lines: u32,
    },
}

fn default_log_lines() -> u32 {
    DEFAULT_LOG_LINES
}

/// JSON newline-delimited response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ControlResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Success with nothing to report.
    pub fn done() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
