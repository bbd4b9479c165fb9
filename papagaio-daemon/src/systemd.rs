//! `systemctl --user` front-end for the papagaio unit.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, DaemonError};
use crate::runner::{CommandRunner, RunOutput, SystemRunner};

pub const SERVICE_NAME: &str = "papagaio";
pub const SYSTEMCTL: &str = "systemctl";
pub const JOURNALCTL: &str = "journalctl";

/// Which unit to manage and which manager binaries to call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub unit: String,
    pub systemctl: String,
    pub journalctl: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            unit: SERVICE_NAME.to_string(),
            systemctl: SYSTEMCTL.to_string(),
            journalctl: JOURNALCTL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaemonStatus {
    Running,
    Stopped,
    /// The service manager itself could not be reached.
    Unknown,
}

impl DaemonStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DaemonStatus::Running => "running",
            DaemonStatus::Stopped => "stopped",
            DaemonStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DaemonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaemonAction {
    Start,
    Stop,
    Restart,
}

impl DaemonAction {
    pub fn as_str(self) -> &'static str {
        match self {
            DaemonAction::Start => "start",
            DaemonAction::Stop => "stop",
            DaemonAction::Restart => "restart",
        }
    }
}

impl fmt::Display for DaemonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DaemonAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(DaemonAction::Start),
            "stop" => Ok(DaemonAction::Stop),
            "restart" => Ok(DaemonAction::Restart),
            other => Err(format!(
                "unknown action '{other}' (expected start, stop or restart)"
            )),
        }
    }
}

/// Stateless controller: every call asks the service manager afresh.
#[derive(Clone)]
pub struct DaemonController {
    service: ServiceConfig,
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for DaemonController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DaemonController")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl DaemonController {
    pub fn new(service: ServiceConfig) -> Self {
        Self::with_runner(service, Arc::new(SystemRunner))
    }

    pub fn with_runner(service: ServiceConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { service, runner }
    }

    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }

    /// `is-active` printing `active` means running. Every other answer,
    /// including a unit systemd has never heard of, is a normal stopped
    /// reading. Only a manager that cannot be spawned gives `Unknown`.
    pub fn status(&self) -> DaemonStatus {
        let unit = self.service.unit.as_str();
        match self
            .runner
            .run(&self.service.systemctl, &["--user", "is-active", unit])
        {
            Ok(out) => {
                let state = out.stdout.trim();
                tracing::debug!(unit, state, code = ?out.code, "queried unit");
                if state == "active" {
                    DaemonStatus::Running
                } else {
                    DaemonStatus::Stopped
                }
            }
            Err(e) => {
                tracing::warn!(systemctl = %self.service.systemctl, error = %e, "service manager unavailable");
                DaemonStatus::Unknown
            }
        }
    }

    /// Run `systemctl --user <action> <unit>`. A non-zero exit carries the
    /// manager's own diagnostic unmodified.
    pub fn control(&self, action: DaemonAction) -> Result<(), DaemonError> {
        let unit = self.service.unit.as_str();
        let out = self
            .runner
            .run(&self.service.systemctl, &["--user", action.as_str(), unit])
            .map_err(|e| io_err(&self.service.systemctl, e))?;

        if out.success() {
            tracing::info!(unit, %action, "service action succeeded");
            return Ok(());
        }

        let message = failure_message(&out);
        tracing::warn!(unit, %action, %message, "service action failed");
        Err(DaemonError::Control { action, message })
    }

    /// Last `lines` entries of the unit's user journal.
    pub fn logs(&self, lines: u32) -> Result<String, DaemonError> {
        let unit = self.service.unit.as_str();
        let count = lines.to_string();
        let out = self
            .runner
            .run(
                &self.service.journalctl,
                &["--user", "-u", unit, "-n", &count, "--no-pager"],
            )
            .map_err(|e| io_err(&self.service.journalctl, e))?;

        if out.success() {
            return Ok(out.stdout);
        }
        Err(DaemonError::Journal(failure_message(&out)))
    }
}

/// stderr, else stdout, else the exit status.
fn failure_message(out: &RunOutput) -> String {
    let stderr = out.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = out.stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }
    match out.code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    /// Replays one canned result and records the command lines it saw.
    struct FakeRunner {
        reply: Box<dyn Fn() -> io::Result<RunOutput> + Send + Sync>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeRunner {
        fn replying(code: i32, stdout: &str, stderr: &str) -> Arc<Self> {
            let out = RunOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            };
            Arc::new(Self {
                reply: Box::new(move || Ok(out.clone())),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn unspawnable() -> Arc<Self> {
            Arc::new(Self {
                reply: Box::new(|| Err(io::Error::new(io::ErrorKind::NotFound, "no systemctl"))),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, program: &str, args: &[&str]) -> io::Result<RunOutput> {
            let mut line = vec![program.to_string()];
            line.extend(args.iter().map(|a| a.to_string()));
            self.calls.lock().unwrap().push(line);
            (self.reply)()
        }
    }

    fn controller(runner: Arc<FakeRunner>) -> DaemonController {
        DaemonController::with_runner(ServiceConfig::default(), runner)
    }

    #[test]
    fn active_maps_to_running() {
        let runner = FakeRunner::replying(0, "active\n", "");
        assert_eq!(controller(runner.clone()).status(), DaemonStatus::Running);
        assert_eq!(
            runner.calls(),
            vec![vec!["systemctl", "--user", "is-active", "papagaio"]]
        );
    }

    #[test]
    fn non_active_states_map_to_stopped() {
        for (code, stdout) in [(3, "inactive\n"), (3, "failed\n"), (3, "activating\n"), (4, "")] {
            let runner = FakeRunner::replying(code, stdout, "");
            assert_eq!(
                controller(runner).status(),
                DaemonStatus::Stopped,
                "stdout {stdout:?}"
            );
        }
    }

    #[test]
    fn unit_not_found_is_stopped_not_error() {
        let runner = FakeRunner::replying(4, "inactive\n", "Unit papagaio.service could not be found.");
        assert_eq!(controller(runner).status(), DaemonStatus::Stopped);
    }

    #[test]
    fn spawn_failure_is_unknown() {
        assert_eq!(
            controller(FakeRunner::unspawnable()).status(),
            DaemonStatus::Unknown
        );
    }

    #[test]
    fn control_runs_verb_against_unit() {
        let runner = FakeRunner::replying(0, "", "");
        controller(runner.clone())
            .control(DaemonAction::Restart)
            .unwrap();
        assert_eq!(
            runner.calls(),
            vec![vec!["systemctl", "--user", "restart", "papagaio"]]
        );
    }

    #[test]
    fn control_failure_carries_stderr_verbatim() {
        let diag = "Failed to start papagaio.service: Unit papagaio.service not found.";
        let runner = FakeRunner::replying(5, "", &format!("{diag}\n"));
        let err = controller(runner).control(DaemonAction::Start).unwrap_err();
        match err {
            DaemonError::Control { action, message } => {
                assert_eq!(action, DaemonAction::Start);
                assert_eq!(message, diag);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn control_failure_falls_back_to_stdout_then_code() {
        let runner = FakeRunner::replying(1, "something on stdout\n", "  \n");
        let err = controller(runner).control(DaemonAction::Stop).unwrap_err();
        assert_eq!(err.to_string(), "stop failed: something on stdout");

        let runner = FakeRunner::replying(7, "", "");
        let err = controller(runner).control(DaemonAction::Stop).unwrap_err();
        assert_eq!(err.to_string(), "stop failed: exit status 7");
    }

    #[test]
    fn control_spawn_failure_is_io() {
        let err = controller(FakeRunner::unspawnable())
            .control(DaemonAction::Start)
            .unwrap_err();
        assert!(matches!(err, DaemonError::Io { .. }));
    }

    #[test]
    fn logs_tail_the_user_journal() {
        let runner = FakeRunner::replying(0, "line one\nline two\n", "");
        let text = controller(runner.clone()).logs(25).unwrap();
        assert_eq!(text, "line one\nline two\n");
        assert_eq!(
            runner.calls(),
            vec![vec!["journalctl", "--user", "-u", "papagaio", "-n", "25", "--no-pager"]]
        );
    }

    #[test]
    fn custom_unit_and_binaries_are_used() {
        let runner = FakeRunner::replying(0, "active", "");
        let service = ServiceConfig {
            unit: "papagaio-dev".to_string(),
            systemctl: "/opt/bin/systemctl".to_string(),
            journalctl: "/opt/bin/journalctl".to_string(),
        };
        DaemonController::with_runner(service, runner.clone()).status();
        assert_eq!(
            runner.calls(),
            vec![vec!["/opt/bin/systemctl", "--user", "is-active", "papagaio-dev"]]
        );
    }

    #[test]
    fn action_parsing_and_wire_names() {
        assert_eq!("restart".parse::<DaemonAction>(), Ok(DaemonAction::Restart));
        assert!("reload".parse::<DaemonAction>().is_err());
        assert_eq!(
            serde_json::to_string(&DaemonStatus::Running).unwrap(),
            "\"running\""
        );
        assert_eq!(
            serde_json::from_str::<DaemonAction>("\"stop\"").unwrap(),
            DaemonAction::Stop
        );
    }
}
