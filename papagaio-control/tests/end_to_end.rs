//! Fresh environment through the control surface and its JSON framing.

use std::io;
use std::sync::{Arc, Mutex};

use assert_fs::prelude::*;
use papagaio_control::{
    serve, ControlContext, ControlRequest, ControlSurface, LicenseStatusView, UiState,
};
use papagaio_core::defaults::defaults_at;
use papagaio_daemon::{
    CommandRunner, DaemonAction, DaemonController, DaemonStatus, RunOutput, ServiceConfig,
};
use papagaio_license::{LicenseDecision, LicenseManager};
use predicates::prelude::predicate;
use serde_json::{json, Value};

/// In-memory stand-in for `systemctl --user` that tracks one unit's state.
#[derive(Default)]
struct FakeSystemd {
    active: Mutex<bool>,
    log: Mutex<Vec<String>>,
}

impl CommandRunner for FakeSystemd {
    fn run(&self, _program: &str, args: &[&str]) -> io::Result<RunOutput> {
        self.log.lock().unwrap().push(args.join(" "));
        let mut active = self.active.lock().unwrap();
        let verb = args.get(1).copied().unwrap_or_default();
        let stdout = match verb {
            "is-active" => {
                let state = if *active { "active" } else { "inactive" };
                return Ok(RunOutput {
                    code: Some(if *active { 0 } else { 3 }),
                    stdout: format!("{state}\n"),
                    stderr: String::new(),
                });
            }
            "start" | "restart" => {
                *active = true;
                String::new()
            }
            "stop" => {
                *active = false;
                String::new()
            }
            _ => "journal line\n".to_string(),
        };
        Ok(RunOutput {
            code: Some(0),
            stdout,
            stderr: String::new(),
        })
    }
}

fn surface(home: &assert_fs::TempDir, systemd: Arc<FakeSystemd>) -> ControlSurface {
    let context = ControlContext::new(home.path(), ServiceConfig::default());
    let daemon = DaemonController::with_runner(context.service.clone(), systemd);
    ControlSurface::with_daemon(context, daemon)
        .with_license(LicenseManager::at(home.path()).with_machine_id("e2e"))
}

#[test]
fn fresh_environment_scenario() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let s = surface(&home, Arc::new(FakeSystemd::default()));

    // Defaults without touching disk.
    let loaded = s.load_config().expect("load");
    assert_eq!(loaded, defaults_at(home.path()));
    home.child(".config/papagaio/config.ini")
        .assert(predicate::path::missing());

    // First license query starts the trial.
    let license = s.license_status().expect("license");
    assert_eq!(
        license,
        LicenseStatusView::from(LicenseDecision::Trial { remaining_days: 7 })
    );
    home.child(".config/papagaio/.trial")
        .assert(predicate::path::exists());

    // Partial save; everything else still defaulted on reload.
    let mut partial = papagaio_core::ConfigDocument::new();
    partial.set("General", "model", "base");
    s.save_config(&partial).expect("save");

    let reloaded = s.load_config().expect("reload");
    let mut expected = defaults_at(home.path());
    expected.set("General", "model", "base");
    for (section, key, value) in expected.entries() {
        assert_eq!(reloaded.get(section, key), Some(value), "{section}.{key}");
    }
}

#[test]
fn daemon_lifecycle_through_surface() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let systemd = Arc::new(FakeSystemd::default());
    let s = surface(&home, systemd.clone());

    assert_eq!(s.daemon_status(), DaemonStatus::Stopped);
    s.daemon_control(DaemonAction::Start).expect("start");
    assert_eq!(s.daemon_status(), DaemonStatus::Running);

    let ui = UiState::build(&s.daemon_status(), &s.license_status().expect("license"));
    assert!(ui.can_stop && !ui.can_start);

    s.daemon_control(DaemonAction::Stop).expect("stop");
    assert_eq!(s.daemon_status(), DaemonStatus::Stopped);
    assert_eq!(
        systemd.log.lock().unwrap().as_slice(),
        [
            "--user is-active papagaio",
            "--user start papagaio",
            "--user is-active papagaio",
            "--user is-active papagaio",
            "--user stop papagaio",
            "--user is-active papagaio",
        ]
    );
}

#[test]
fn wire_session() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let s = surface(&home, Arc::new(FakeSystemd::default()));

    let requests = [
        json!({"cmd": "license_status"}),
        json!({"cmd": "save_and_restart", "config": {"General": {"model": "medium"}}}),
        json!({"cmd": "daemon_status"}),
        json!({"cmd": "load_config"}),
        json!({"cmd": "daemon_logs", "lines": 5}),
    ];
    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();

    let mut output = Vec::new();
    serve(&s, input.as_bytes(), &mut output).expect("serve");
    let responses: Vec<Value> = String::from_utf8(output)
        .expect("utf8")
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();

    assert_eq!(responses.len(), requests.len());
    assert_eq!(
        responses[0],
        json!({"ok": true, "data": {"status": "trial", "remaining_days": 7, "message": "Trial: 7 days remaining"}})
    );
    assert_eq!(responses[1], json!({"ok": true, "data": {"restarted": true}}));
    assert_eq!(responses[2], json!({"ok": true, "data": {"status": "running"}}));
    assert_eq!(responses[3]["data"]["General"]["model"], "medium");
    assert_eq!(responses[3]["data"]["Audio"]["silence_threshold"], "400");
    assert_eq!(responses[4], json!({"ok": true, "data": "journal line\n"}));
}

#[test]
fn corrupt_trial_surfaces_as_error_response() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".config/papagaio/.trial")
        .write_str("{oops")
        .expect("write");
    let s = surface(&home, Arc::new(FakeSystemd::default()));

    let response = s.handle(ControlRequest::LicenseStatus);
    assert!(!response.ok);
    assert!(response.error.expect("message").contains(".trial"));
    home.child(".config/papagaio/.trial").assert("{oops");
}
