//! `papagaio daemon`: systemd user unit lifecycle.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;

use papagaio_daemon::{DaemonAction, DaemonStatus};

use crate::context::surface;

#[derive(Subcommand, Debug)]
pub enum DaemonCommand {
    /// Report whether the unit is running.
    Status {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
    /// Start the unit.
    Start,
    /// Stop the unit.
    Stop,
    /// Restart the unit.
    Restart,
    /// Print recent journal lines for the unit.
    Logs(DaemonLogsArgs),
}

#[derive(Args, Debug)]
pub struct DaemonLogsArgs {
    /// Number of trailing lines to show.
    #[arg(long, default_value_t = 100)]
    pub lines: u32,
}

#[derive(Serialize)]
struct DaemonStatusJson<'a> {
    unit: &'a str,
    status: DaemonStatus,
}

pub fn run(command: DaemonCommand) -> Result<()> {
    let surface = surface()?;

    match command {
        DaemonCommand::Status { json } => {
            let status = surface.daemon_status();
            if json {
                let payload = DaemonStatusJson {
                    unit: &surface.context().service.unit,
                    status,
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&payload)
                        .context("failed to render daemon status JSON")?
                );
            } else {
                println!("{}", paint(status));
            }
        }
        DaemonCommand::Start => control(&surface, DaemonAction::Start, "started")?,
        DaemonCommand::Stop => control(&surface, DaemonAction::Stop, "stopped")?,
        DaemonCommand::Restart => control(&surface, DaemonAction::Restart, "restarted")?,
        DaemonCommand::Logs(args) => {
            let text = surface
                .daemon_logs(args.lines)
                .context("failed to read daemon journal")?;
            print!("{text}");
        }
    }

    Ok(())
}

fn control(
    surface: &papagaio_control::ControlSurface,
    action: DaemonAction,
    done: &str,
) -> Result<()> {
    surface
        .daemon_control(action)
        .with_context(|| format!("failed to {action} {}", surface.context().service.unit))?;
    println!("{} {done}", surface.context().service.unit);
    Ok(())
}

fn paint(status: DaemonStatus) -> colored::ColoredString {
    match status {
        DaemonStatus::Running => status.as_str().green(),
        DaemonStatus::Stopped => status.as_str().bright_black(),
        DaemonStatus::Unknown => status.as_str().red(),
    }
}
