//! `papagaio license`: trial/license state.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;

use papagaio_license::LicenseDecision;

use crate::context::surface;

#[derive(Subcommand, Debug)]
pub enum LicenseCommand {
    /// Show the current decision (starts the trial on first use).
    Status {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
    /// Exit non-zero when use is not allowed.
    Check,
    /// Print the identifier recorded in new trial records.
    MachineId,
}

pub fn run(command: LicenseCommand) -> Result<()> {
    let surface = surface()?;

    match command {
        LicenseCommand::Status { json } => {
            let view = surface
                .license_status()
                .context("failed to determine license status")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&view)
                        .context("failed to render license status JSON")?
                );
                return Ok(());
            }
            let line = match &view.decision {
                LicenseDecision::Licensed { .. } => view.message.green(),
                LicenseDecision::Trial { .. } => view.message.yellow(),
                LicenseDecision::Expired => view.message.red(),
            };
            println!("{line}");
            if let LicenseDecision::Licensed { email: Some(email) } = &view.decision {
                println!("Registered to {email}");
            }
        }
        LicenseCommand::Check => {
            let gate = surface
                .license()
                .check()
                .context("failed to determine license status")?;
            if !gate.allowed {
                bail!("{}", gate.message);
            }
            println!("{}", gate.message);
        }
        LicenseCommand::MachineId => {
            println!("{}", surface.license().machine_id());
        }
    }

    Ok(())
}
