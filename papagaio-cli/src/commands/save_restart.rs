//! `papagaio save-restart`: persist the effective config and bounce the daemon.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::context::surface;

pub fn run() -> Result<()> {
    let surface = surface()?;
    let doc = surface
        .load_config()
        .context("failed to load configuration")?;
    let outcome = surface
        .save_and_restart(&doc)
        .context("failed to save configuration")?;

    println!("settings saved");
    match outcome.warning {
        Some(warning) => eprintln!("{} {warning}", "warning:".yellow().bold()),
        None => println!("{} restarted", surface.context().service.unit),
    }
    Ok(())
}
