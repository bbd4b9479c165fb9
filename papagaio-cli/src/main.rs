//! Papagaio control panel CLI.
//!
//! # Usage
//!
//! ```text
//! papagaio config show [--json] | get <section.key> | set <section.key> <value> [--strict] | validate | path
//! papagaio daemon status [--json] | start | stop | restart | logs [--lines N]
//! papagaio license status [--json] | check | machine-id
//! papagaio save-restart
//! papagaio serve
//! papagaio watch [--interval SECS]
//! ```

mod commands;
mod context;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    config::ConfigCommand, daemon::DaemonCommand, license::LicenseCommand, watch::WatchArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "papagaio",
    version,
    about = "Configure, supervise and license the Papagaio voice-typing daemon",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read and edit ~/.config/papagaio/config.ini.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Query and control the papagaio systemd user unit.
    Daemon {
        #[command(subcommand)]
        command: DaemonCommand,
    },

    /// Show trial/license state.
    License {
        #[command(subcommand)]
        command: LicenseCommand,
    },

    /// Re-save the current configuration and restart the daemon.
    SaveRestart,

    /// Answer JSON control requests on stdin, one per line.
    Serve,

    /// Print daemon status changes until interrupted.
    Watch(WatchArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Config { command } => commands::config::run(command),
        Commands::Daemon { command } => commands::daemon::run(command),
        Commands::License { command } => commands::license::run(command),
        Commands::SaveRestart => commands::save_restart::run(),
        Commands::Serve => commands::serve::run(),
        Commands::Watch(args) => args.run(),
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
