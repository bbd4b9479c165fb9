//! `papagaio watch`: follow daemon status changes.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use papagaio_control::{StatusPoller, UiState, DEFAULT_POLL_INTERVAL};

use crate::context::surface;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Seconds between status queries.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    pub interval: u64,
}

impl WatchArgs {
    pub fn run(self) -> Result<()> {
        let interval = Duration::from_secs(self.interval.max(1));
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        runtime.block_on(watch(interval))
    }
}

async fn watch(interval: Duration) -> Result<()> {
    let surface = surface()?;
    let poller = StatusPoller::spawn(surface.daemon().clone(), interval);
    let mut updates = poller.subscribe();

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("ctrl-c handler failed")?;
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(status) = *updates.borrow_and_update() else {
                    continue;
                };
                let ui = match surface.license_status() {
                    Ok(license) => UiState::build(&status, &license),
                    Err(err) => {
                        tracing::warn!(error = %err, "license check failed");
                        UiState::license_unreadable(&status, &err)
                    }
                };
                println!(
                    "{} {} | {}",
                    chrono::Local::now().format("%H:%M:%S").to_string().bright_black(),
                    ui.status_label,
                    ui.license_banner
                );
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}
