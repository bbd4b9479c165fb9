//! Process environment → [`ControlContext`].

use anyhow::{Context, Result};

use papagaio_control::{ControlContext, ControlSurface};

pub const ENV_SERVICE: &str = "PAPAGAIO_SERVICE";
pub const ENV_SYSTEMCTL: &str = "PAPAGAIO_SYSTEMCTL";
pub const ENV_JOURNALCTL: &str = "PAPAGAIO_JOURNALCTL";

/// Home directory from `$HOME`, unit and manager binaries from the
/// `PAPAGAIO_*` overrides. Read once per invocation.
pub fn context() -> Result<ControlContext> {
    let mut ctx =
        ControlContext::for_current_user().context("could not determine home directory")?;
    if let Some(unit) = env_override(ENV_SERVICE) {
        ctx.service.unit = unit;
    }
    if let Some(systemctl) = env_override(ENV_SYSTEMCTL) {
        ctx.service.systemctl = systemctl;
    }
    if let Some(journalctl) = env_override(ENV_JOURNALCTL) {
        ctx.service.journalctl = journalctl;
    }
    Ok(ctx)
}

pub fn surface() -> Result<ControlSurface> {
    Ok(ControlSurface::new(context()?))
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
