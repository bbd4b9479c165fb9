//! `papagaio serve`: JSON control requests over stdio.

use std::io;

use anyhow::{Context, Result};

use crate::context::surface;

pub fn run() -> Result<()> {
    let surface = surface()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    tracing::info!(home = %surface.context().home.display(), "serving control requests on stdio");
    papagaio_control::serve(&surface, stdin.lock(), stdout.lock())
        .context("control stream failed")
}
