//! Boundary between the Papagaio core and a presentation process (tray,
//! settings window, CLI).
//!
//! - [`surface`]: request/response operations over config, daemon and license
//! - [`protocol`] / [`server`]: newline-delimited JSON framing of those operations
//! - [`poller`]: periodic daemon status feed
//! - [`view`]: renderable UI state rebuilt from query results

mod context;
mod error;
pub mod poller;
pub mod protocol;
pub mod server;
pub mod surface;
pub mod view;

pub use context::ControlContext;
pub use error::ControlError;
pub use poller::{StatusPoller, DEFAULT_POLL_INTERVAL};
pub use protocol::{ControlRequest, ControlResponse};
pub use server::serve;
pub use surface::{ControlSurface, LicenseStatusView, SaveRestartOutcome};
pub use view::{Tone, UiState};
