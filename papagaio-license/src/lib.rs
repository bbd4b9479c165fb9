//! # papagaio-license
//!
//! Trial and license gating.
//!
//! Call [`LicenseManager::decide`] to turn the persisted records into a
//! [`LicenseDecision`]. The first call on a fresh machine starts the trial;
//! every later call only reads.

pub mod decision;
pub mod error;
pub mod machine;
pub mod manager;
pub mod records;

pub use decision::{Gate, LicenseDecision, TRIAL_LENGTH_DAYS};
pub use error::LicenseError;
pub use manager::LicenseManager;
pub use records::{LicenseRecord, TrialRecord};
