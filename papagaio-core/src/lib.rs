//! Papagaio core library: configuration document, INI codec, defaults,
//! durable store and typed settings.
//!
//! Public API surface:
//! - [`document`]: [`ConfigDocument`]
//! - [`ini`]: tolerant parser and serializer
//! - [`defaults`]: the defaults table merged into every load
//! - [`store`]: load / save against `~/.config/papagaio/config.ini`
//! - [`settings`]: typed, parse-on-read view over a document
//! - [`paths`]: per-user file locations shared with the license records

pub mod defaults;
pub mod document;
pub mod error;
pub mod ini;
pub mod paths;
pub mod settings;
pub mod store;

pub use document::{ConfigDocument, Section};
pub use error::{ConfigError, ValidationError};
pub use settings::{Language, Model, Settings};
