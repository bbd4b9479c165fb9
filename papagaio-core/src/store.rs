//! Durable config store.
//!
//! # Storage layout
//!
//! ```text
//! ~/.config/papagaio/        (mode 0700, created on first save)
//!   config.ini               (mode 0600)
//! ```
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Nothing is cached between calls: every load reads the file again, so edits
//! made by hand or by another process are always picked up.

use std::io::Write;
use std::path::Path;

use crate::defaults::defaults_at;
use crate::document::ConfigDocument;
use crate::error::{io_err, ConfigError};
use crate::ini;
use crate::paths::{config_path, ensure_config_dir, home};

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

/// Read `config.ini`, parse it and fill in missing keys from the defaults.
///
/// A missing file yields the defaults table. Unreadable files are an error;
/// malformed lines inside a readable file are not.
pub fn load_at(home: &Path) -> Result<ConfigDocument, ConfigError> {
    let defaults = defaults_at(home);
    let path = config_path(home);

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(defaults);
        }
        Err(e) => return Err(io_err(&path, e)),
    };

    let mut doc = ini::parse(&String::from_utf8_lossy(&bytes));
    let filled = doc.merge_defaults(&defaults);
    tracing::debug!(path = %path.display(), filled, "loaded config");
    Ok(doc)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<ConfigDocument, ConfigError> {
    load_at(&home()?)
}

// ---------------------------------------------------------------------------
// 2. Save (atomic)
// ---------------------------------------------------------------------------

/// Replace `config.ini` with the serialized `doc`.
///
/// Write flow: check entries → serialize → temp file in the same directory →
/// `chmod 0600` → fsync → `rename`. On any error the previous file is intact.
pub fn save_at(home: &Path, doc: &ConfigDocument) -> Result<(), ConfigError> {
    ini::check_representable(doc)?;
    let text = ini::serialize(doc);

    ensure_config_dir(home)?;
    let path = config_path(home);
    atomic_write(&path, text.as_bytes())?;

    tracing::info!(path = %path.display(), "saved config");
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(doc: &ConfigDocument) -> Result<(), ConfigError> {
    save_at(&home()?, doc)
}

// ---------------------------------------------------------------------------
// 3. Single-key update
// ---------------------------------------------------------------------------

/// Load, set one key, save. Returns the saved document.
pub fn set_at(
    home: &Path,
    section: &str,
    key: &str,
    value: &str,
) -> Result<ConfigDocument, ConfigError> {
    let mut doc = load_at(home)?;
    doc.set(section, key, value);
    save_at(home, &doc)?;
    Ok(doc)
}

/// `set_at` convenience wrapper.
pub fn set(section: &str, key: &str, value: &str) -> Result<ConfigDocument, ConfigError> {
    set_at(&home()?, section, key, value)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Write `contents` to a uniquely named sibling of `path`, then rename it over
/// `path`. Concurrent savers each use their own temp file; the last rename
/// wins.
fn atomic_write(path: &Path, contents: &[u8]) -> Result<(), ConfigError> {
    let dir = path
        .parent()
        .ok_or_else(|| io_err(path, std::io::Error::other("config path has no parent")))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".config.ini.")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| io_err(dir, e))?;
    tmp.write_all(contents).map_err(|e| io_err(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| io_err(tmp.path(), e))?;
    set_file_permissions(tmp.path())?;

    tmp.persist(path).map_err(|e| io_err(path, e.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
