use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const APP_DIR: &str = "papagaio";
pub const CONFIG_FILE: &str = "config.ini";
pub const TRIAL_FILE: &str = ".trial";
pub const LICENSE_FILE: &str = ".license";

/// `<home>/.config/papagaio`
pub fn config_dir(home: &Path) -> PathBuf {
    home.join(".config").join(APP_DIR)
}

pub fn config_path(home: &Path) -> PathBuf {
    config_dir(home).join(CONFIG_FILE)
}

pub fn trial_path(home: &Path) -> PathBuf {
    config_dir(home).join(TRIAL_FILE)
}

pub fn license_path(home: &Path) -> PathBuf {
    config_dir(home).join(LICENSE_FILE)
}

pub fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

/// Create `<home>/.config/papagaio` (mode `0700`) if it does not exist yet.
pub fn ensure_config_dir(home: &Path) -> Result<PathBuf, ConfigError> {
    let dir = config_dir(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::error::io_err(&dir, e))?;
        set_dir_permissions(&dir)?;
    }
    Ok(dir)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| crate::error::io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}
