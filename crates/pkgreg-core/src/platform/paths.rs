//! Platform-specific directory and file paths.

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use std::path::PathBuf;

/// Get the registry configuration directory.
///
/// # Platform Behavior
/// - **Linux**: `~/.config/pkgreg` (XDG_CONFIG_HOME)
/// - **Windows**: `%APPDATA%\pkgreg`
/// - **macOS**: `~/Library/Application Support/pkgreg`
pub fn pkgreg_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| RegistryError::Config {
        message: "Could not determine platform config directory".to_string(),
    })?;
    Ok(config_dir.join(RegistryConfig::APP_CONFIG_DIR_NAME))
}

/// Get the path to the package registry database.
///
/// Returns `{pkgreg_config_dir}/packages.db`.
pub fn default_db_path() -> Result<PathBuf> {
    Ok(pkgreg_config_dir()?.join(RegistryConfig::DB_FILENAME))
}
