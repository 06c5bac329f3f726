//! Centralized configuration for the package registry.
//!
//! Compile-time defaults live on [`RegistryConfig`]; [`StoreConfig`] carries
//! the few values a caller may override when opening a store.

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Registry-level constants.
pub struct RegistryConfig;

impl RegistryConfig {
    pub const APP_CONFIG_DIR_NAME: &'static str = "pkgreg";
    pub const DB_FILENAME: &'static str = "packages.db";
    pub const TABLE_NAME: &'static str = "python_package";
    pub const BUSY_TIMEOUT_MS: u64 = 5_000;
    /// Environment variable that overrides the default database location.
    pub const DB_PATH_ENV: &'static str = "PKGREG_DB";
}

/// Options applied when a [`crate::SqliteStore`] opens its connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct StoreConfig {
    /// How long SQLite waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Name of the package table.
    pub table_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(RegistryConfig::BUSY_TIMEOUT_MS),
            table_name: RegistryConfig::TABLE_NAME.to_string(),
        }
    }
}

impl StoreConfig {
    /// Check that the table name is safe to splice into SQL.
    ///
    /// Identifiers cannot be bound as parameters, so only ASCII letters,
    /// digits and underscores are accepted, and the first character must not
    /// be a digit.
    pub fn validate(&self) -> Result<()> {
        let name = self.table_name.as_str();
        let valid = !name.is_empty()
            && !name.starts_with(|c: char| c.is_ascii_digit())
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid {
            return Err(RegistryError::Config {
                message: format!("Invalid table name: {:?}", self.table_name),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_config() {
        let config = StoreConfig::default();
        assert_eq!(config.table_name, "python_package");
        assert_eq!(config.busy_timeout, Duration::from_millis(5_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_table_name_validation() {
        for bad in ["", "1packages", "packages; DROP TABLE x", "pkg-table", "\"quoted\""] {
            let config = StoreConfig {
                table_name: bad.to_string(),
                ..StoreConfig::default()
            };
            assert!(config.validate().is_err(), "{bad:?} should be rejected");
        }

        let config = StoreConfig {
            table_name: "node_package_v2".to_string(),
            ..StoreConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_store_config_partial_json() {
        let config: StoreConfig = serde_json::from_str(r#"{"table_name": "npm_package"}"#).unwrap();
        assert_eq!(config.table_name, "npm_package");
        assert_eq!(config.busy_timeout, StoreConfig::default().busy_timeout);
    }
}
