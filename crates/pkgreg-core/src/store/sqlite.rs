//! SQLite-backed connection provider.

use super::provider::ConnectionProvider;
use crate::config::StoreConfig;
use crate::error::{RegistryError, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// SQLite store holding the package table.
///
/// Uses WAL mode for safe concurrent access across processes and
/// `Arc<Mutex<Connection>>` for thread safety within a process. Clones share
/// the same connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    config: StoreConfig,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open the store at the default platform location.
    ///
    /// Creates the database and parent directories if they don't exist.
    pub fn open() -> Result<Self> {
        let db_path = crate::platform::default_db_path()?;
        Self::open_at(&db_path)
    }

    /// Open the store at a specific path with default settings.
    pub fn open_at(db_path: &Path) -> Result<Self> {
        Self::with_config(db_path, StoreConfig::default())
    }

    /// Open the store at a specific path with custom settings.
    ///
    /// Creates the database and parent directories if they don't exist.
    pub fn with_config(db_path: &Path, config: StoreConfig) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| RegistryError::io_with_path(e, parent))?;
            }
        }

        let conn = Connection::open(db_path).map_err(|e| RegistryError::Database {
            message: format!("Failed to open registry database {}", db_path.display()),
            source: Some(e),
        })?;
        Self::configure_connection(&conn, &config, true)?;
        Self::ensure_schema(&conn, &config.table_name)?;

        debug!("Opened package registry at {}", db_path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
            db_path: Some(db_path.to_path_buf()),
        })
    }

    /// Open an ephemeral store that lives only as long as this value and its
    /// clones.
    pub fn open_in_memory() -> Result<Self> {
        Self::in_memory_with_config(StoreConfig::default())
    }

    /// Open an ephemeral store with custom settings.
    pub fn in_memory_with_config(config: StoreConfig) -> Result<Self> {
        config.validate()?;

        let conn = Connection::open_in_memory()?;
        Self::configure_connection(&conn, &config, false)?;
        Self::ensure_schema(&conn, &config.table_name)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
            db_path: None,
        })
    }

    /// Path of the backing database file, `None` for in-memory stores.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn configure_connection(conn: &Connection, config: &StoreConfig, wal: bool) -> Result<()> {
        conn.busy_timeout(config.busy_timeout)?;
        if wal {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;\n\
                 PRAGMA synchronous=NORMAL;",
            )?;
        }
        conn.execute_batch("PRAGMA temp_store=MEMORY;")?;
        Ok(())
    }

    fn ensure_schema(conn: &Connection, table: &str) -> Result<()> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                paths TEXT NOT NULL
            );"
        ))
        .map_err(|e| RegistryError::Database {
            message: "Failed to initialize package schema".to_string(),
            source: Some(e),
        })?;
        Ok(())
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RegistryError::Database {
            message: "Failed to acquire registry connection lock".to_string(),
            source: None,
        })
    }
}

impl ConnectionProvider for SqliteStore {
    fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock_conn()?;
        f(&conn)
    }

    fn table_name(&self) -> &str {
        &self.config.table_name
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .field("table_name", &self.config.table_name)
            .finish_non_exhaustive()
    }
}
