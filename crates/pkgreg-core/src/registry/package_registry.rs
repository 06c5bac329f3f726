//! SQLite-backed registry of package identifiers and their installed paths.

use crate::codec::{JsonCodec, PathsCodec};
use crate::error::{RegistryError, Result};
use crate::store::{ConnectionProvider, SqliteStore};
use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// A stored package record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: i64,
    pub name: String,
    pub paths: Value,
}

impl PackageRecord {
    /// Deserialize `paths` into a caller-chosen shape.
    pub fn paths_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.paths)?)
    }
}

/// Result of [`PackageRegistry::reconcile_fetch`].
///
/// Serializes as `{"packages": {name: paths, ...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchedPackages {
    pub packages: BTreeMap<String, Value>,
}

impl FetchedPackages {
    /// Paths stored for `name`, if it was fetched.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.packages.get(name)
    }

    /// Number of packages found.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// True when none of the requested packages were registered.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Unwrap into the bare name → paths map.
    pub fn into_packages(self) -> BTreeMap<String, Value> {
        self.packages
    }
}

/// Durable name → paths table.
///
/// Every operation borrows one connection from the provider and gives it back
/// before returning. Batch operations are loops over single-record operations
/// with no enclosing transaction, so an interrupted batch leaves its finished
/// entries committed and can be rerun as a whole.
pub struct PackageRegistry<P = SqliteStore, C = JsonCodec> {
    provider: P,
    codec: C,
}

impl PackageRegistry<SqliteStore, JsonCodec> {
    /// Open the registry at the default platform location.
    pub fn open() -> Result<Self> {
        Ok(Self::new(SqliteStore::open()?))
    }

    /// Open the registry at a specific database path.
    pub fn open_at(db_path: &Path) -> Result<Self> {
        Ok(Self::new(SqliteStore::open_at(db_path)?))
    }

    /// Open an ephemeral in-memory registry.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(SqliteStore::open_in_memory()?))
    }
}

impl<P: ConnectionProvider> PackageRegistry<P, JsonCodec> {
    /// Create a registry over `provider` that stores paths as JSON.
    pub fn new(provider: P) -> Self {
        Self::with_codec(provider, JsonCodec)
    }
}

impl<P: ConnectionProvider, C: PathsCodec> PackageRegistry<P, C> {
    /// Create a registry over `provider` with a custom paths codec.
    pub fn with_codec(provider: P, codec: C) -> Self {
        Self { provider, codec }
    }

    /// The connection provider backing this registry.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn table(&self) -> &str {
        self.provider.table_name()
    }

    // ========================================
    // Single-record operations
    // ========================================

    /// Insert a new package record.
    ///
    /// Returns the new row id, or `None` when `name` is already registered.
    /// The existing record is left untouched in that case.
    pub fn create(&self, name: &str, paths: &Value) -> Result<Option<i64>> {
        validate_name(name)?;
        let encoded = self.codec.encode(paths)?;
        let sql = format!("INSERT INTO {} (name, paths) VALUES (?1, ?2)", self.table());

        let inserted = self.provider.with_connection(|conn| {
            conn.execute(&sql, params![name, encoded])?;
            Ok(conn.last_insert_rowid())
        });

        match inserted {
            Ok(id) => {
                debug!("Registered package {} (id {})", name, id);
                Ok(Some(id))
            }
            Err(err) if err.is_unique_violation() => {
                warn!("Package already registered, not re-creating: {}", name);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Look up a package by name.
    pub fn get(&self, name: &str) -> Result<Option<PackageRecord>> {
        let sql = format!("SELECT id, name, paths FROM {} WHERE name = ?1", self.table());

        let row: Option<(i64, String, String)> = self.provider.with_connection(|conn| {
            Ok(conn
                .query_row(&sql, params![name], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })
                .optional()?)
        })?;

        row.map(|(id, name, raw)| self.decode_record(id, name, &raw))
            .transpose()
    }

    /// Remove a package. Removing an unknown name is a no-op.
    pub fn delete(&self, name: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE name = ?1", self.table());

        let rows = self
            .provider
            .with_connection(|conn| Ok(conn.execute(&sql, params![name])?))?;

        if rows > 0 {
            debug!("Deleted package {}", name);
        } else {
            debug!("Delete skipped, package not registered: {}", name);
        }
        Ok(())
    }

    /// Check whether a package is registered without decoding its paths.
    pub fn contains(&self, name: &str) -> Result<bool> {
        let sql = format!("SELECT 1 FROM {} WHERE name = ?1 LIMIT 1", self.table());

        self.provider.with_connection(|conn| {
            Ok(conn
                .query_row(&sql, params![name], |_| Ok(()))
                .optional()?
                .is_some())
        })
    }

    /// All records, ordered by name.
    pub fn list(&self) -> Result<Vec<PackageRecord>> {
        let sql = format!("SELECT id, name, paths FROM {} ORDER BY name", self.table());

        let rows: Vec<(i64, String, String)> = self.provider.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;

            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })?;

        rows.into_iter()
            .map(|(id, name, raw)| self.decode_record(id, name, &raw))
            .collect()
    }

    /// Number of registered packages.
    pub fn count(&self) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table());

        let count: i64 = self
            .provider
            .with_connection(|conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))?;
        usize::try_from(count).map_err(|_| RegistryError::Database {
            message: format!("Invalid package count: {}", count),
            source: None,
        })
    }

    // ========================================
    // Batch reconciliation
    // ========================================

    /// Create every package in `packages` that is not registered yet.
    ///
    /// Existing records win and are never overwritten. Applying the same
    /// mapping again is a no-op. Entries with an empty name are skipped with a
    /// warning. A storage fault stops the batch; entries handled before it
    /// stay committed.
    pub fn reconcile_save<'a, I>(&self, packages: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a String, &'a Value)>,
    {
        let mut created = 0usize;
        let mut skipped = 0usize;
        let mut invalid = 0usize;

        for (name, paths) in packages {
            if self.contains(name)? {
                skipped += 1;
                continue;
            }

            // Another writer may insert between the check and the create.
            match self.create(name, paths) {
                Ok(Some(_)) => created += 1,
                Ok(None) => skipped += 1,
                Err(RegistryError::Validation { message, .. }) => {
                    warn!("Skipping package {:?} in batch: {}", name, message);
                    invalid += 1;
                }
                Err(err) => return Err(err),
            }
        }

        debug!(
            "Reconciled package batch: {} created, {} already present, {} invalid",
            created, skipped, invalid
        );
        Ok(())
    }

    /// Paths for each requested package that is registered.
    ///
    /// Unknown names are left out of the result; duplicate names appear once.
    pub fn reconcile_fetch<I, S>(&self, names: I) -> Result<FetchedPackages>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut packages: BTreeMap<String, Value> = BTreeMap::new();

        for name in names {
            let name = name.as_ref();
            if packages.contains_key(name) {
                continue;
            }
            if let Some(record) = self.get(name)? {
                packages.insert(record.name, record.paths);
            }
        }

        Ok(FetchedPackages { packages })
    }

    fn decode_record(&self, id: i64, name: String, raw: &str) -> Result<PackageRecord> {
        let paths = self.codec.decode(raw).map_err(|e| RegistryError::Json {
            message: format!("Stored paths for {} are not decodable", name),
            source: match e {
                RegistryError::Json { source, .. } => source,
                _ => None,
            },
        })?;
        Ok(PackageRecord { id, name, paths })
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RegistryError::validation(
            "name",
            "package identifier must not be empty",
        ));
    }
    Ok(())
}
