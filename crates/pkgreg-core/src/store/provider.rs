//! Connection provider trait.

use crate::error::Result;
use rusqlite::Connection;

/// Source of scoped connections to the package table.
///
/// Implementations must release the handle on every exit path of
/// `with_connection`, including when `f` fails, and must have created the
/// schema before the first call.
pub trait ConnectionProvider: Send + Sync {
    /// Run `f` with a connection whose lifetime ends when `f` returns.
    fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>;

    /// Name of the table holding package records.
    fn table_name(&self) -> &str;
}

impl<P: ConnectionProvider> ConnectionProvider for std::sync::Arc<P> {
    fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        (**self).with_connection(f)
    }

    fn table_name(&self) -> &str {
        (**self).table_name()
    }
}
