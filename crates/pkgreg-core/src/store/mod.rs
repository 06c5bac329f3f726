//! Durable storage behind the package registry.
//!
//! The registry never opens connections itself. It is handed a
//! [`ConnectionProvider`] that lends out a scoped SQLite handle per call and
//! guarantees the package table exists before the first loan.

mod provider;
mod sqlite;

pub use provider::ConnectionProvider;
pub use sqlite::SqliteStore;
