//! pkgreg core - durable registry of installed package footprints.
//!
//! Maps a package identifier such as `sympy==1.14.0` to the paths that make up
//! its installed footprint, so an extraction pipeline can tell third-party
//! files apart from application code.
//!
//! # Example
//!
//! ```rust,no_run
//! use pkgreg_core::PackageRegistry;
//! use serde_json::json;
//!
//! fn main() -> pkgreg_core::Result<()> {
//!     let registry = PackageRegistry::open()?;
//!
//!     registry.create("sympy==1.14.0", &json!({"pkg": ["mpmath", "sympy"], "version": "1.14.0"}))?;
//!     let fetched = registry.reconcile_fetch(["sympy==1.14.0", "numpy==2.1.0"])?;
//!     println!("{}", serde_json::to_string(&fetched).unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod platform;
pub mod registry;
pub mod store;

pub use codec::{JsonCodec, PathsCodec};
pub use config::{RegistryConfig, StoreConfig};
pub use error::{RegistryError, Result};
pub use registry::{FetchedPackages, PackageId, PackageRecord, PackageRegistry};
pub use store::{ConnectionProvider, SqliteStore};
