//! Package registry: package identifier → installed footprint.
//!
//! Stores one record per package identifier (conventionally
//! `<name>==<version>`) holding the structured `paths` value a pipeline uses
//! to recognize the files that belong to that dependency.
//!
//! # Location
//!
//! By default the database lives at a platform-standard config directory:
//! - **Linux**: `~/.config/pkgreg/packages.db`
//! - **Windows**: `%APPDATA%\pkgreg\packages.db`
//! - **macOS**: `~/Library/Application Support/pkgreg/packages.db`

pub mod identifier;
pub mod package_registry;

pub use identifier::PackageId;
pub use package_registry::{FetchedPackages, PackageRecord, PackageRegistry};
