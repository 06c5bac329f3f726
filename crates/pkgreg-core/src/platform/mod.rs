//! Platform abstraction layer.
//!
//! Centralizes the OS-specific location of the registry database so callers
//! never hard-code config directories.

pub mod paths;

pub use paths::{default_db_path, pkgreg_config_dir};
