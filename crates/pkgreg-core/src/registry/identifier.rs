//! Package identifiers of the form `<name>==<version>`.
//!
//! The registry keys records by an opaque string and never parses it. This
//! type exists for callers that build or inspect keys following the
//! pip-freeze convention.

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between name and version.
pub const VERSION_SEPARATOR: &str = "==";

/// A package name plus its exact version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId {
    pub name: String,
    pub version: String,
}

impl PackageId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `name==version`, splitting on the first separator.
    ///
    /// Surrounding whitespace is trimmed from both halves; neither may end up
    /// empty.
    pub fn parse(raw: &str) -> Result<Self> {
        let (name, version) = raw.split_once(VERSION_SEPARATOR).ok_or_else(|| {
            RegistryError::validation(
                "package_id",
                format!("expected <name>{VERSION_SEPARATOR}<version>, got {raw:?}"),
            )
        })?;

        let name = name.trim();
        let version = version.trim();
        if name.is_empty() {
            return Err(RegistryError::validation(
                "package_id",
                format!("missing package name in {raw:?}"),
            ));
        }
        if version.is_empty() {
            return Err(RegistryError::validation(
                "package_id",
                format!("missing version in {raw:?}"),
            ));
        }

        Ok(Self::new(name, version))
    }

    /// The registry key for this package.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, VERSION_SEPARATOR, self.version)
    }
}

impl FromStr for PackageId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
