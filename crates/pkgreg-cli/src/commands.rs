//! Subcommand implementations.
//!
//! Each command runs against an already-opened registry and returns the JSON
//! value to print, or `None` when the command has no output.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use pkgreg_core::{ConnectionProvider, PackageRegistry};
use serde_json::{json, Map, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print a package record, or null when it is not registered
    Get {
        /// Package identifier, e.g. sympy==1.14.0
        name: String,
    },

    /// Register a package with a JSON paths value
    Create {
        name: String,
        /// Paths as JSON, e.g. '["sympy","mpmath"]'
        paths: String,
    },

    /// Remove a package (no-op when absent)
    Delete { name: String },

    /// Register every package in a JSON object that is not registered yet
    Save {
        /// File holding {"name==version": paths, ...}; "-" reads stdin
        file: PathBuf,
    },

    /// Print {"packages": {...}} for the requested packages that exist
    Fetch {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Print every registered package
    List,
}

pub fn run<P: ConnectionProvider>(
    registry: &PackageRegistry<P>,
    command: &Command,
) -> Result<Option<Value>> {
    match command {
        Command::Get { name } => {
            let record = registry
                .get(name)
                .with_context(|| format!("Failed to look up {}", name))?;
            Ok(Some(serde_json::to_value(record)?))
        }

        Command::Create { name, paths } => {
            let paths: Value = serde_json::from_str(paths)
                .with_context(|| format!("Paths for {} are not valid JSON", name))?;
            let id = registry
                .create(name, &paths)
                .with_context(|| format!("Failed to create {}", name))?;
            if id.is_none() {
                info!("{} is already registered, left unchanged", name);
            }
            Ok(Some(json!({ "id": id })))
        }

        Command::Delete { name } => {
            registry
                .delete(name)
                .with_context(|| format!("Failed to delete {}", name))?;
            Ok(None)
        }

        Command::Save { file } => {
            let packages = read_packages(file)?;
            let before = registry.count()?;
            registry
                .reconcile_save(&packages)
                .context("Failed to save package batch")?;
            let after = registry.count()?;
            info!(
                "Saved batch of {} packages, {} newly registered",
                packages.len(),
                after.saturating_sub(before)
            );
            Ok(None)
        }

        Command::Fetch { names } => {
            let fetched = registry
                .reconcile_fetch(names)
                .context("Failed to fetch packages")?;
            Ok(Some(serde_json::to_value(fetched)?))
        }

        Command::List => {
            let records = registry.list().context("Failed to list packages")?;
            Ok(Some(serde_json::to_value(records)?))
        }
    }
}

fn read_packages(file: &Path) -> Result<Map<String, Value>> {
    let raw = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read packages from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!(
            "{} must hold a JSON object of package -> paths, found {}",
            file.display(),
            kind_of(&other)
        ),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry() -> PackageRegistry {
        PackageRegistry::in_memory().unwrap()
    }

    #[test]
    fn test_create_then_get() {
        let registry = registry();
        let created = run(
            &registry,
            &Command::Create {
                name: "sympy==1.14.0".into(),
                paths: r#"{"pkg": ["sympy"], "version": "1.14.0"}"#.into(),
            },
        )
        .unwrap()
        .unwrap();
        assert!(created["id"].is_i64());

        let got = run(&registry, &Command::Get { name: "sympy==1.14.0".into() })
            .unwrap()
            .unwrap();
        assert_eq!(got["name"], "sympy==1.14.0");
        assert_eq!(got["paths"], json!({"pkg": ["sympy"], "version": "1.14.0"}));
    }

    #[test]
    fn test_create_conflict_prints_null_id() {
        let registry = registry();
        let cmd = Command::Create {
            name: "a==1".into(),
            paths: "[]".into(),
        };
        run(&registry, &cmd).unwrap();

        let second = run(&registry, &cmd).unwrap().unwrap();
        assert_eq!(second, json!({"id": null}));
    }

    #[test]
    fn test_create_rejects_bad_json() {
        let registry = registry();
        let err = run(
            &registry,
            &Command::Create {
                name: "a==1".into(),
                paths: "[unclosed".into(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_get_missing_is_null() {
        let registry = registry();
        let got = run(&registry, &Command::Get { name: "nope==0".into() }).unwrap();
        assert_eq!(got, Some(Value::Null));
    }

    #[test]
    fn test_save_and_fetch_from_file() {
        let registry = registry();
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("packages.json");
        std::fs::write(&file, r#"{"a==1": ["x"], "b==2": ["y"]}"#).unwrap();

        assert!(run(&registry, &Command::Save { file }).unwrap().is_none());

        let fetched = run(
            &registry,
            &Command::Fetch {
                names: vec!["a==1".into(), "b==2".into(), "c==3".into()],
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(fetched, json!({"packages": {"a==1": ["x"], "b==2": ["y"]}}));
    }

    #[test]
    fn test_save_rejects_non_object() {
        let registry = registry();
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("packages.json");
        std::fs::write(&file, r#"["a==1"]"#).unwrap();

        let err = run(&registry, &Command::Save { file }).unwrap_err();
        assert!(err.to_string().contains("found an array"));
        assert_eq!(registry.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_and_list() {
        let registry = registry();
        registry.create("a==1", &json!([])).unwrap();
        registry.create("b==2", &json!([])).unwrap();

        assert!(run(&registry, &Command::Delete { name: "a==1".into() })
            .unwrap()
            .is_none());

        let listed = run(&registry, &Command::List).unwrap().unwrap();
        let names: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["b==2"]);
    }
}
