//! pkgreg - inspect and edit the package footprint registry from a shell.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::Command;
use pkgreg_core::{PackageRegistry, RegistryConfig};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "pkgreg")]
#[command(about = "Registry of installed package footprints")]
struct Args {
    /// Registry database (defaults to the platform config directory)
    #[arg(long, global = true, env = RegistryConfig::DB_PATH_ENV)]
    db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let registry = match &args.db {
        Some(path) => PackageRegistry::open_at(path)
            .with_context(|| format!("Failed to open registry at {}", path.display()))?,
        None => PackageRegistry::open().context("Failed to open default registry")?,
    };
    debug!("Using registry {:?}", registry.provider());

    if let Some(output) = commands::run(&registry, &args.command)? {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch_with_db() {
        let args = Args::try_parse_from([
            "pkgreg", "--db", "/tmp/p.db", "fetch", "a==1", "b==2",
        ])
        .unwrap();

        assert_eq!(args.db, Some(PathBuf::from("/tmp/p.db")));
        assert_eq!(
            args.command,
            Command::Fetch {
                names: vec!["a==1".to_string(), "b==2".to_string()]
            }
        );
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["pkgreg", "get", "sympy==1.14.0", "--debug"]).unwrap();
        assert!(args.debug);
        assert_eq!(
            args.command,
            Command::Get {
                name: "sympy==1.14.0".to_string()
            }
        );
    }

    #[test]
    fn test_fetch_requires_names() {
        assert!(Args::try_parse_from(["pkgreg", "fetch"]).is_err());
    }

    #[test]
    fn test_save_accepts_stdin_marker() {
        let args = Args::try_parse_from(["pkgreg", "save", "-"]).unwrap();
        assert_eq!(
            args.command,
            Command::Save {
                file: PathBuf::from("-")
            }
        );
    }
}
