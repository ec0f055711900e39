//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tome")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Inspect and edit a directory-backed collection store")]
pub struct Cli {
    /// Configuration file (TOML). Missing files are ignored.
    #[arg(long, short, global = true, default_value = "tome.toml")]
    pub config: PathBuf,

    /// Store root directory; overrides `store.root` from the config.
    #[arg(long, short, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a JSON document as a record
    Write {
        collection: String,
        resource: String,
        /// Record body as JSON text
        json: String,
    },
    /// Print a single record
    Read { collection: String, resource: String },
    /// Print every record in a collection
    ReadAll { collection: String },
    /// Delete a record, or the whole collection when no resource is given
    Delete {
        collection: String,
        #[arg(default_value = "")]
        resource: String,
    },
    /// List collections under the store root
    Collections {},
    /// Remove stale staging files left by interrupted writes
    Purge {},
    /// Write the sample `users` collection and print it back
    Seed {},
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_delete_without_resource_targets_collection() {
        let cli = Cli::try_parse_from(["tome", "delete", "users"]).unwrap();
        match cli.command {
            Command::Delete { collection, resource } => {
                assert_eq!(collection, "users");
                assert!(resource.is_empty());
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_root_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["tome", "read-all", "users", "--root", "/tmp/db"]).unwrap();
        assert_eq!(cli.root.as_deref(), Some(std::path::Path::new("/tmp/db")));
        assert_eq!(cli.config, PathBuf::from("tome.toml"));
    }
}
