use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(name = "hubgate", version, about = "Manage multiple GitHub accounts with per-account SSH keys")]
pub struct Cli {
    /// Subcommand chosen to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates SSH keys and registers one or more GitHub accounts
    Setup {
        /// Comma-separated account aliases (prompted if omitted)
        accounts: Option<String>,
    },
    /// Associates a registered account with a local repository
    Repo {
        /// Target repository directory (defaults to the current directory)
        dir: Option<PathBuf>,
    },
    /// Displays all registered accounts
    List,
    /// Removes an account and its key files
    Remove {
        /// Alias of the account to remove
        alias: String,
    },
}
