use std::path::PathBuf;

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Registry file exists but does not parse as JSON
    #[error("account registry at {path} is corrupt: {source}")]
    RegistryCorrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Error during JSON serialization
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Error when user input fails
    #[error("inquire error: {0}")]
    Prompt(#[from] inquire::InquireError),
    /// Operator declined a required confirmation
    #[error("aborted by user")]
    UserAborted,
    /// A required external tool could not be found on this machine
    #[error("required tool not found: {0}. Install OpenSSH/git and retry")]
    ToolMissing(String),
    /// An invoked external tool exited nonzero or timed out
    #[error("{tool} failed: {detail}")]
    ToolFailed { tool: String, detail: String },
    /// Registry is empty where at least one account is required
    #[error("no accounts configured. Run `hubgate setup` first")]
    NoAccountsConfigured,
    /// Error compiling a stanza-matching pattern
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
    /// Error during input validation
    #[error("validation error: {0}")]
    Validation(String),
    /// Error when a specific account alias is not found
    #[error("account alias not found: '{0}'")]
    AccountNotFound(String),
    /// Target directory does not exist
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),
}
