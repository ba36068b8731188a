//! Typed errors for sweep operations

use std::path::PathBuf;
use thiserror::Error;

/// Fatal error kinds.
///
/// Non-fatal conditions (control-character paths, purge races, unknown
/// file types) are logged and accumulated in reports instead of aborting
/// the run.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or past-dated expiration spec
    #[error("invalid expiration '{spec}': {reason}")]
    InvalidExpiration { spec: String, reason: String },

    /// Root directory missing
    #[error("directory not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Malformed manifest structure; no partial recovery is attempted
    #[error("corrupt manifest (line {line}): {reason}")]
    CorruptManifest { line: usize, reason: String },

    /// Unrecoverable directory walk failure
    #[error("scan of '{}' failed: {source}", .root.display())]
    ScanError {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for sweep operations
pub type Result<T> = std::result::Result<T, Error>;
