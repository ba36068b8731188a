//! Command implementations

pub mod init;
pub mod sweep;

use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Resolved invocation settings, passed explicitly to every command
pub struct Options {
    pub manifest_path: PathBuf,
    /// Expiration assigned to new and replaced entries
    pub default_expiration: NaiveDateTime,
    pub now: NaiveDateTime,
    pub dry_run: bool,
    pub force: bool,
    pub verbose: bool,
}
