//! Shared CLI helpers

use anyhow::{bail, Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Validate a scan root: absolute existing directory, trailing slashes
/// trimmed
pub fn validate_root(directory: &Path) -> Result<PathBuf> {
    if !directory.is_absolute() {
        bail!(
            "relative directories are not allowed: '{}'",
            directory.display()
        );
    }
    if !directory.is_dir() {
        bail!("'{}' does not exist", directory.display());
    }
    let trimmed = directory.to_string_lossy();
    let trimmed = trimmed.trim_end_matches('/');
    // A trailing '.' component ("/srv/data/.") is a relative spelling of
    // the root and would skew the recorded base path.
    if trimmed.ends_with('.') {
        bail!(
            "relative directories are not allowed: '{}'",
            directory.display()
        );
    }
    Ok(if trimmed.is_empty() {
        PathBuf::from("/")
    } else {
        PathBuf::from(trimmed)
    })
}

/// Ask a yes/no question, reading stdin; empty answer means no
pub fn confirm(prompt: &str) -> Result<bool> {
    loop {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin()
            .read_line(&mut answer)
            .context("failed to read confirmation")?;
        match answer.trim() {
            "" | "n" | "N" => return Ok(false),
            "y" | "Y" => return Ok(true),
            _ => continue,
        }
    }
}
