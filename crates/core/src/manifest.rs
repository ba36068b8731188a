//! Flat-text manifest codec and persistence
//!
//! The manifest maps tracked paths to expiration and identity metadata:
//!
//! ```text
//! base=<absolute root path>
//! ---
//! filename=<path relative to root>
//! expiration=<YYYY/MM/DD_hh:mm>
//! inode=<string>
//! ---
//! filename=...
//! ```
//!
//! Field lines are split on the first `=` only, so paths containing `=`
//! round-trip. Field order within a record is fixed.

use crate::error::{Error, Result};
use crate::expiry::{format_timestamp, parse_timestamp};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One tracked filesystem path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Absolute expiration timestamp, minute resolution
    pub expiration: NaiveDateTime,
    /// File identity, string-encoded for portability across filesystems
    /// with differing inode widths
    pub inode: String,
}

/// Persisted record set for one scanned root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Absolute root the tracked paths are relative to
    pub root: PathBuf,
    /// path -> entry; sorted, so encoding is deterministic
    pub entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Empty manifest for `root`
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            entries: BTreeMap::new(),
        }
    }

    /// Parse manifest text
    pub fn decode(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().collect();

        let first = *lines.first().ok_or_else(|| Error::CorruptManifest {
            line: 1,
            reason: "empty manifest".to_string(),
        })?;
        let root = match first.split_once('=') {
            Some(("base", value)) => root_from_base(value),
            _ => {
                return Err(Error::CorruptManifest {
                    line: 1,
                    reason: "first line must be 'base=<root>'".to_string(),
                })
            }
        };

        let mut entries = BTreeMap::new();
        let mut i = 1;
        while i < lines.len() {
            if lines[i] != "---" {
                return Err(Error::CorruptManifest {
                    line: i + 1,
                    reason: format!("expected '---' record separator, got '{}'", lines[i]),
                });
            }
            let path = field_at(&lines, i + 1, "filename")?;
            let raw_expiration = field_at(&lines, i + 2, "expiration")?;
            let inode = field_at(&lines, i + 3, "inode")?;

            let expiration = parse_timestamp(raw_expiration).ok_or_else(|| {
                Error::CorruptManifest {
                    line: i + 3,
                    reason: format!("bad expiration '{raw_expiration}'"),
                }
            })?;

            entries.insert(
                path.to_string(),
                ManifestEntry {
                    expiration,
                    inode: inode.to_string(),
                },
            );
            i += 4;
        }

        Ok(Self { root, entries })
    }

    /// Render manifest text (inverse of [`Manifest::decode`])
    pub fn encode(&self) -> String {
        let mut out = format!("base={}\n", self.root.display());
        for (path, entry) in &self.entries {
            let _ = write!(
                out,
                "---\nfilename={path}\nexpiration={}\ninode={}\n",
                format_timestamp(entry.expiration),
                entry.inode
            );
        }
        out
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::decode(&text)
    }

    /// Persist the manifest, replacing `path` atomically
    ///
    /// Writes to a temporary file in the target's directory and renames it
    /// over the original, so readers never observe a torn manifest.
    pub fn store(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(self.encode().as_bytes())?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

/// Overwrite gate for initialization: true when a manifest file already
/// exists at `path`. The caller decides whether to proceed.
pub fn manifest_exists(path: &Path) -> bool {
    path.exists()
}

fn root_from_base(value: &str) -> PathBuf {
    let trimmed = value.trim_end_matches('/');
    if trimmed.is_empty() {
        PathBuf::from("/")
    } else {
        PathBuf::from(trimmed)
    }
}

fn field_at<'a>(lines: &[&'a str], idx: usize, key: &str) -> Result<&'a str> {
    let line = lines.get(idx).ok_or_else(|| Error::CorruptManifest {
        line: idx + 1,
        reason: format!("missing '{key}=' field"),
    })?;
    match line.split_once('=') {
        Some((k, value)) if k == key => Ok(value),
        _ => Err(Error::CorruptManifest {
            line: idx + 1,
            reason: format!("expected '{key}=<value>'"),
        }),
    }
}
