//! Filesystem snapshotter
//!
//! Walks a directory tree and records every file, directory and symlink as
//! a root-relative slash-separated path with its identity number. Symlinks
//! are recorded as the link itself, never followed.

use crate::error::{Error, Result};
use crate::identity::FileIdentity;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::path::{Component, Path};
use tracing::warn;
use walkdir::WalkDir;

/// One path observed by today's walk; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Identity number (inode on Unix)
    pub inode: u64,
    /// When the walk observed the entry
    pub observed_at: NaiveDateTime,
}

/// relative path -> entry for one run
pub type Snapshot = BTreeMap<String, SnapshotEntry>;

/// Walk `root` and snapshot everything under it
///
/// Paths with control characters are skipped with a warning, as are
/// entries whose stat or identity probe fails. Losing the root itself
/// mid-walk is fatal.
pub fn scan(root: &Path, identity: &dyn FileIdentity, now: NaiveDateTime) -> Result<Snapshot> {
    if !root.is_dir() {
        return Err(Error::PathNotFound(root.to_path_buf()));
    }

    let mut snapshot = Snapshot::new();
    for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                // Depth 0 means the root itself became unreadable.
                if err.depth() == 0 {
                    return Err(Error::ScanError {
                        root: root.to_path_buf(),
                        source: err,
                    });
                }
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };

        let rel = match relative_slash_path(entry.path(), root) {
            Some(rel) => rel,
            None => {
                warn!(
                    "skipping non-UTF-8 path '{}'",
                    entry.path().display()
                );
                continue;
            }
        };
        if has_control_chars(&rel) {
            warn!(
                "path '{}' has control characters, skipping",
                rel.escape_debug()
            );
            continue;
        }

        // With follow_links(false) this is lstat: symlinks report the
        // link, matching the identity semantics.
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                warn!("stat failed for '{rel}': {err}");
                continue;
            }
        };
        let inode = match identity.file_id(entry.path(), &meta) {
            Ok(id) => id,
            Err(err) => {
                warn!("identity probe failed for '{rel}': {err}");
                continue;
            }
        };

        snapshot.insert(
            rel,
            SnapshotEntry {
                inode,
                observed_at: now,
            },
        );
    }

    Ok(snapshot)
}

/// Root-relative path with `/` separators on every platform
///
/// Returns `None` for non-UTF-8 components or paths outside `root`.
pub(crate) fn relative_slash_path(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?.to_string()),
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// True when any character falls in a Unicode `C*` category (control,
/// format, private-use, surrogate, unassigned)
pub(crate) fn has_control_chars(path: &str) -> bool {
    use unicode_general_category::{get_general_category, GeneralCategory};

    path.chars().any(|c| {
        matches!(
            get_general_category(c),
            GeneralCategory::Control
                | GeneralCategory::Format
                | GeneralCategory::PrivateUse
                | GeneralCategory::Surrogate
                | GeneralCategory::Unassigned
        )
    })
}
