//! Safe deletion of expired entries
//!
//! Visits the expired set deepest-first, protects non-empty directories,
//! and cascades upward through ancestors that are empty and themselves
//! expired. Dry runs share the real code path against a virtual
//! removed-set, so the report matches what an actual pass would do.

use crate::error::Result;
use crate::reconcile::{ClassifiedSet, Status};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Why an expired entry was not removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Vanished between scan and purge
    Vanished,
    /// Directory still holds live children
    NonEmptyDir,
    /// Neither regular file, directory nor symlink
    UnknownFileType,
}

/// Outcome of one purge pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PurgeReport {
    /// Relative paths removed (or, in dry-run, that would be removed), in
    /// removal order
    pub removed: Vec<String>,
    /// Expired entries left in place, with the reason
    pub skipped: Vec<(String, SkipReason)>,
}

impl PurgeReport {
    pub fn applied(&self) -> usize {
        self.removed.len()
    }
}

/// Delete everything classified `Expired`, within the safety rules
///
/// Reverse path order visits leaves before their directories, so a
/// directory whose expired children go first is seen empty by the time its
/// own turn comes. Removal failures are fatal; the caller must not rewrite
/// the manifest when this returns an error.
pub fn purge(root: &Path, classified: &ClassifiedSet, dry_run: bool) -> Result<PurgeReport> {
    let mut report = PurgeReport::default();
    let mut removed: BTreeSet<String> = BTreeSet::new();

    let expired = classified
        .iter()
        .rev()
        .filter(|(_, c)| c.status == Status::Expired);

    for (path, _) in expired {
        if removed.contains(path) {
            // Already taken out by an earlier cascade this run.
            continue;
        }

        let full = join_rel(root, path);
        let meta = match fs::symlink_metadata(&full) {
            Ok(m) => m,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("'{path}' no longer exists, skipping");
                report.skipped.push((path.clone(), SkipReason::Vanished));
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let file_type = meta.file_type();

        // symlink_metadata never reports a symlink as a directory, so a
        // link to a populated directory falls through to the unlink arm.
        if file_type.is_dir() && !dir_is_empty(&full, path, &removed)? {
            report.skipped.push((path.clone(), SkipReason::NonEmptyDir));
            continue;
        }

        if file_type.is_symlink() || file_type.is_file() {
            if !dry_run {
                fs::remove_file(&full)?;
            }
            mark_removed(path, &mut removed, &mut report);
            cascade_parents(root, path, classified, dry_run, &mut removed, &mut report)?;
            continue;
        }

        if file_type.is_dir() {
            if !dry_run {
                fs::remove_dir(&full)?;
            }
            mark_removed(path, &mut removed, &mut report);
            continue;
        }

        warn!("'{path}' has an unknown file type, skipping");
        report
            .skipped
            .push((path.clone(), SkipReason::UnknownFileType));
    }

    Ok(report)
}

/// Remove now-empty ancestors of `path`, ascending only while each one is
/// itself classified `Expired`
fn cascade_parents(
    root: &Path,
    path: &str,
    classified: &ClassifiedSet,
    dry_run: bool,
    removed: &mut BTreeSet<String>,
    report: &mut PurgeReport,
) -> Result<()> {
    let mut current = parent_path(path);
    while let Some(parent) = current {
        let expired = classified
            .get(&parent)
            .map_or(false, |c| c.status == Status::Expired);
        let full = join_rel(root, &parent);
        if !expired || !dir_is_empty(&full, &parent, removed)? {
            break;
        }
        if !dry_run {
            fs::remove_dir(&full)?;
        }
        mark_removed(&parent, removed, report);
        current = parent_path(&parent);
    }
    Ok(())
}

fn mark_removed(path: &str, removed: &mut BTreeSet<String>, report: &mut PurgeReport) {
    removed.insert(path.to_string());
    report.removed.push(path.to_string());
}

fn parent_path(path: &str) -> Option<String> {
    path.rsplit_once('/').map(|(parent, _)| parent.to_string())
}

fn join_rel(root: &Path, rel: &str) -> PathBuf {
    let mut full = root.to_path_buf();
    full.extend(rel.split('/'));
    full
}

/// Emptiness check that ignores entries already removed this run
///
/// In a real pass removed children are gone from disk anyway; in dry-run
/// the removed-set stands in for the deletions that would have happened.
fn dir_is_empty(full: &Path, rel: &str, removed: &BTreeSet<String>) -> Result<bool> {
    for child in fs::read_dir(full)? {
        let child = child?;
        let child_rel = match child.file_name().to_str() {
            Some(name) => format!("{rel}/{name}"),
            // Unnameable child still occupies the directory.
            None => return Ok(false),
        };
        if !removed.contains(&child_rel) {
            return Ok(false);
        }
    }
    Ok(true)
}
