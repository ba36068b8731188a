//! Lifecycle classification of a filesystem snapshot against the manifest
//!
//! Every path appearing in either the snapshot or the manifest receives
//! exactly one status per run. Newness and identity changes take priority
//! over expiration bookkeeping carried from the old manifest; deletion
//! takes priority over expiry.

use crate::manifest::ManifestEntry;
use crate::snapshot::Snapshot;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle state of one tracked path for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// On disk, not yet tracked
    New,
    /// Tracked, but the on-disk identity differs; the file is presumed
    /// replaced and gets fresh expiration bookkeeping
    InodeChanged,
    /// Tracked, no longer on disk
    Deleted,
    /// Tracked, unchanged, at or past its expiration
    Expired,
    /// Tracked, unchanged, not yet expired
    NonExpired,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::New => "new",
            Status::InodeChanged => "inode changed",
            Status::Deleted => "deleted",
            Status::Expired => "expired",
            Status::NonExpired => "non-expired",
        };
        f.write_str(label)
    }
}

/// Reconciler output for one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    /// Identity: from the snapshot for `New`/`InodeChanged`, otherwise the
    /// stored value
    pub inode: String,
    /// Expiration for surviving entries; for `Deleted` it is the stored
    /// expiration, carried for reporting only
    pub reference: NaiveDateTime,
    pub status: Status,
}

/// path -> classification; the union of snapshot and manifest paths
pub type ClassifiedSet = BTreeMap<String, Classified>;

/// Classify every path from `snapshot` and `tracked` exactly once
///
/// Priority order: new, inode-changed, deleted, then the expiry split
/// (`expiration <= now` is expired, the boundary is inclusive).
pub fn reconcile(
    snapshot: &Snapshot,
    tracked: &BTreeMap<String, ManifestEntry>,
    default_expiration: NaiveDateTime,
    now: NaiveDateTime,
) -> ClassifiedSet {
    let mut classified = ClassifiedSet::new();

    // New paths and identity changes first; both restart expiration
    // bookkeeping from the configured default.
    for (path, seen) in snapshot {
        let status = match tracked.get(path) {
            None => Status::New,
            Some(entry) if !same_identity(&entry.inode, seen.inode) => Status::InodeChanged,
            Some(_) => continue,
        };
        classified.insert(
            path.clone(),
            Classified {
                inode: seen.inode.to_string(),
                reference: default_expiration,
                status,
            },
        );
    }

    for (path, entry) in tracked {
        if classified.contains_key(path) {
            continue;
        }
        let status = if !snapshot.contains_key(path) {
            Status::Deleted
        } else if entry.expiration <= now {
            Status::Expired
        } else {
            Status::NonExpired
        };
        classified.insert(
            path.clone(),
            Classified {
                inode: entry.inode.clone(),
                reference: entry.expiration,
                status,
            },
        );
    }

    classified
}

/// Numeric identity comparison
///
/// A stored inode that does not parse cannot prove the file unchanged, so
/// it counts as a mismatch.
fn same_identity(stored: &str, observed: u64) -> bool {
    stored.trim().parse::<u64>().map_or(false, |v| v == observed)
}

/// Entries that belong in the manifest after the purge pass: everything
/// classified `New`, `InodeChanged` or `NonExpired`, with its classified
/// expiration and identity
pub fn survivors(classified: &ClassifiedSet) -> BTreeMap<String, ManifestEntry> {
    classified
        .iter()
        .filter(|(_, c)| {
            matches!(
                c.status,
                Status::New | Status::InodeChanged | Status::NonExpired
            )
        })
        .map(|(path, c)| {
            (
                path.clone(),
                ManifestEntry {
                    expiration: c.reference,
                    inode: c.inode.clone(),
                },
            )
        })
        .collect()
}

/// Per-status counts for summary output
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub new: usize,
    pub inode_changed: usize,
    pub deleted: usize,
    pub expired: usize,
    pub non_expired: usize,
}

pub fn tally(classified: &ClassifiedSet) -> Tally {
    let mut counts = Tally::default();
    for c in classified.values() {
        match c.status {
            Status::New => counts.new += 1,
            Status::InodeChanged => counts.inode_changed += 1,
            Status::Deleted => counts.deleted += 1,
            Status::Expired => counts.expired += 1,
            Status::NonExpired => counts.non_expired += 1,
        }
    }
    counts
}
