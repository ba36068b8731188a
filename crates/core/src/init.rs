//! First-run manifest construction

use crate::error::Result;
use crate::identity::FileIdentity;
use crate::manifest::{Manifest, ManifestEntry};
use crate::snapshot;
use chrono::NaiveDateTime;
use std::path::Path;

/// Walk `root` fresh and track every file and directory with the same
/// expiration and its current identity
///
/// Nothing is written here; the caller persists with [`Manifest::store`]
/// after checking [`crate::manifest::manifest_exists`] and running its own
/// overwrite confirmation.
pub fn initialize(
    root: &Path,
    expiration: NaiveDateTime,
    identity: &dyn FileIdentity,
    now: NaiveDateTime,
) -> Result<Manifest> {
    let scanned = snapshot::scan(root, identity, now)?;
    let mut manifest = Manifest::new(root.to_path_buf());
    for (path, seen) in scanned {
        manifest.entries.insert(
            path,
            ManifestEntry {
                expiration,
                inode: seen.inode.to_string(),
            },
        );
    }
    Ok(manifest)
}
