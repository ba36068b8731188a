//! File identity capability
//!
//! Inode numbers are how silent file replacement is detected: same path,
//! different inode means the tracked entry was recreated. The trait keeps
//! the reconciler independent of the identity strategy so filesystems
//! without stable inodes can substitute another source (e.g. a content
//! hash) without touching classification logic.

use std::fs::Metadata;
use std::io;
use std::path::Path;

/// Source of identity numbers for filesystem entries
pub trait FileIdentity {
    /// Identity of the entry at `path`, given its lstat metadata
    fn file_id(&self, path: &Path, meta: &Metadata) -> io::Result<u64>;
}

/// Platform inode identity (lstat semantics: symlinks report the link
/// itself, not the target)
#[derive(Debug, Default, Clone, Copy)]
pub struct InodeIdentity;

impl FileIdentity for InodeIdentity {
    #[cfg(unix)]
    fn file_id(&self, _path: &Path, meta: &Metadata) -> io::Result<u64> {
        use std::os::unix::fs::MetadataExt;
        Ok(meta.ino())
    }

    #[cfg(not(unix))]
    fn file_id(&self, _path: &Path, _meta: &Metadata) -> io::Result<u64> {
        // No stable inode concept here; every entry shares one identity,
        // which disables replacement detection but keeps classification
        // total.
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn inode_identity_matches_metadata() {
        use std::os::unix::fs::MetadataExt;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, b"x").unwrap();

        let meta = fs::symlink_metadata(&file).unwrap();
        let id = InodeIdentity.file_id(&file, &meta).unwrap();
        assert_eq!(id, meta.ino());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_identity_is_the_link_not_the_target() {
        use std::os::unix::fs::MetadataExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target.txt");
        let link = dir.path().join("link");
        fs::write(&target, b"x").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let link_meta = fs::symlink_metadata(&link).unwrap();
        let target_meta = fs::symlink_metadata(&target).unwrap();
        let link_id = InodeIdentity.file_id(&link, &link_meta).unwrap();
        assert_eq!(link_id, link_meta.ino());
        assert_ne!(link_id, target_meta.ino());
    }
}
