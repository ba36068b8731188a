//! Expiration-driven retention for scratch directories
//!
//! This crate provides:
//! - Flat-text manifest codec (path -> expiration + identity)
//! - Expiration policy parsing (`+N` days or absolute timestamps)
//! - Filesystem snapshotter (relative paths + identity numbers)
//! - Reconciler (five-way lifecycle classification)
//! - Purger (safe deletion with cascading empty-parent cleanup)
//!
//! The crate never prints, never prompts, and never exits; all reporting
//! data is returned to the caller.

pub mod error;
pub mod expiry;
pub mod identity;
pub mod init;
pub mod manifest;
pub mod purge;
pub mod reconcile;
pub mod snapshot;

// Re-exports
pub use error::{Error, Result};
pub use expiry::ExpirationPolicy;
pub use identity::{FileIdentity, InodeIdentity};
pub use init::initialize;
pub use manifest::{manifest_exists, Manifest, ManifestEntry};
pub use purge::{purge, PurgeReport, SkipReason};
pub use reconcile::{reconcile, survivors, tally, Classified, ClassifiedSet, Status, Tally};
pub use snapshot::{scan, Snapshot, SnapshotEntry};
