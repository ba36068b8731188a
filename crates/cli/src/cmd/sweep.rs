//! Reconcile a manifest against disk and purge expired entries

use crate::cmd::Options;
use crate::util;
use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use sweep_core::{
    expiry, purge, reconcile, scan, survivors, tally, ClassifiedSet, InodeIdentity, Manifest,
    PurgeReport, SkipReason, Status,
};

pub fn run(opts: &Options) -> Result<()> {
    let mut manifest = Manifest::load(&opts.manifest_path).with_context(|| {
        format!(
            "failed to read manifest '{}'",
            opts.manifest_path.display()
        )
    })?;
    if !manifest.root.is_dir() {
        bail!(
            "'{}' (from manifest) does not exist",
            manifest.root.display()
        );
    }

    println!("Manifest:   {}", opts.manifest_path.display());
    println!("Directory:  {}", manifest.root.display());
    println!(
        "Expiration for new entries: {}",
        expiry::format_timestamp(opts.default_expiration)
    );
    println!();

    let snapshot =
        scan(&manifest.root, &InodeIdentity, opts.now).context("directory scan failed")?;
    let classified = reconcile(&snapshot, &manifest.entries, opts.default_expiration, opts.now);

    let counts = tally(&classified);
    println!("new:           {}", counts.new.to_string().green());
    println!("replaced:      {}", counts.inode_changed.to_string().green());
    println!("deleted:       {}", counts.deleted.to_string().dimmed());
    println!("expired:       {}", counts.expired.to_string().red());
    println!("non-expired:   {}", counts.non_expired);
    if opts.verbose {
        println!();
        print_classified(&classified);
    }
    println!();

    if opts.dry_run {
        let report = purge(&manifest.root, &classified, true)?;
        print_report(&report, true);
        println!();
        println!("{}", "** no changes applied **".dimmed());
        return Ok(());
    }

    if !opts.force && !util::confirm("Apply changes? [y/N] ")? {
        bail!("aborted");
    }

    let report = purge(&manifest.root, &classified, false).context("purge failed")?;
    print_report(&report, false);

    manifest.entries = survivors(&classified);
    manifest
        .store(&opts.manifest_path)
        .context("failed to rewrite manifest")?;
    println!("{}", "Manifest updated".green().bold());
    Ok(())
}

fn print_classified(classified: &ClassifiedSet) {
    for (path, c) in classified {
        let label = match c.status {
            Status::New => "NEW".green().to_string(),
            Status::InodeChanged => "REPLACED".yellow().to_string(),
            Status::Deleted => "GONE".dimmed().to_string(),
            Status::Expired => "EXPIRED".red().to_string(),
            Status::NonExpired => "KEPT".to_string(),
        };
        println!(
            "   {path:<50} {label} (until {})",
            expiry::format_timestamp(c.reference)
        );
    }
}

fn print_report(report: &PurgeReport, dry_run: bool) {
    let verb = if dry_run { "Would remove" } else { "Removed" };
    println!("{verb} {} entries", report.applied().to_string().yellow());
    for path in &report.removed {
        println!("   {} {path}", "-".red());
    }
    for (path, reason) in &report.skipped {
        let why = match reason {
            SkipReason::Vanished => "already gone",
            SkipReason::NonEmptyDir => "directory not empty",
            SkipReason::UnknownFileType => "unknown file type",
        };
        println!("   {} {path} ({why})", "!".yellow());
    }
}
