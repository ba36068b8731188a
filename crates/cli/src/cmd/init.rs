//! Create a fresh manifest for a directory

use crate::cmd::Options;
use crate::util;
use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;
use sweep_core::{expiry, initialize, manifest_exists, InodeIdentity};

pub fn run(directory: &Path, opts: &Options) -> Result<()> {
    let root = util::validate_root(directory)?;

    println!("Manifest:   {}", opts.manifest_path.display());
    println!("Directory:  {}", root.display());
    println!(
        "Expiration: {}",
        expiry::format_timestamp(opts.default_expiration)
    );
    println!();

    if manifest_exists(&opts.manifest_path) {
        eprintln!(
            "Warning: manifest '{}' already exists",
            opts.manifest_path.display()
        );
        if opts.force {
            eprintln!("Overwriting due to --force");
        } else if !util::confirm("do you want to overwrite? [y/N] ")? {
            bail!("aborted");
        }
    }

    let manifest = initialize(&root, opts.default_expiration, &InodeIdentity, opts.now)
        .context("directory scan failed")?;

    println!(
        "Tracked {} entries under {}",
        manifest.entries.len().to_string().yellow(),
        root.display()
    );
    if opts.verbose {
        for path in manifest.entries.keys() {
            println!("   {path}");
        }
    }

    if opts.dry_run {
        println!();
        println!("{}", "** dry run - manifest not written **".dimmed());
        return Ok(());
    }

    manifest
        .store(&opts.manifest_path)
        .context("failed to write manifest")?;
    println!("{}", "Manifest written".green().bold());
    Ok(())
}
