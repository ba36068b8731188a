//! sweep - expiration-based retention for staging directories

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use sweep_core::ExpirationPolicy;

mod cmd;
mod util;

/// Track expiration dates for everything under a directory and purge
/// entries whose date has passed
#[derive(Parser)]
#[command(name = "sweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to scan; selects initialization mode and creates a fresh
    /// manifest for it
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Manifest file holding tracked paths and their expirations
    #[arg(short, long)]
    manifest: PathBuf,

    /// Expiration for new entries: +N (N days from today, at 22:00) or
    /// YYYY/MM/DD_hh:mm [default: +30]
    #[arg(short, long)]
    expiration: Option<String>,

    /// Report what would change without touching disk or manifest
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    force: bool,

    /// Print per-entry classification detail
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_target(false)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.manifest.is_dir() {
        bail!("'{}' is a directory, not a manifest file", cli.manifest.display());
    }

    let now = chrono::Local::now().naive_local();
    let policy = match &cli.expiration {
        Some(spec) => spec.parse::<ExpirationPolicy>()?,
        None => ExpirationPolicy::default(),
    };
    let default_expiration = policy.resolve_future(now)?;

    if cli.dry_run {
        println!(" *** Dry run *** no changes will be made");
    }

    let opts = cmd::Options {
        manifest_path: cli.manifest,
        default_expiration,
        now,
        dry_run: cli.dry_run,
        force: cli.force,
        verbose: cli.verbose,
    };

    match cli.directory {
        Some(directory) => cmd::init::run(&directory, &opts),
        None => cmd::sweep::run(&opts),
    }
}
