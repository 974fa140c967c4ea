use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_MARKER_DIR, DEFAULT_OUT_DIR, DistConfig};
use crate::manifest::ManifestProjector;
use crate::marker::MarkerWriter;
use crate::staging::StagingCopier;

#[derive(Parser)]
#[command(name = "distpkg")]
#[command(about = "Generate the package.json shipped inside a project's dist/ directory")]
#[command(version)]
pub struct Cli {
    /// Project root containing package.json
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Build output directory, relative to the project root
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: String,

    /// Subdirectory of the output directory that gets the CommonJS marker
    #[arg(long, default_value = DEFAULT_MARKER_DIR)]
    pub marker_dir: String,

    /// Increase diagnostic output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn config(&self) -> DistConfig {
        DistConfig::new(&self.root)
            .out_dir(self.out_dir.clone())
            .marker_dir(self.marker_dir.clone())
    }
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli.config())
}

/// Stage the manifest, move it into the output directory, then write the
/// CommonJS marker. Stops at the first failure.
pub fn run(config: &DistConfig) -> Result<()> {
    tracing::debug!("project root: {}", config.root().display());

    ManifestProjector::new(config.clone())
        .build_staging()
        .context("Failed to build the distribution manifest")?;

    let report = StagingCopier::new(config.clone())
        .copy_to_output()
        .context("Failed to copy the distribution manifest")?;
    tracing::debug!(
        "output manifest at {} (staging removed: {})",
        report.destination.display(),
        report.staging_removed
    );

    MarkerWriter::new(config.clone())
        .write_marker()
        .context("Failed to write the module type marker")?;

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
