use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{DistConfig, OUTPUT_MANIFEST, STAGING_MANIFEST};
use crate::error::DistError;

/// Outcome of relocating the staging manifest.
#[derive(Debug)]
pub struct CopyReport {
    pub destination: PathBuf,
    /// `false` when the staging file could not be deleted after the copy.
    pub staging_removed: bool,
}

pub struct StagingCopier {
    config: DistConfig,
}

impl StagingCopier {
    pub fn new(config: DistConfig) -> Self {
        Self { config }
    }

    pub fn copy_to_output(&self) -> Result<CopyReport, DistError> {
        let staging_path = self.config.staging_path();
        let out_dir = self.config.out_dir_path();
        let destination = self.config.output_manifest_path();

        println!(
            "\nCopying {} to {}/{}...",
            STAGING_MANIFEST,
            self.config.out_dir_name(),
            OUTPUT_MANIFEST
        );

        if !staging_path.exists() {
            return Err(DistError::MissingStagingFile { path: staging_path });
        }

        if !out_dir.is_dir() {
            return Err(DistError::MissingOutputDir { path: out_dir });
        }

        copy_with_times(&staging_path, &destination).map_err(|source| DistError::CopyFailure {
            from: staging_path.clone(),
            to: destination.clone(),
            source,
        })?;

        println!("✓ Successfully copied to {}", destination.display());

        let staging_removed = report_cleanup(&staging_path, fs::remove_file(&staging_path));

        Ok(CopyReport {
            destination,
            staging_removed,
        })
    }
}

/// Copy contents and permissions, then carry over the access and
/// modification times.
fn copy_with_times(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from)?;
    fs::copy(from, to)?;

    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    // The copy inherits the staging file's mode, which may be read-only.
    open_for_times(to)?.set_times(times)?;

    tracing::debug!("copied {} -> {}", from.display(), to.display());
    Ok(())
}

#[cfg(not(windows))]
fn open_for_times(path: &Path) -> io::Result<File> {
    File::open(path)
}

#[cfg(windows)]
fn open_for_times(path: &Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    const FILE_WRITE_ATTRIBUTES: u32 = 0x0100;
    File::options().access_mode(FILE_WRITE_ATTRIBUTES).open(path)
}

/// Failing to delete the staging file is only a warning: the output manifest
/// is already in place.
fn report_cleanup(staging_path: &Path, removed: io::Result<()>) -> bool {
    match removed {
        Ok(()) => {
            println!("✓ Deleted temporary file {}", staging_path.display());
            true
        }
        Err(source) => {
            let err = DistError::DeleteFailure {
                path: staging_path.to_path_buf(),
                source,
            };
            eprintln!("Warning: {}: {}", err, io_cause(&err));
            tracing::debug!("leaving {} in place", staging_path.display());
            false
        }
    }
}

fn io_cause(err: &DistError) -> String {
    std::error::Error::source(err)
        .map(|source| source.to_string())
        .unwrap_or_default()
}
