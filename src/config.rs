use std::path::{Path, PathBuf};

pub const SOURCE_MANIFEST: &str = "package.json";
pub const STAGING_MANIFEST: &str = "package.dist.json";
pub const OUTPUT_MANIFEST: &str = "package.json";
pub const DEFAULT_OUT_DIR: &str = "dist";
pub const DEFAULT_MARKER_DIR: &str = "cjs";

/// Paths the pipeline operates on. Every component takes one of these
/// instead of looking at the current directory itself.
#[derive(Debug, Clone)]
pub struct DistConfig {
    root: PathBuf,
    out_dir: String,
    marker_dir: String,
}

impl DistConfig {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            out_dir: DEFAULT_OUT_DIR.to_string(),
            marker_dir: DEFAULT_MARKER_DIR.to_string(),
        }
    }

    pub fn out_dir(mut self, out_dir: impl Into<String>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn marker_dir(mut self, marker_dir: impl Into<String>) -> Self {
        self.marker_dir = marker_dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the output directory, as it appears in manifest path prefixes.
    pub fn out_dir_name(&self) -> &str {
        &self.out_dir
    }

    pub fn marker_dir_name(&self) -> &str {
        &self.marker_dir
    }

    pub fn source_path(&self) -> PathBuf {
        self.root.join(SOURCE_MANIFEST)
    }

    pub fn staging_path(&self) -> PathBuf {
        self.root.join(STAGING_MANIFEST)
    }

    pub fn out_dir_path(&self) -> PathBuf {
        self.root.join(&self.out_dir)
    }

    pub fn output_manifest_path(&self) -> PathBuf {
        self.out_dir_path().join(OUTPUT_MANIFEST)
    }

    pub fn marker_dir_path(&self) -> PathBuf {
        self.out_dir_path().join(&self.marker_dir)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.marker_dir_path().join(OUTPUT_MANIFEST)
    }
}

impl Default for DistConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
