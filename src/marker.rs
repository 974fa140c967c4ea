use serde::Serialize;
use std::path::PathBuf;

use crate::config::{DistConfig, OUTPUT_MANIFEST};
use crate::error::DistError;
use crate::manifest::write_json;

pub const LEGACY_MODULE_TYPE: &str = "commonjs";

/// `{"type": "commonjs"}`, dropped into a subtree so Node treats its `.js`
/// files as CommonJS regardless of the enclosing package's `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleTypeMarker {
    #[serde(rename = "type")]
    pub module_type: &'static str,
}

impl Default for ModuleTypeMarker {
    fn default() -> Self {
        Self {
            module_type: LEGACY_MODULE_TYPE,
        }
    }
}

pub struct MarkerWriter {
    config: DistConfig,
}

impl MarkerWriter {
    pub fn new(config: DistConfig) -> Self {
        Self { config }
    }

    pub fn write_marker(&self) -> Result<PathBuf, DistError> {
        let marker_dir = self.config.marker_dir_path();

        println!(
            "\nCreating {} in {}/{}...",
            OUTPUT_MANIFEST,
            self.config.out_dir_name(),
            self.config.marker_dir_name()
        );

        if !marker_dir.is_dir() {
            return Err(DistError::MissingTargetDir { path: marker_dir });
        }

        let marker_path = self.config.marker_path();
        write_json(&marker_path, &ModuleTypeMarker::default())?;

        println!("✓ Successfully created {}", marker_path.display());

        Ok(marker_path)
    }
}
