pub mod config;
pub mod error;
pub mod rewrite;
pub mod manifest;
pub mod staging;
pub mod marker;
pub mod cli;

pub use config::DistConfig;
pub use error::DistError;
pub use manifest::{DistManifest, ManifestProjector};
