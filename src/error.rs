use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistError {
    #[error("package.json not found at {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Failed to parse {}", path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("staging file not found at {}", path.display())]
    MissingStagingFile { path: PathBuf },

    #[error("output directory not found at {}", path.display())]
    MissingOutputDir { path: PathBuf },

    #[error("marker directory not found at {}", path.display())]
    MissingTargetDir { path: PathBuf },

    #[error("Failed to write {}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to copy {} to {}", from.display(), to.display())]
    CopyFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Never fatal: the output manifest already exists when this happens.
    #[error("Failed to delete {}", path.display())]
    DeleteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DistError {
    /// Follow-up advice for the operator, printed under the error line.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DistError::MissingStagingFile { .. } => {
                Some("Please generate the staging manifest from package.json first")
            }
            DistError::MissingOutputDir { .. } | DistError::MissingTargetDir { .. } => {
                Some("Please run the build process first to create the output directory")
            }
            _ => None,
        }
    }
}
