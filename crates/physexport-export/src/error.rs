//! Fatal export errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to move finished document into place at {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output path has no file name: {}", .0.display())]
    InvalidOutputPath(PathBuf),
}

pub type ExportResult<T> = Result<T, ExportError>;
