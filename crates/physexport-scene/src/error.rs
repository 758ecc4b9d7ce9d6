//! Scene loading and validation errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or loading a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Malformed scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),

    #[error("Node {node} references unknown parent {parent}")]
    UnknownParent { node: String, parent: String },

    #[error("Node {0} is its own parent")]
    SelfParent(String),

    #[error("Invalid value on {node}: {source}")]
    InvalidValue {
        node: String,
        #[source]
        source: physexport_core::Error,
    },
}

/// Result type alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
