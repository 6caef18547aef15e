//! Error types for the command line tools.

use thiserror::Error;
use view360_data::{MeshError, PlyError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("PLY loading error: {0}")]
    Ply(#[from] PlyError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
