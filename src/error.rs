//! Error types for filer

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while setting up a run or while applying a decision to a file
#[derive(Debug, Error)]
pub enum FilerError {
    #[error("Failed to read source directory {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to create target directory {}: {source}", path.display())]
    TargetCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Failed to delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failure modes of a single safe move.
///
/// Only `SourceCleanupFailed` leaves two copies behind; every other variant
/// leaves the source untouched and no partial destination.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to open {} for copying: {source}", path.display())]
    CopyOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    CopyWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "Size mismatch copying {} to {}: expected {expected} bytes, got {actual}",
        from.display(),
        to.display()
    )]
    SizeMismatch {
        from: PathBuf,
        to: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("Copied file but failed to remove source {}: {source}", path.display())]
    SourceCleanupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FilerError>;
