//! Storage backends the controller applies decisions through

mod mover;

pub use mover::SafeMover;

use crate::error::{FilerError, MoveError, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// The two operations the controller needs from a storage backend.
///
/// `filename` is a bare name relative to the backend's source directory.
pub trait FileOperations: Send + Sync + fmt::Debug {
    /// Moves the file to the destination, or leaves it in place when there is none
    fn keep(&self, filename: &str) -> Result<()>;

    /// Removes the file from the source directory
    fn delete(&self, filename: &str) -> Result<()>;
}

/// Local-disk backend
#[derive(Debug)]
pub struct LocalFileSystem {
    source: PathBuf,
    target: Option<PathBuf>,
    mover: SafeMover,
}

impl LocalFileSystem {
    /// Creates the backend, creating `target` (and its parents) if needed
    pub fn new(source: impl Into<PathBuf>, target: Option<PathBuf>) -> Result<Self> {
        if let Some(ref dir) = target {
            fs::create_dir_all(dir).map_err(|source| FilerError::TargetCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(Self {
            source: source.into(),
            target,
            mover: SafeMover::default(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_mover(mut self, mover: SafeMover) -> Self {
        self.mover = mover;
        self
    }
}

impl FileOperations for LocalFileSystem {
    fn keep(&self, filename: &str) -> Result<()> {
        let Some(ref target) = self.target else {
            debug!(file = filename, "no target configured, leaving file in place");
            return Ok(());
        };

        let from = self.source.join(filename);
        let to = target.join(filename);

        if to.exists() {
            warn!(dest = %to.display(), "destination exists and will be replaced");
        }

        self.mover.move_file(&from, &to)?;
        info!(file = filename, dest = %to.display(), "kept file");
        Ok(())
    }

    fn delete(&self, filename: &str) -> Result<()> {
        let path = self.source.join(filename);
        fs::remove_file(&path).map_err(|source| FilerError::Delete {
            path: path.clone(),
            source,
        })?;
        info!(file = filename, "deleted file");
        Ok(())
    }
}

/// Backend that only reports what it would do
#[derive(Debug)]
pub struct DryRunFileSystem {
    source: PathBuf,
    target: Option<PathBuf>,
}

impl DryRunFileSystem {
    pub fn new(source: impl Into<PathBuf>, target: Option<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target,
        }
    }
}

impl FileOperations for DryRunFileSystem {
    // Mirrors LocalFileSystem: only a real move can miss its source
    fn keep(&self, filename: &str) -> Result<()> {
        let Some(ref target) = self.target else {
            info!(file = filename, "dry-run: would leave file in place");
            return Ok(());
        };

        let from = self.source.join(filename);
        if !from.exists() {
            return Err(MoveError::SourceNotFound(from).into());
        }

        info!(
            from = %from.display(),
            to = %target.join(filename).display(),
            "dry-run: would move file"
        );
        Ok(())
    }

    fn delete(&self, filename: &str) -> Result<()> {
        let path = self.source.join(filename);
        if !path.exists() {
            return Err(FilerError::Delete {
                path,
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }

        info!(path = %path.display(), "dry-run: would delete file");
        Ok(())
    }
}
