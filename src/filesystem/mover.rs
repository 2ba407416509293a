//! Safe single-file move.
//! Tries an atomic rename first; when that fails (typically across devices)
//! falls back to copy, size check, then removal of the source.

use crate::error::MoveError;
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

type RenameFn = fn(&Path, &Path) -> io::Result<()>;
type CopyFn = fn(&mut File, &mut File) -> io::Result<u64>;
type RemoveFn = fn(&Path) -> io::Result<()>;

/// Moves files without ever leaving a truncated destination behind.
///
/// Each filesystem step is a plain fn pointer so tests can swap one out.
#[derive(Clone, Copy)]
pub struct SafeMover {
    rename: RenameFn,
    copy: CopyFn,
    remove_source: RemoveFn,
}

impl fmt::Debug for SafeMover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeMover").finish_non_exhaustive()
    }
}

impl Default for SafeMover {
    fn default() -> Self {
        Self {
            rename: |from, to| fs::rename(from, to),
            copy: |reader, writer| io::copy(reader, writer),
            remove_source: |path| fs::remove_file(path),
        }
    }
}

impl SafeMover {
    #[cfg(test)]
    pub(crate) fn with_rename(mut self, rename: RenameFn) -> Self {
        self.rename = rename;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_copy(mut self, copy: CopyFn) -> Self {
        self.copy = copy;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_remove_source(mut self, remove_source: RemoveFn) -> Self {
        self.remove_source = remove_source;
        self
    }

    /// Moves `from` to `to`.
    ///
    /// On success the destination holds the full file and the source is gone.
    /// On `CopyOpenFailed`, `CopyWriteFailed` and `SizeMismatch` the source is
    /// untouched and no destination is left behind. `SourceCleanupFailed`
    /// leaves a complete copy at `to` with the source still in place.
    pub fn move_file(&self, from: &Path, to: &Path) -> Result<(), MoveError> {
        match fs::metadata(from) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(MoveError::SourceNotFound(from.to_path_buf()));
            }
            _ => {}
        }

        match (self.rename)(from, to) {
            Ok(()) => {
                debug!(from = %from.display(), to = %to.display(), "renamed file");
                Ok(())
            }
            Err(e) => {
                warn!(
                    from = %from.display(),
                    to = %to.display(),
                    error = %e,
                    "rename failed, falling back to copy"
                );
                self.copy_and_remove(from, to)
            }
        }
    }

    fn copy_and_remove(&self, from: &Path, to: &Path) -> Result<(), MoveError> {
        let mut reader = File::open(from).map_err(|source| MoveError::CopyOpenFailed {
            path: from.to_path_buf(),
            source,
        })?;
        let mut writer = File::create(to).map_err(|source| MoveError::CopyOpenFailed {
            path: to.to_path_buf(),
            source,
        })?;

        let copied =
            (self.copy)(&mut reader, &mut writer).and_then(|n| writer.sync_all().map(|_| n));
        if let Err(source) = copied {
            drop(writer);
            discard_partial(to);
            return Err(MoveError::CopyWriteFailed {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            });
        }

        let sizes = reader
            .metadata()
            .and_then(|src| writer.metadata().map(|dst| (src.len(), dst.len())));
        drop(reader);
        drop(writer);

        match sizes {
            Ok((expected, actual)) if expected == actual => {}
            Ok((expected, actual)) => {
                discard_partial(to);
                return Err(MoveError::SizeMismatch {
                    from: from.to_path_buf(),
                    to: to.to_path_buf(),
                    expected,
                    actual,
                });
            }
            Err(source) => {
                discard_partial(to);
                return Err(MoveError::CopyWriteFailed {
                    from: from.to_path_buf(),
                    to: to.to_path_buf(),
                    source,
                });
            }
        }

        (self.remove_source)(from).map_err(|source| MoveError::SourceCleanupFailed {
            path: from.to_path_buf(),
            source,
        })?;

        info!(from = %from.display(), to = %to.display(), "copied file and removed source");
        Ok(())
    }
}

/// Best-effort removal of a partially written destination
fn discard_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "failed to remove partial copy");
    }
}
