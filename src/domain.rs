mod batch;

pub use batch::FileBatch;

use crate::error::{FilerError, Result};
use crate::filter::PatternFilter;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// What the user decided for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Delete,
    Skip,
}

/// Counts of decisions applied during the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub kept: usize,
    pub deleted: usize,
    pub skipped: usize,
}

impl Tally {
    pub fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Keep => self.kept += 1,
            Decision::Delete => self.deleted += 1,
            Decision::Skip => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.kept + self.deleted + self.skipped
    }
}

/// Options for file discovery
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Skip names starting with '.'
    pub skip_hidden: bool,
}

/// Lists the regular files directly inside `dir_path`.
///
/// # Behavior
/// - Directories are skipped (symlinks are followed for the check)
/// - Does not recurse into subdirectories
/// - Entries that cannot be read and names that are not valid UTF-8 are skipped
/// - Order is whatever the OS returns; callers sort
pub fn discover_filenames(dir_path: &Path, options: &DiscoveryOptions) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir_path).map_err(|source| FilerError::SourceUnreadable {
        path: dir_path.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();

    for entry_result in entries {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        if options.skip_hidden && file_name.starts_with('.') {
            continue;
        }

        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(_) => continue,
        };

        if metadata.is_dir() {
            continue;
        }

        names.push(file_name);
    }

    Ok(names)
}

/// Discovers, filters and sorts the files in `dir_path` and wraps them in a batch.
///
/// Fails with a validation error when nothing is left to triage.
pub fn load_batch(
    dir_path: &Path,
    options: &DiscoveryOptions,
    filter: &PatternFilter,
) -> Result<FileBatch> {
    let discovered = discover_filenames(dir_path, options)?;
    let found = discovered.len();
    let files = filter.apply(discovered);

    info!(
        source = %dir_path.display(),
        found,
        filtered = filter.is_active(),
        selected = files.len(),
        "discovered files"
    );

    FileBatch::new(files)
}
