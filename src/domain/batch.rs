use crate::error::{FilerError, Result};

/// Fixed, ordered list of filenames under triage with a forward-only cursor.
///
/// The list is never mutated after construction. The cursor only moves
/// forward and is clamped at `total()`, so once the batch is complete it
/// stays complete.
#[derive(Debug, Clone)]
pub struct FileBatch {
    files: Vec<String>,
    cursor: usize,
}

impl FileBatch {
    /// Creates a batch over `files`. An empty list is rejected.
    pub fn new(files: Vec<String>) -> Result<Self> {
        if files.is_empty() {
            return Err(FilerError::Validation("No files to process".to_string()));
        }

        Ok(Self { files, cursor: 0 })
    }

    /// The file awaiting a decision, or `None` once every file is done
    pub fn current(&self) -> Option<&str> {
        self.files.get(self.cursor).map(String::as_str)
    }

    /// Moves past the current file. Safe to call after completion.
    pub fn advance(&mut self) {
        if self.cursor < self.files.len() {
            self.cursor += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.files.len()
    }

    /// 1-based number of the file on screen ("N of total").
    /// Equals `total()` once the batch is complete.
    pub fn progress(&self) -> usize {
        (self.cursor + 1).min(self.files.len())
    }

    pub fn total(&self) -> usize {
        self.files.len()
    }
}
