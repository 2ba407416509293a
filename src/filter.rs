//! Regex filename filter

use crate::error::{FilerError, Result};
use regex::Regex;

/// Keeps filenames matching an optional pattern and sorts them by name.
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    regex: Option<Regex>,
}

impl PatternFilter {
    /// Compiles `pattern`. `None` or an empty string keeps every file.
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let regex = match pattern {
            Some(p) if !p.is_empty() => {
                Some(Regex::new(p).map_err(|source| FilerError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })?)
            }
            _ => None,
        };

        Ok(Self { regex })
    }

    pub fn is_active(&self) -> bool {
        self.regex.is_some()
    }

    /// Checks a single name. The match is a search, so anchors must be explicit.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.as_ref().map_or(true, |re| re.is_match(name))
    }

    /// Filters `names` and returns them in lexicographic order
    pub fn apply(&self, names: Vec<String>) -> Vec<String> {
        let mut kept: Vec<String> = names.into_iter().filter(|n| self.matches(n)).collect();
        kept.sort();
        kept
    }
}
