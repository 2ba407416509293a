// CLI module for argument parsing and configuration

use crate::config::UserConfig;
use crate::filter::PatternFilter;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Filer - triage a directory one file at a time
///
/// Keep (optionally moving to a target directory), delete or skip each file.
#[derive(Parser, Debug, Clone)]
#[command(name = "filer")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to scan for files
    #[arg(short = 's', long = "source", default_value = ".")]
    pub source: PathBuf,

    /// Directory kept files are moved into
    ///
    /// Created (with parents) if missing. Without it, kept files stay put.
    #[arg(short = 't', long = "target")]
    pub target: Option<PathBuf>,

    /// Only triage files whose name matches this regex
    ///
    /// The match is a search: use ^ and $ to anchor. Example: --pattern '\.jpe?g$'
    #[arg(short = 'p', long = "pattern")]
    pub pattern: Option<String>,

    /// Dry run mode - show what would happen without touching any file
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Ask for confirmation before each delete
    #[arg(long = "confirm-delete", action = ArgAction::SetTrue)]
    pub confirm_delete: bool,

    /// Ignore hidden files (names starting with .)
    #[arg(long = "skip-hidden", action = ArgAction::SetTrue)]
    pub skip_hidden: bool,

    /// Write logs to this file
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.source.exists() {
            return Err(format!(
                "Directory does not exist: {}",
                self.source.display()
            ));
        }

        if !self.source.is_dir() {
            return Err(format!(
                "Path is not a directory: {}",
                self.source.display()
            ));
        }

        if let Some(ref target) = self.target {
            if target.exists() && !target.is_dir() {
                return Err(format!(
                    "Target is not a directory: {}",
                    target.display()
                ));
            }
        }

        if let Some(ref pattern) = self.pattern {
            PatternFilter::new(Some(pattern)).map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}

/// Configuration for one run, built once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: PathBuf,
    pub target: Option<PathBuf>,
    pub pattern: Option<String>,
    pub dry_run: bool,
    pub confirm_delete: bool,
    pub skip_hidden: bool,
    pub log_file: Option<PathBuf>,
    pub verbose: u8,
}

impl AppConfig {
    /// Combines flags with the user config; flags win
    pub fn resolve(args: Args, user: &UserConfig) -> Self {
        AppConfig {
            source: args.source,
            target: args.target.or_else(|| user.target.clone()),
            pattern: args.pattern.or_else(|| user.pattern.clone()),
            dry_run: args.dry_run,
            confirm_delete: args.confirm_delete || user.confirm_delete,
            skip_hidden: args.skip_hidden || user.skip_hidden,
            log_file: args.log_file.or_else(|| user.log_file.clone()),
            verbose: args.verbose,
        }
    }
}
