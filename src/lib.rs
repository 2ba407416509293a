//! Filer - interactive one-file-at-a-time directory triage
//!
//! This crate provides the core of the `filer` binary: the triage state
//! machine, the storage backends it drives, and the terminal presentation.

pub mod async_ops;
pub mod cli;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod filesystem;
pub mod filter;
pub mod logging;
pub mod tui;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use controller::{Command, Controller, Input, Message, OpOutcome, Phase};
pub use domain::{discover_filenames, load_batch, Decision, DiscoveryOptions, FileBatch, Tally};
pub use error::{FilerError, MoveError, Result};
pub use filesystem::{DryRunFileSystem, FileOperations, LocalFileSystem, SafeMover};
pub use filter::PatternFilter;
