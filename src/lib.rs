//! tidyext - sort a directory tree by file extension.
//!
//! The pipeline scans a root directory recursively, groups every file
//! under a normalized extension key, moves each group into a folder named
//! after the key (resolving name collisions without ever overwriting),
//! and finally removes the directories the moves left empty. Progress is
//! reported through an event callback so the core never prints; the CLI
//! layer renders events and the final summary.

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod extension;
pub mod file_mover;
pub mod organizer;
pub mod output;
pub mod scanner;

pub use cleanup::CleanOutcome;
pub use config::{ConfigError, FileFilter, FilterConfig};
pub use extension::{ExtensionKey, FileGroups, NO_EXTENSION, group_by_extension};
pub use organizer::{
    OrganizeError, OrganizeEvent, OrganizeOptions, OrganizeResult, RunStats, organize,
};
