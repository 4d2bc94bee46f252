//! Pipeline orchestration: scan, group, move, clean, report.
//!
//! [`organize`] runs the whole pipeline against a root directory and
//! reports progress through a caller-supplied event callback, so the
//! core never prints; the CLI layer decides how events are rendered.

use crate::cleanup::{CleanOutcome, clean_empty_dirs};
use crate::config::FileFilter;
use crate::extension::{ExtensionKey, group_by_extension};
use crate::file_mover::Mover;
use crate::scanner::scan_files;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fatal errors. Everything else the pipeline encounters is converted to
/// an event plus a counter and the run continues.
#[derive(Debug)]
pub enum OrganizeError {
    /// The root is missing or not a directory. Raised before any mutation.
    NotADirectory { path: PathBuf },
    /// The root exists but cannot be read.
    Unreadable { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotADirectory { path } => {
                write!(f, "'{}' is not a valid directory", path.display())
            }
            Self::Unreadable { path, source } => {
                write!(f, "cannot read directory '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotADirectory { .. } => None,
            Self::Unreadable { source, .. } => Some(source),
        }
    }
}

/// Result type for pipeline operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Progress notifications emitted while a run executes.
#[derive(Debug, Clone)]
pub enum OrganizeEvent {
    /// The scan finished; the move phase covers this many files.
    ScanCompleted { files_found: usize },
    /// The scan found nothing; the run ends here.
    NothingToDo,
    /// A group's move phase begins.
    GroupStarted { key: ExtensionKey, files: usize },
    /// The group's destination folder could not be created; every file in
    /// it is counted as an error and the next group proceeds.
    GroupFailed {
        key: ExtensionKey,
        files: usize,
        reason: String,
    },
    /// One file was relocated (or would be, in a dry run).
    FileMoved {
        source: PathBuf,
        destination: PathBuf,
    },
    /// The file already sits in its destination folder; nothing to do.
    FileSkipped { path: PathBuf },
    /// The file could not be moved and stays where it was.
    FileFailed { path: PathBuf, reason: String },
    /// An empty directory was deleted during cleanup.
    DirectoryRemoved { path: PathBuf },
}

/// Aggregate counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Files relocated (planned relocations in a dry run).
    pub moved: usize,
    /// Files already in place.
    pub skipped: usize,
    /// Files that could not be moved, including whole failed groups.
    pub errors: usize,
    /// Empty directories deleted during cleanup.
    pub removed_dirs: usize,
}

/// Knobs for one run.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrganizeOptions {
    /// Resolve every move without touching the filesystem.
    pub dry_run: bool,
}

/// Runs the full pipeline: validate the root, scan, group by extension,
/// move group by group, then clean up empty directories.
///
/// Cleanup always runs after the move phase, even when groups reported
/// errors; a partial run still leaves empty directories worth removing.
/// Dry runs skip cleanup, since emptiness after hypothetical moves is
/// not observable.
pub fn organize<F>(
    root: &Path,
    filter: &FileFilter,
    options: &OrganizeOptions,
    mut on_event: F,
) -> OrganizeResult<RunStats>
where
    F: FnMut(OrganizeEvent),
{
    let root = validate_root(root)?;

    let files = scan_files(&root, filter);
    on_event(OrganizeEvent::ScanCompleted {
        files_found: files.len(),
    });
    if files.is_empty() {
        on_event(OrganizeEvent::NothingToDo);
        return Ok(RunStats::default());
    }

    let groups = group_by_extension(files);
    let mut stats = RunStats::default();
    let mut mover = Mover::new(&root, options.dry_run);
    for (key, members) in &groups {
        let outcome = mover.move_group(key, members, &mut on_event);
        stats.moved += outcome.moved;
        stats.skipped += outcome.skipped;
        stats.errors += outcome.errors;
    }

    if !options.dry_run {
        let preserved: HashSet<&str> = groups.keys().map(|k| k.as_str()).collect();
        for (path, outcome) in clean_empty_dirs(&root, &preserved, filter) {
            if outcome == CleanOutcome::Removed {
                stats.removed_dirs += 1;
                on_event(OrganizeEvent::DirectoryRemoved { path });
            }
        }
    }

    Ok(stats)
}

/// The root must exist, be a directory and be readable; anything else is
/// fatal before the first mutation. The canonical path is used for the
/// rest of the run so parent comparisons stay exact.
fn validate_root(path: &Path) -> OrganizeResult<PathBuf> {
    let metadata = fs::metadata(path).map_err(|_| OrganizeError::NotADirectory {
        path: path.to_path_buf(),
    })?;
    if !metadata.is_dir() {
        return Err(OrganizeError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    // Readability probe before committing to the run.
    fs::read_dir(path).map_err(|source| OrganizeError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    fs::canonicalize(path).map_err(|source| OrganizeError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}
