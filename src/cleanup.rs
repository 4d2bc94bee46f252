//! Empty-directory removal after the move phase.

use crate::config::FileFilter;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What happened to one directory during cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    /// Empty and deleted.
    Removed,
    /// Named after one of this run's destination folders; never touched.
    KeptDestination,
    /// Still contains entries.
    KeptNonEmpty,
    /// Could not be inspected or deleted (race, permissions); left alone.
    Failed(String),
}

/// Walks the tree bottom-up and removes directories that are empty and
/// not named after a destination key, at any depth. Children are visited
/// before their parents, so a chain of nested empty directories
/// disappears in a single pass. Non-empty directories are never
/// recursed-deleted, and a directory that cannot be removed is recorded
/// and left alone rather than failing the run.
pub fn clean_empty_dirs(
    root: &Path,
    preserved: &HashSet<&str>,
    filter: &FileFilter,
) -> Vec<(PathBuf, CleanOutcome)> {
    let mut results = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_entry(|e| !e.file_type().is_dir() || filter.should_descend(e.path()));

    for entry in walker.filter_map(Result::ok) {
        if !entry.file_type().is_dir() {
            continue;
        }
        let path = entry.into_path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if preserved.contains(name.as_str()) {
            results.push((path, CleanOutcome::KeptDestination));
            continue;
        }

        let outcome = match is_empty(&path) {
            Ok(true) => match fs::remove_dir(&path) {
                Ok(()) => CleanOutcome::Removed,
                Err(err) => CleanOutcome::Failed(err.to_string()),
            },
            Ok(false) => CleanOutcome::KeptNonEmpty,
            Err(err) => CleanOutcome::Failed(err.to_string()),
        };
        results.push((path, outcome));
    }
    results
}

fn is_empty(dir: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn removed(results: &[(PathBuf, CleanOutcome)]) -> Vec<&PathBuf> {
        results
            .iter()
            .filter(|(_, o)| *o == CleanOutcome::Removed)
            .map(|(p, _)| p)
            .collect()
    }

    #[test]
    fn removes_nested_empty_chain_in_one_pass() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();

        let results = clean_empty_dirs(dir.path(), &HashSet::new(), &FileFilter::permissive());

        assert_eq!(removed(&results).len(), 3);
        assert!(!dir.path().join("a").exists());
    }

    #[test]
    fn keeps_destination_folders_even_when_empty() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("TXT")).unwrap();
        fs::create_dir(dir.path().join("stale")).unwrap();

        let preserved: HashSet<&str> = ["TXT"].into_iter().collect();
        let results = clean_empty_dirs(dir.path(), &preserved, &FileFilter::permissive());

        assert!(dir.path().join("TXT").exists());
        assert!(!dir.path().join("stale").exists());
        assert!(results
            .iter()
            .any(|(p, o)| p.ends_with("TXT") && *o == CleanOutcome::KeptDestination));
    }

    #[test]
    fn never_touches_non_empty_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("full")).unwrap();
        fs::write(dir.path().join("full/keep.txt"), "x").unwrap();

        let results = clean_empty_dirs(dir.path(), &HashSet::new(), &FileFilter::permissive());

        assert!(dir.path().join("full/keep.txt").exists());
        assert!(results
            .iter()
            .any(|(p, o)| p.ends_with("full") && *o == CleanOutcome::KeptNonEmpty));
    }

    #[test]
    fn hidden_trees_are_left_alone_by_default() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();

        let results = clean_empty_dirs(dir.path(), &HashSet::new(), &FileFilter::permissive());

        assert!(dir.path().join(".cache").exists());
        assert!(results.is_empty());
    }
}
