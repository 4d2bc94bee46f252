//! Recursive file discovery.

use crate::config::FileFilter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects every file under `root` that passes the filter, including
/// files in nested subdirectories.
///
/// Unreadable entries are skipped instead of aborting the walk; only the
/// root itself is validated (by the caller) before scanning. Symbolic
/// links are not followed. The returned order is the traversal order of
/// the walk and carries no guarantee.
pub fn scan_files(root: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| !entry.file_type().is_dir() || filter.should_descend(entry.path()))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            let rel = path.strip_prefix(root).unwrap_or(path);
            filter.should_include(rel)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn finds_files_in_nested_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("top.txt"));
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        touch(&dir.path().join("a/mid.png"));
        touch(&dir.path().join("a/b/deep.pdf"));

        let mut found = scan_files(dir.path(), &FileFilter::permissive());
        found.sort();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["deep.pdf", "mid.png", "top.txt"]);
    }

    #[test]
    fn excludes_directories_themselves() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();

        assert!(scan_files(dir.path(), &FileFilter::permissive()).is_empty());
    }

    #[test]
    fn skips_hidden_files_and_hidden_trees_by_default() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join(".hidden"));
        fs::create_dir(dir.path().join(".git")).unwrap();
        touch(&dir.path().join(".git/config"));
        touch(&dir.path().join("visible.txt"));

        let found = scan_files(dir.path(), &FileFilter::permissive());
        assert_eq!(found, vec![dir.path().join("visible.txt")]);
    }
}
