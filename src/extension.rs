/// Extension-based grouping of scanned files.
///
/// Every discovered file maps to exactly one [`ExtensionKey`]: the suffix
/// after the final `.` of its file name, uppercased and without the dot.
/// Files without a suffix fall into the reserved `NO_EXTENSION` group.
/// The key doubles as the name of the destination folder for its group.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tidyext::extension::ExtensionKey;
///
/// assert_eq!(ExtensionKey::from_path(Path::new("report.PDF")).as_str(), "PDF");
/// assert_eq!(ExtensionKey::from_path(Path::new("notes.pdf")).as_str(), "PDF");
/// assert_eq!(ExtensionKey::from_path(Path::new("README")).as_str(), "NO_EXTENSION");
/// ```
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Reserved grouping key for files that have no extension.
pub const NO_EXTENSION: &str = "NO_EXTENSION";

/// A normalized extension key: uppercase, no leading dot, never empty.
///
/// The constructor is the only way to build one, so a key is always safe to
/// use as a folder name (an extension cannot contain a path separator, and
/// non-UTF-8 suffixes are normalized lossily).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtensionKey(String);

impl ExtensionKey {
    /// Derives the key for a file path.
    ///
    /// Takes the suffix after the final `.` of the file name and uppercases
    /// it; a file with no suffix (or a bare trailing dot) maps to the
    /// `NO_EXTENSION` sentinel. Multi-dot names keep only the last suffix,
    /// so `backup.tar.gz` groups under `GZ`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if !ext.is_empty() => {
                ExtensionKey(ext.to_string_lossy().to_uppercase())
            }
            _ => ExtensionKey(NO_EXTENSION.to_string()),
        }
    }

    /// The key as a folder name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the reserved key used by files without an extension.
    pub fn is_no_extension(&self) -> bool {
        self.0 == NO_EXTENSION
    }
}

impl fmt::Display for ExtensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Files grouped by extension key. Group iteration follows key order;
/// insertion order within a group follows scan order.
pub type FileGroups = BTreeMap<ExtensionKey, Vec<PathBuf>>;

/// Groups a scan result by normalized extension key.
pub fn group_by_extension(files: Vec<PathBuf>) -> FileGroups {
    let mut groups = FileGroups::new();
    for file in files {
        let key = ExtensionKey::from_path(&file);
        groups.entry(key).or_default().push(file);
    }
    groups
}
