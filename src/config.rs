//! Filter configuration.
//!
//! Controls which files the scanner hands to the organizing pipeline.
//! Rules are loaded from a TOML file and compiled once into matcher
//! structures before the run:
//!
//! ```toml
//! [filters]
//! include_hidden = false
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["tmp"]
//! regex = []
//!
//! [filters.include]
//! patterns = [".keepme"]
//! ```
//!
//! Discovery order: an explicit `--config` path, then `.tidyext.toml`
//! inside the directory being organized, then
//! `$HOME/.config/tidyext/config.toml`, then built-in defaults (hidden
//! files excluded, nothing else filtered).

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory config file.
const LOCAL_CONFIG_NAME: &str = ".tidyext.toml";

/// Errors raised while loading or compiling filter rules.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    NotFound(PathBuf),
    /// The file exists but is not valid TOML for this schema.
    Invalid(String),
    /// A glob pattern failed to compile.
    BadGlob(String),
    /// A regex pattern failed to compile.
    BadRegex { pattern: String, reason: String },
    /// The file could not be read.
    Io(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => {
                write!(f, "config file not found: {}", path.display())
            }
            ConfigError::Invalid(reason) => write!(f, "invalid config: {}", reason),
            ConfigError::BadGlob(pattern) => write!(f, "invalid glob pattern '{}'", pattern),
            ConfigError::BadRegex { pattern, reason } => {
                write!(f, "invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::Io(reason) => write!(f, "could not read config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Root of the TOML schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub filters: FilterRules,
}

/// Filtering rules as written in the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Organize dotfiles too. Off by default, which also keeps the
    /// scanner out of hidden directories entirely.
    #[serde(default)]
    pub include_hidden: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    #[serde(default)]
    pub include: IncludeRules,
}

/// Files to leave in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names, e.g. `"Thumbs.db"`.
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the path relative to the root.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions without the dot, matched case-insensitively.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Whitelist overrides: a file matching one of these globs is always
/// organized, even when an exclude rule (or the hidden-file default)
/// would leave it in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FilterConfig {
    /// Loads the config for a run, falling back to defaults when no file
    /// is found. An explicit path that does not exist is an error; the
    /// discovered locations are simply skipped when absent.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::read_file(path);
        }

        let local = root.join(LOCAL_CONFIG_NAME);
        if local.is_file() {
            return Self::read_file(&local);
        }

        if let Ok(home) = std::env::var("HOME") {
            let user = PathBuf::from(home)
                .join(".config")
                .join("tidyext")
                .join("config.toml");
            if user.is_file() {
                return Self::read_file(&user);
            }
        }

        Ok(Self::default())
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&text).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Compiles the rules into matcher structures, validating every glob
    /// and regex pattern up front.
    pub fn compile(self) -> Result<FileFilter, ConfigError> {
        FileFilter::new(self.filters)
    }
}

/// Compiled filter rules, ready for per-path checks.
pub struct FileFilter {
    include_hidden: bool,
    excluded_names: HashSet<String>,
    excluded_extensions: HashSet<String>,
    excluded_globs: Vec<Pattern>,
    excluded_regexes: Vec<Regex>,
    included_globs: Vec<Pattern>,
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|_| ConfigError::BadGlob(p.clone())))
        .collect()
}

impl FileFilter {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let excluded_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::BadRegex {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_hidden: rules.include_hidden,
            excluded_names: rules.exclude.filenames.into_iter().collect(),
            excluded_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            excluded_globs: compile_globs(&rules.exclude.patterns)?,
            excluded_regexes,
            included_globs: compile_globs(&rules.include.patterns)?,
        })
    }

    /// A filter built from the default rules (hidden files excluded,
    /// nothing else filtered). Cannot fail: the defaults carry no
    /// patterns to compile.
    pub fn permissive() -> Self {
        Self::new(FilterRules::default()).expect("default rules have no patterns")
    }

    /// Whether a file should be organized. `path` is relative to the
    /// directory being organized.
    ///
    /// Include patterns win over everything; after that the first
    /// matching exclude rule (hidden name, exact name, extension, glob,
    /// regex) leaves the file in place.
    pub fn should_include(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.included_globs.iter().any(|g| g.matches_path(path)) {
            return true;
        }

        if !self.include_hidden && name.starts_with('.') {
            return false;
        }

        if self.excluded_names.contains(name.as_ref()) {
            return false;
        }

        if let Some(ext) = path.extension()
            && self
                .excluded_extensions
                .contains(&ext.to_string_lossy().to_lowercase())
        {
            return false;
        }

        if self.excluded_globs.iter().any(|g| g.matches_path(path)) {
            return false;
        }

        !self.excluded_regexes.iter().any(|r| r.is_match(&name))
    }

    /// Whether traversal should enter a directory. Hidden directories are
    /// pruned whenever hidden files are excluded, keeping the organizer
    /// out of trees like `.git`.
    pub fn should_descend(&self, dir: &Path) -> bool {
        if self.include_hidden {
            return true;
        }
        !dir.file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(rules: FilterRules) -> FileFilter {
        FilterConfig { filters: rules }.compile().unwrap()
    }

    #[test]
    fn defaults_skip_hidden_files_only() {
        let filter = FileFilter::permissive();
        assert!(!filter.should_include(Path::new(".DS_Store")));
        assert!(!filter.should_include(Path::new(".tidyext.toml")));
        assert!(filter.should_include(Path::new("photo.png")));
    }

    #[test]
    fn hidden_files_pass_when_enabled() {
        let filter = compiled(FilterRules {
            include_hidden: true,
            ..Default::default()
        });
        assert!(filter.should_include(Path::new(".bashrc")));
        assert!(filter.should_descend(Path::new(".config")));
    }

    #[test]
    fn hidden_directories_are_pruned_by_default() {
        let filter = FileFilter::permissive();
        assert!(!filter.should_descend(Path::new(".git")));
        assert!(filter.should_descend(Path::new("sub")));
    }

    #[test]
    fn exact_names_and_extensions_exclude() {
        let filter = compiled(FilterRules {
            exclude: ExcludeRules {
                filenames: vec!["Thumbs.db".into()],
                extensions: vec!["tmp".into()],
                ..Default::default()
            },
            ..Default::default()
        });
        assert!(!filter.should_include(Path::new("Thumbs.db")));
        assert!(!filter.should_include(Path::new("scratch.tmp")));
        assert!(!filter.should_include(Path::new("scratch.TMP")));
        assert!(filter.should_include(Path::new("scratch.txt")));
    }

    #[test]
    fn globs_match_relative_paths() {
        let filter = compiled(FilterRules {
            exclude: ExcludeRules {
                patterns: vec!["**/node_modules/**".into(), "*.part".into()],
                ..Default::default()
            },
            ..Default::default()
        });
        assert!(!filter.should_include(Path::new("node_modules/pkg/index.js")));
        assert!(!filter.should_include(Path::new("download.part")));
        assert!(filter.should_include(Path::new("notes.txt")));
    }

    #[test]
    fn regex_matches_file_names() {
        let filter = compiled(FilterRules {
            exclude: ExcludeRules {
                regex: vec![r"^~\$".into()],
                ..Default::default()
            },
            ..Default::default()
        });
        assert!(!filter.should_include(Path::new("~$report.docx")));
        assert!(filter.should_include(Path::new("report.docx")));
    }

    #[test]
    fn include_patterns_override_excludes() {
        let filter = compiled(FilterRules {
            include: IncludeRules {
                patterns: vec![".keepme".into()],
            },
            ..Default::default()
        });
        assert!(filter.should_include(Path::new(".keepme")));
        assert!(!filter.should_include(Path::new(".other")));
    }

    #[test]
    fn bad_patterns_fail_compilation() {
        let bad_glob = FilterConfig {
            filters: FilterRules {
                exclude: ExcludeRules {
                    patterns: vec!["[unclosed".into()],
                    ..Default::default()
                },
                ..Default::default()
            },
        };
        assert!(bad_glob.compile().is_err());

        let bad_regex = FilterConfig {
            filters: FilterRules {
                exclude: ExcludeRules {
                    regex: vec!["(open".into()],
                    ..Default::default()
                },
                ..Default::default()
            },
        };
        assert!(bad_regex.compile().is_err());
    }

    #[test]
    fn parses_the_documented_schema() {
        let config: FilterConfig = toml::from_str(
            r#"
            [filters]
            include_hidden = true

            [filters.exclude]
            extensions = ["bak"]

            [filters.include]
            patterns = ["*.pdf"]
            "#,
        )
        .unwrap();
        assert!(config.filters.include_hidden);
        assert_eq!(config.filters.exclude.extensions, vec!["bak"]);
        assert_eq!(config.filters.include.patterns, vec!["*.pdf"]);
    }
}
