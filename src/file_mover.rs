/// Conflict-safe relocation of grouped files into their extension folders.
///
/// For each group the mover ensures a destination folder named after the
/// group's key exists directly under the root, then relocates every member
/// file into it. A file already sitting directly inside its destination
/// folder is skipped. A name collision is resolved by appending `_<N>`
/// before the extension until an unused name is found, so no existing file
/// is ever overwritten. Failures are confined: a folder that cannot be
/// created errors its whole group and no other, and a file that cannot be
/// moved errors only itself.
use crate::extension::ExtensionKey;
use crate::organizer::OrganizeEvent;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Per-group counters, folded into the run statistics by the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupOutcome {
    pub moved: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Moves files group by group, remembering every destination it has
/// handed out so that collision resolution also works in dry-run mode,
/// where nothing ever lands on disk.
pub struct Mover<'a> {
    root: &'a Path,
    dry_run: bool,
    claimed: HashSet<PathBuf>,
}

impl<'a> Mover<'a> {
    pub fn new(root: &'a Path, dry_run: bool) -> Self {
        Self {
            root,
            dry_run,
            claimed: HashSet::new(),
        }
    }

    /// Relocates one group into `<root>/<key>/`, emitting an event per
    /// file. Files are processed independently; the group only fails as a
    /// whole when its destination folder cannot be created.
    pub fn move_group(
        &mut self,
        key: &ExtensionKey,
        files: &[PathBuf],
        on_event: &mut dyn FnMut(OrganizeEvent),
    ) -> GroupOutcome {
        let dest_dir = self.root.join(key.as_str());
        on_event(OrganizeEvent::GroupStarted {
            key: key.clone(),
            files: files.len(),
        });

        if let Err(err) = self.ensure_destination(&dest_dir) {
            on_event(OrganizeEvent::GroupFailed {
                key: key.clone(),
                files: files.len(),
                reason: err.to_string(),
            });
            return GroupOutcome {
                errors: files.len(),
                ..Default::default()
            };
        }

        let mut outcome = GroupOutcome::default();
        for file in files {
            // Already organized: directly inside its own extension folder.
            if file.parent() == Some(dest_dir.as_path()) {
                outcome.skipped += 1;
                on_event(OrganizeEvent::FileSkipped { path: file.clone() });
                continue;
            }

            let Some(name) = file.file_name() else {
                outcome.errors += 1;
                on_event(OrganizeEvent::FileFailed {
                    path: file.clone(),
                    reason: "file has no name component".to_string(),
                });
                continue;
            };

            let dest = self.resolve_destination(&dest_dir, file, name);
            match self.relocate(file, &dest) {
                Ok(()) => {
                    self.claimed.insert(dest.clone());
                    outcome.moved += 1;
                    on_event(OrganizeEvent::FileMoved {
                        source: file.clone(),
                        destination: dest,
                    });
                }
                Err(err) => {
                    outcome.errors += 1;
                    on_event(OrganizeEvent::FileFailed {
                        path: file.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        outcome
    }

    /// Idempotent destination-folder creation. In dry-run mode nothing is
    /// created, but a regular file squatting on the folder name still
    /// fails the group, mirroring what a real run would hit.
    fn ensure_destination(&self, dir: &Path) -> io::Result<()> {
        if self.dry_run {
            if dir.exists() && !dir.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "a file occupies the destination folder name",
                ));
            }
            return Ok(());
        }
        fs::create_dir_all(dir)
    }

    /// `<dest_dir>/<name>`, renamed with `_<N>` before the extension until
    /// the name is unused on disk and unclaimed by this run.
    fn resolve_destination(
        &self,
        dest_dir: &Path,
        file: &Path,
        name: &std::ffi::OsStr,
    ) -> PathBuf {
        let mut candidate = dest_dir.join(name);
        let mut counter = 1;
        while self.is_taken(&candidate) {
            candidate = dest_dir.join(numbered_name(file, counter));
            counter += 1;
        }
        candidate
    }

    fn is_taken(&self, candidate: &Path) -> bool {
        self.claimed.contains(candidate) || candidate.exists()
    }

    /// Rename first; fall back to copy+delete when the rename fails
    /// (typically a filesystem boundary).
    fn relocate(&self, src: &Path, dest: &Path) -> io::Result<()> {
        if self.dry_run {
            return Ok(());
        }
        match fs::rename(src, dest) {
            Ok(()) => Ok(()),
            Err(_) => {
                fs::copy(src, dest)?;
                if let Err(err) = fs::remove_file(src) {
                    // Roll back the copy so the file is not duplicated.
                    let _ = fs::remove_file(dest);
                    return Err(err);
                }
                Ok(())
            }
        }
    }
}

/// Collision name for attempt `n`: the original stem with `_<n>` appended,
/// keeping the original suffix (and its case) intact. `report.pdf`
/// becomes `report_1.pdf`; an extensionless `README` becomes `README_1`.
fn numbered_name(file: &Path, n: u32) -> String {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    match file.extension() {
        Some(ext) if !ext.is_empty() => format!("{}_{}.{}", stem, n, ext.to_string_lossy()),
        _ => format!("{}_{}", stem, n),
    }
}
