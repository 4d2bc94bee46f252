//! Command-line interface: argument parsing, the confirmation prompt,
//! and rendering of pipeline events.

use crate::config::FilterConfig;
use crate::organizer::{OrganizeEvent, OrganizeOptions, organize};
use crate::output;
use clap::{Parser, ValueHint};
use colored::*;
use indicatif::ProgressBar;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Sort the files of a directory tree into folders named after their
/// extension.
#[derive(Parser, Debug)]
#[command(version, about = "Sort files into folders named after their extension")]
pub struct Args {
    /// Directory to organize. Defaults to the current directory.
    #[arg(value_name = "DIRECTORY", value_hint = ValueHint::DirPath)]
    pub directory: Option<PathBuf>,

    /// Show what would be moved without modifying anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Path to a filter configuration file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

pub fn parse() -> Args {
    Args::parse()
}

/// Runs the CLI: resolve the target directory, load filters, ask for
/// consent, execute the pipeline and print the summary.
pub fn run(args: Args) -> Result<(), String> {
    let requested = args.directory.clone().unwrap_or_else(|| PathBuf::from("."));
    // Canonical form for display and relative paths; the pipeline
    // re-validates the root either way.
    let root = std::fs::canonicalize(&requested).unwrap_or(requested);

    let filter = FilterConfig::load(args.config.as_deref(), &root)
        .and_then(|config| config.compile())
        .map_err(|e| e.to_string())?;

    if args.dry_run {
        output::info(&format!("Dry run: analyzing {}", root.display()));
    } else {
        output::info(&format!("Organizing contents of: {}", root.display()));
        if !args.yes && !confirm()? {
            output::plain("Operation cancelled.");
            return Ok(());
        }
    }

    let mut progress: Option<ProgressBar> = None;
    let stats = organize(
        &root,
        &filter,
        &OrganizeOptions {
            dry_run: args.dry_run,
        },
        |event| render_event(event, &root, args.dry_run, &mut progress),
    )
    .map_err(|e| e.to_string())?;

    if let Some(bar) = progress.take() {
        bar.finish_and_clear();
    }
    output::summary(&stats, args.dry_run);
    Ok(())
}

/// Yes/no prompt on stdin; only `y`/`yes` proceeds.
fn confirm() -> Result<bool, String> {
    output::plain("Files will be moved into folders named after their extension.");
    print!("Do you want to continue? (yes/no): ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .map_err(|e| e.to_string())?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn render_event(
    event: OrganizeEvent,
    root: &Path,
    dry_run: bool,
    progress: &mut Option<ProgressBar>,
) {
    match event {
        OrganizeEvent::ScanCompleted { files_found } => {
            if files_found > 0 {
                output::info(&format!(
                    "Found {} file{}",
                    files_found,
                    plural(files_found)
                ));
                *progress = Some(output::move_progress_bar(files_found as u64));
            }
        }
        OrganizeEvent::NothingToDo => {
            output::plain("No files found to organize.");
        }
        OrganizeEvent::GroupStarted { key, files } => {
            emit(
                progress,
                format!("--- {} ({} file{}) ---", key, files, plural(files)),
            );
        }
        OrganizeEvent::GroupFailed { key, files, reason } => {
            emit(
                progress,
                format!(
                    "{} could not create folder '{}': {}",
                    "✗".red(),
                    key,
                    reason
                ),
            );
            tick(progress, files as u64);
        }
        OrganizeEvent::FileMoved {
            source,
            destination,
        } => {
            let folder = destination
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let verb = if dry_run { "Would move" } else { "Moved" };
            emit(
                progress,
                format!(
                    "  {} {}: {} -> {}/",
                    "✓".green(),
                    verb,
                    file_name(&source),
                    folder
                ),
            );
            tick(progress, 1);
        }
        OrganizeEvent::FileSkipped { path } => {
            emit(
                progress,
                format!("  Skipping (already in place): {}", file_name(&path)),
            );
            tick(progress, 1);
        }
        OrganizeEvent::FileFailed { path, reason } => {
            emit(
                progress,
                format!(
                    "  {} Error moving {}: {}",
                    "✗".red(),
                    file_name(&path),
                    reason
                ),
            );
            tick(progress, 1);
        }
        OrganizeEvent::DirectoryRemoved { path } => {
            let shown = path.strip_prefix(root).unwrap_or(&path);
            emit(
                progress,
                format!("Removed empty directory: {}", shown.display()),
            );
        }
    }
}

/// Prints above the progress bar when one is active.
fn emit(progress: &Option<ProgressBar>, line: String) {
    match progress {
        Some(bar) => bar.println(line),
        None => println!("{}", line),
    }
}

fn tick(progress: &Option<ProgressBar>, n: u64) {
    if let Some(bar) = progress {
        bar.inc(n);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn directory_defaults_to_none() {
        let args = Args::parse_from(["tidyext"]);
        assert!(args.directory.is_none());
        assert!(!args.dry_run);
        assert!(!args.yes);
    }

    #[test]
    fn flags_parse() {
        let args = Args::parse_from(["tidyext", "/tmp/downloads", "--dry-run", "-y"]);
        assert_eq!(args.directory, Some(PathBuf::from("/tmp/downloads")));
        assert!(args.dry_run);
        assert!(args.yes);
    }
}
