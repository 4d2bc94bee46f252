//! Console styling helpers for the CLI layer.
//!
//! Centralizes colors and the progress bar so the rest of the CLI never
//! touches escape codes directly.

use crate::organizer::RunStats;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

pub fn info(message: &str) {
    println!("{}", message.cyan());
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

pub fn plain(message: &str) {
    println!("{}", message);
}

pub fn header(text: &str) {
    println!("\n{}", text.bold());
}

/// Progress bar for the move phase, one tick per processed file.
pub fn move_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len}")
            .expect("progress bar template is valid")
            .progress_chars("█▓░"),
    );
    bar
}

/// Final summary block for a run.
pub fn summary(stats: &RunStats, dry_run: bool) {
    if dry_run {
        header("Dry run complete. No files were modified.");
    } else {
        header("Organization complete!");
    }
    println!("Total files moved: {}", stats.moved.to_string().green());
    if stats.errors > 0 {
        println!("Errors encountered: {}", stats.errors.to_string().red());
    } else {
        println!("Errors encountered: 0");
    }
    if stats.skipped > 0 {
        println!("Already in place: {}", stats.skipped);
    }
    if stats.removed_dirs > 0 {
        println!(
            "Removed {} empty director{}",
            stats.removed_dirs,
            if stats.removed_dirs == 1 { "y" } else { "ies" }
        );
    }
}
