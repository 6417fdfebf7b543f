//! Output formatting and styling module.
//!
//! All console output of the binary goes through [`OutputFormatter`]; the
//! library types never print on their own.

use crate::report::{FileError, Plan, RunSummary};
use crate::tasks::{TaskFilter, TaskList};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for runs
/// - Run summaries and task listings
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for a run over `total` files.
    ///
    /// The bar draws to stderr and stays hidden when stderr is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Formats a per-file line shown while a run progresses.
    pub fn moved_line(file_name: &str, category: &str) -> String {
        format!("{} {} → {}/", "✓".green(), file_name, category)
    }

    /// Formats a per-file failure line.
    pub fn failed_line(error: &FileError) -> String {
        format!("{} {}", "✗".red(), error)
    }

    /// Prints one `"<category>: <count> file(s) moved"` line per category.
    pub fn summary(summary: &RunSummary) {
        Self::header("SUMMARY");
        if summary.is_empty() {
            println!("No files moved.");
            return;
        }
        print!("{}", summary);
    }

    /// Prints the per-file failures of a run, if any.
    pub fn failures(errors: &[FileError]) {
        if errors.is_empty() {
            return;
        }
        Self::header("FAILED");
        for error in errors {
            Self::error(&error.to_string());
        }
    }

    /// Prints a dry-run plan.
    pub fn plan(plan: &Plan) {
        if plan.moves.is_empty() && plan.errors.is_empty() {
            println!("No files found to organize.");
            return;
        }

        for record in &plan.moves {
            let name = record
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if plan.collisions.contains(record) {
                println!(
                    " - {} {} {}/ {}",
                    name,
                    "→".yellow(),
                    record.category,
                    "(destination exists, would be skipped)".yellow()
                );
            } else {
                println!(" - {} → {}/", name, record.category);
            }
        }

        let summary = plan.summary();
        Self::header("DRY RUN SUMMARY");
        for (category, count) in summary.iter() {
            println!("{}: {} file(s) would be moved", category, count);
        }
        if !plan.collisions.is_empty() {
            Self::warning(&format!(
                "{} file(s) would collide with existing entries",
                plan.collisions.len()
            ));
        }
        if !plan.errors.is_empty() {
            Self::warning(&format!(
                "{} entry(ies) could not be inspected and would fail:",
                plan.errors.len()
            ));
            for error in &plan.errors {
                println!("{}", Self::failed_line(error));
            }
        }
    }

    /// Prints a numbered task listing.
    ///
    /// Numbers always refer to positions in the full list, so they stay valid
    /// for `done`, `undo` and `remove` when a filter hides some tasks.
    pub fn tasks(list: &TaskList, filter: TaskFilter) {
        if list.is_empty() {
            println!("No tasks yet.");
            return;
        }

        Self::header("TO-DO");
        let mut shown = 0;
        for (number, task) in list.filtered(filter) {
            let status = if task.done { "✓".green() } else { "✗".red() };
            println!("{}. {} [{}]", number, task.name, status);
            shown += 1;
        }
        if shown == 0 {
            println!("No matching tasks.");
        }
        println!("\n{} pending", list.pending());
    }
}
