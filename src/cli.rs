//! Command-line interface module.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Logging setup
//! - Organization and dry-run orchestration
//! - Task list commands

use crate::config::SorterConfig;
use crate::folder_organizer::{FolderOrganizer, Progress};
use crate::output::OutputFormatter;
use crate::tasks::{DEFAULT_TASKS_FILE, TaskFilter, TaskList};
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "folder-sorter")]
#[command(version)]
#[command(about = "Sort the files of a directory into per-category subfolders")]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Move every file of DIR into a subfolder named after its category
    Organize {
        /// Directory to organize
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Show what would be moved without touching anything
        #[arg(long)]
        dry_run: bool,

        /// Configuration file (defaults to .folder-sorter.toml if present)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// List the categories and the extensions they accept
    Categories {
        /// Configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Manage the to-do list
    Tasks {
        /// Task document
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_TASKS_FILE)]
        file: PathBuf,

        #[command(subcommand)]
        action: TaskAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// Show the tasks
    List {
        /// Only show tasks not yet done
        #[arg(long, conflicts_with = "done")]
        pending: bool,

        /// Only show finished tasks
        #[arg(long)]
        done: bool,
    },
    /// Add a task
    Add {
        /// Task name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Mark a task as done
    Done {
        /// Task number as shown by `tasks list`
        number: usize,
    },
    /// Mark a finished task as not done
    Undo {
        /// Task number as shown by `tasks list`
        number: usize,
    },
    /// Delete a task
    Remove {
        /// Task number as shown by `tasks list`
        number: usize,
    },
}

impl Cli {
    /// Installs a stderr tracing subscriber: WARN by default, DEBUG with `--verbose`.
    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Runs a parsed command.
///
/// # Examples
///
/// ```no_run
/// use folder_sorter::cli::{Cli, run_cli};
/// use clap::Parser;
///
/// let cli = Cli::parse_from(["folder-sorter", "organize", "/path/to/directory"]);
/// if let Err(e) = run_cli(cli.command) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: Command) -> Result<(), String> {
    match command {
        Command::Organize {
            dir,
            dry_run,
            config,
        } => {
            if dry_run {
                organize_directory_dry_run(&dir, config.as_deref())
            } else {
                organize_directory(&dir, config.as_deref())
            }
        }
        Command::Categories { config } => list_categories(config.as_deref()),
        Command::Tasks { file, action } => run_task_action(&file, action),
    }
}

fn build_organizer(config_path: Option<&Path>) -> Result<FolderOrganizer, String> {
    let config =
        SorterConfig::load(config_path).map_err(|e| format!("Error loading configuration: {}", e))?;
    let registry = config
        .registry()
        .map_err(|e| format!("Error building categories: {}", e))?;
    let filters = config
        .compile_filters()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    Ok(FolderOrganizer::new(registry).with_filters(filters))
}

/// Organizes the files of `base_path` and prints the outcome.
///
/// Per-file failures are printed but do not make this function fail; only
/// configuration errors and an unusable directory do.
pub fn organize_directory(base_path: &Path, config_path: Option<&Path>) -> Result<(), String> {
    let organizer = build_organizer(config_path)?;
    OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));

    let mut bar: Option<ProgressBar> = None;
    let report = organizer
        .run_observed(base_path, |progress| match progress {
            Progress::Started { total } => {
                bar = Some(OutputFormatter::create_progress_bar(total as u64));
            }
            Progress::Moved(record) => {
                if let Some(pb) = &bar {
                    let name = record
                        .source
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    pb.println(OutputFormatter::moved_line(&name, &record.category));
                    pb.inc(1);
                }
            }
            Progress::Failed(error) => {
                if let Some(pb) = &bar {
                    pb.println(OutputFormatter::failed_line(error));
                    pb.inc(1);
                }
            }
            Progress::Excluded(_) => {
                if let Some(pb) = &bar {
                    pb.inc(1);
                }
            }
        })
        .map_err(|e| e.to_string())?;

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    OutputFormatter::summary(&report.summary);
    OutputFormatter::failures(&report.errors);

    if !report.excluded.is_empty() {
        OutputFormatter::info(&format!(
            "{} file(s) left in place by filters",
            report.excluded.len()
        ));
    }

    if report.is_complete_success() {
        OutputFormatter::success(&format!(
            "Organization complete: {} file(s) moved",
            report.summary.total()
        ));
    } else {
        OutputFormatter::warning(&format!(
            "Moved {} file(s), {} could not be organized. Please review errors above.",
            report.summary.total(),
            report.errors.len()
        ));
    }

    Ok(())
}

/// Shows what organizing `base_path` would do without moving anything.
pub fn organize_directory_dry_run(
    base_path: &Path,
    config_path: Option<&Path>,
) -> Result<(), String> {
    let organizer = build_organizer(config_path)?;
    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", base_path.display()));

    let plan = organizer.plan(base_path).map_err(|e| e.to_string())?;
    OutputFormatter::plan(&plan);

    println!();
    OutputFormatter::success("Dry run complete. No files were modified.");
    Ok(())
}

fn list_categories(config_path: Option<&Path>) -> Result<(), String> {
    let organizer = build_organizer(config_path)?;
    for category in organizer.registry().categories() {
        println!("{}: {}", category.name(), category.sorted_extensions().join(" "));
    }
    println!(
        "{}: (anything else)",
        crate::category_registry::FALLBACK_CATEGORY
    );
    Ok(())
}

fn run_task_action(file: &Path, action: TaskAction) -> Result<(), String> {
    let mut list = TaskList::load(file).map_err(|e| e.to_string())?;

    match action {
        TaskAction::List { pending, done } => {
            let filter = if pending {
                TaskFilter::Pending
            } else if done {
                TaskFilter::Done
            } else {
                TaskFilter::All
            };
            OutputFormatter::tasks(&list, filter);
        }
        TaskAction::Add { name } => {
            let number = list.add(&name.join(" ")).map_err(|e| e.to_string())?;
            list.save(file).map_err(|e| e.to_string())?;
            OutputFormatter::success(&format!("Task {} added", number));
        }
        TaskAction::Done { number } => {
            let name = list
                .complete(number)
                .map_err(|e| e.to_string())?
                .name
                .clone();
            list.save(file).map_err(|e| e.to_string())?;
            OutputFormatter::success(&format!("Task {} marked as done: {}", number, name));
        }
        TaskAction::Undo { number } => {
            let name = list
                .reopen(number)
                .map_err(|e| e.to_string())?
                .name
                .clone();
            list.save(file).map_err(|e| e.to_string())?;
            OutputFormatter::success(&format!("Task {} marked as not done: {}", number, name));
        }
        TaskAction::Remove { number } => {
            let task = list.remove(number).map_err(|e| e.to_string())?;
            list.save(file).map_err(|e| e.to_string())?;
            OutputFormatter::success(&format!("Task {} removed: {}", number, task.name));
        }
    }

    Ok(())
}
