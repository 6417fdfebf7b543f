//! folder-sorter - sort a directory's files into per-category subfolders
//!
//! This library classifies files by extension through an ordered
//! [`CategoryRegistry`], moves them into `root/<category>/` with
//! [`FolderOrganizer`] while refusing to overwrite anything, and reports
//! per-category counts and per-file failures. It also carries a small JSON
//! to-do list and the TOML configuration used by the command-line tool.

pub mod category_registry;
pub mod cli;
pub mod config;
pub mod folder_organizer;
pub mod output;
pub mod report;
pub mod tasks;

pub use category_registry::{CategoryRegistry, FALLBACK_CATEGORY, RegistryError};
pub use config::{CompiledFilters, ConfigError, SorterConfig};
pub use folder_organizer::{FolderOrganizer, OrganizeError, Progress};
pub use report::{FileError, FileErrorKind, MoveRecord, Plan, RunReport, RunSummary};
pub use tasks::{Task, TaskError, TaskFilter, TaskList};

pub use cli::{Cli, run_cli};
