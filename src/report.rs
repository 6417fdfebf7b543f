/// Results of an organization run.
///
/// These types carry everything a run produces back to the caller: the moves
/// that happened, per-category counts, and the files that could not be moved.
/// None of them is persisted.
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// A single file relocation, performed or planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Where the file was before the run.
    pub source: PathBuf,
    /// Where the file ends up.
    pub destination: PathBuf,
    /// The category the file was sorted into.
    pub category: String,
}

/// Per-category move counts, kept in the order categories were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    counts: Vec<(String, usize)>,
}

impl RunSummary {
    /// Creates an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more file for `category`.
    pub fn record(&mut self, category: &str) {
        match self.counts.iter_mut().find(|(name, _)| name == category) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((category.to_string(), 1)),
        }
    }

    /// Returns the number of files counted for `category`.
    pub fn count(&self, category: &str) -> usize {
        self.counts
            .iter()
            .find(|(name, _)| name == category)
            .map_or(0, |(_, count)| *count)
    }

    /// Returns the number of files counted across all categories.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Returns true if nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(category, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (category, count) in self.iter() {
            writeln!(f, "{}: {} file(s) moved", category, count)?;
        }
        Ok(())
    }
}

/// The step of a move that failed with an I/O error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading the directory entry's type.
    Inspect,
    /// Creating the category directory.
    CreateDirectory,
    /// Renaming the file into the category directory.
    Move,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inspect => write!(f, "could not inspect entry"),
            Self::CreateDirectory => write!(f, "could not create directory"),
            Self::Move => write!(f, "could not move file"),
        }
    }
}

/// Why a single file was not moved.
#[derive(Debug)]
pub enum FileErrorKind {
    /// An entry with the same name already exists at the destination.
    Collision { destination: PathBuf },
    /// Any other file-system failure.
    Io {
        operation: FileOperation,
        path: PathBuf,
        source: io::Error,
    },
}

/// A per-file failure collected during a run.
#[derive(Debug)]
pub struct FileError {
    /// The file name as listed in the root directory.
    pub file_name: String,
    /// The full path of the file that was not moved.
    pub path: PathBuf,
    /// What went wrong.
    pub kind: FileErrorKind,
}

impl FileError {
    pub(crate) fn collision(path: &Path, file_name: &str, destination: PathBuf) -> Self {
        Self {
            file_name: file_name.to_string(),
            path: path.to_path_buf(),
            kind: FileErrorKind::Collision { destination },
        }
    }

    pub(crate) fn io(
        path: &Path,
        file_name: &str,
        operation: FileOperation,
        target: &Path,
        source: io::Error,
    ) -> Self {
        Self {
            file_name: file_name.to_string(),
            path: path.to_path_buf(),
            kind: FileErrorKind::Io {
                operation,
                path: target.to_path_buf(),
                source,
            },
        }
    }

    /// Returns true if this failure is a name collision.
    pub fn is_collision(&self) -> bool {
        matches!(self.kind, FileErrorKind::Collision { .. })
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FileErrorKind::Collision { destination } => write!(
                f,
                "{}: destination already exists: {}",
                self.file_name,
                destination.display()
            ),
            FileErrorKind::Io {
                operation,
                path,
                source,
            } => write!(
                f,
                "{}: {} {}: {}",
                self.file_name,
                operation,
                path.display(),
                source
            ),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            FileErrorKind::Io { source, .. } => Some(source),
            FileErrorKind::Collision { .. } => None,
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Per-category counts of moved files.
    pub summary: RunSummary,
    /// Every successful move, in processing order.
    pub moves: Vec<MoveRecord>,
    /// Files that could not be moved.
    pub errors: Vec<FileError>,
    /// Files left in place by the configured filters.
    pub excluded: Vec<PathBuf>,
}

impl RunReport {
    /// Number of regular files the run looked at.
    pub fn files_seen(&self) -> usize {
        self.summary.total() + self.errors.len() + self.excluded.len()
    }

    /// Returns true if every considered file was moved.
    pub fn is_complete_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A dry-run preview of what a run would do.
#[derive(Debug, Default)]
pub struct Plan {
    /// Moves that would be attempted, in listing order.
    pub moves: Vec<MoveRecord>,
    /// The subset of `moves` whose destination is already taken.
    pub collisions: Vec<MoveRecord>,
    /// Files left in place by the configured filters.
    pub excluded: Vec<PathBuf>,
    /// Entries a run would already fail on while listing.
    pub errors: Vec<FileError>,
}

impl Plan {
    /// Tallies the moves expected to succeed, per category.
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::new();
        for record in self.moves.iter().filter(|r| !self.collisions.contains(r)) {
            summary.record(&record.category);
        }
        summary
    }
}
