/// Sorting of a directory's files into category subdirectories.
///
/// [`FolderOrganizer`] lists the direct children of a root directory, classifies
/// every regular file by extension, and moves it into `root/<category>/`. It
/// never recurses, never overwrites, and never prints: every outcome is
/// returned to the caller in a [`RunReport`].
use crate::category_registry::CategoryRegistry;
use crate::config::CompiledFilters;
use crate::report::{FileError, FileOperation, MoveRecord, Plan, RunReport};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that abort a whole run before anything is touched.
#[derive(Debug)]
pub enum OrganizeError {
    /// The root path does not exist or is not a directory.
    NotFound { path: PathBuf, source: io::Error },
    /// The root directory exists but could not be listed.
    ReadDirFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path, source } => {
                write!(f, "Directory not found {}: {}", path.display(), source)
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { source, .. } | Self::ReadDirFailed { source, .. } => Some(source),
        }
    }
}

/// Result type for organization runs.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Per-file notifications emitted by [`FolderOrganizer::run_observed`].
#[derive(Debug)]
pub enum Progress<'a> {
    /// The directory was listed; `total` regular files will be processed.
    Started { total: usize },
    /// A file was moved.
    Moved(&'a MoveRecord),
    /// A file could not be moved.
    Failed(&'a FileError),
    /// A file was left in place by the filters.
    Excluded(&'a Path),
}

/// A regular file found in the root directory.
struct Candidate {
    path: PathBuf,
    name: String,
}

/// Moves files into per-category subdirectories of a root directory.
#[derive(Debug, Clone, Default)]
pub struct FolderOrganizer {
    registry: CategoryRegistry,
    filters: CompiledFilters,
}

impl FolderOrganizer {
    /// Creates an organizer using `registry` and no filters.
    pub fn new(registry: CategoryRegistry) -> Self {
        Self {
            registry,
            filters: CompiledFilters::default(),
        }
    }

    /// Leaves files rejected by `filters` in place.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Returns the registry used for classification.
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Sorts the regular files directly inside `root`.
    ///
    /// Subdirectories are left alone. A file whose destination name is
    /// already taken is not moved and is reported as a collision. Per-file
    /// failures are collected in the report and never stop the run.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError`] if `root` is missing, is not a directory, or
    /// cannot be listed. Nothing is modified in that case.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use folder_sorter::FolderOrganizer;
    ///
    /// let organizer = FolderOrganizer::default();
    /// match organizer.run("/home/me/Downloads") {
    ///     Ok(report) => print!("{}", report.summary),
    ///     Err(e) => eprintln!("{}", e),
    /// }
    /// ```
    pub fn run(&self, root: impl AsRef<Path>) -> OrganizeResult<RunReport> {
        self.run_observed(root, |_| {})
    }

    /// Same as [`run`](Self::run), reporting each step to `observer` as it happens.
    pub fn run_observed<F>(
        &self,
        root: impl AsRef<Path>,
        mut observer: F,
    ) -> OrganizeResult<RunReport>
    where
        F: FnMut(Progress<'_>),
    {
        let root = root.as_ref();
        let mut report = RunReport::default();
        let candidates = self.list_files(root, &mut report.errors)?;

        observer(Progress::Started {
            total: candidates.len() + report.errors.len(),
        });
        for error in &report.errors {
            observer(Progress::Failed(error));
        }

        let mut ensured: HashSet<String> = HashSet::new();

        for candidate in candidates {
            if !self.filters.should_include(&candidate.name) {
                tracing::trace!("Excluded by filters: {}", candidate.path.display());
                observer(Progress::Excluded(&candidate.path));
                report.excluded.push(candidate.path);
                continue;
            }

            let category = self.registry.classify(&candidate.name);
            match Self::move_into_category(root, &candidate, category, &mut ensured) {
                Ok(record) => {
                    tracing::debug!(
                        "Moved {} -> {}",
                        record.source.display(),
                        record.destination.display()
                    );
                    report.summary.record(category);
                    observer(Progress::Moved(&record));
                    report.moves.push(record);
                }
                Err(error) => {
                    tracing::debug!("Skipped {}", error);
                    observer(Progress::Failed(&error));
                    report.errors.push(error);
                }
            }
        }

        Ok(report)
    }

    /// Computes what [`run`](Self::run) would do without touching anything.
    ///
    /// # Errors
    ///
    /// Same conditions as [`run`](Self::run).
    pub fn plan(&self, root: impl AsRef<Path>) -> OrganizeResult<Plan> {
        let root = root.as_ref();
        let mut plan = Plan::default();
        let candidates = self.list_files(root, &mut plan.errors)?;

        for candidate in candidates {
            if !self.filters.should_include(&candidate.name) {
                plan.excluded.push(candidate.path);
                continue;
            }

            let category = self.registry.classify(&candidate.name);
            let file_name = candidate.path.file_name().unwrap_or_default();
            let destination = root.join(category).join(file_name);
            let record = MoveRecord {
                source: candidate.path,
                destination,
                category: category.to_string(),
            };
            if entry_exists(&record.destination) {
                plan.collisions.push(record.clone());
            }
            plan.moves.push(record);
        }

        Ok(plan)
    }

    /// Lists the regular files directly inside `root`, plus symlinks that
    /// point at one.
    ///
    /// Entries whose type cannot be read are pushed to `errors` as they are
    /// still accounted for.
    fn list_files(
        &self,
        root: &Path,
        errors: &mut Vec<FileError>,
    ) -> OrganizeResult<Vec<Candidate>> {
        let metadata = fs::metadata(root).map_err(|e| OrganizeError::NotFound {
            path: root.to_path_buf(),
            source: e,
        })?;
        if !metadata.is_dir() {
            return Err(OrganizeError::NotFound {
                path: root.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            });
        }

        let entries = fs::read_dir(root).map_err(|e| OrganizeError::ReadDirFailed {
            path: root.to_path_buf(),
            source: e,
        })?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    return Err(OrganizeError::ReadDirFailed {
                        path: root.to_path_buf(),
                        source: e,
                    });
                }
            };

            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            match entry.file_type() {
                Ok(file_type) if file_type.is_file() => candidates.push(Candidate { path, name }),
                // a link to a file is sorted like one; rename moves the link itself
                Ok(file_type) if file_type.is_symlink() && resolves_to_file(&path) => {
                    candidates.push(Candidate { path, name })
                }
                Ok(_) => tracing::trace!("Skipping non-file entry {}", path.display()),
                Err(e) => {
                    errors.push(FileError::io(&path, &name, FileOperation::Inspect, &path, e));
                }
            }
        }

        Ok(candidates)
    }

    /// Moves one file into `root/<category>/`, creating the directory once.
    fn move_into_category(
        root: &Path,
        candidate: &Candidate,
        category: &str,
        ensured: &mut HashSet<String>,
    ) -> Result<MoveRecord, FileError> {
        let category_path = root.join(category);

        if !ensured.contains(category) {
            ensure_directory(&category_path).map_err(|e| {
                FileError::io(
                    &candidate.path,
                    &candidate.name,
                    FileOperation::CreateDirectory,
                    &category_path,
                    e,
                )
            })?;
            ensured.insert(category.to_string());
        }

        let file_name = candidate.path.file_name().ok_or_else(|| {
            FileError::io(
                &candidate.path,
                &candidate.name,
                FileOperation::Move,
                &category_path,
                io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
            )
        })?;
        let destination = category_path.join(file_name);

        // rename replaces an existing file silently, so check first
        if entry_exists(&destination) {
            return Err(FileError::collision(
                &candidate.path,
                &candidate.name,
                destination,
            ));
        }

        fs::rename(&candidate.path, &destination).map_err(|e| {
            FileError::io(
                &candidate.path,
                &candidate.name,
                FileOperation::Move,
                &destination,
                e,
            )
        })?;

        Ok(MoveRecord {
            source: candidate.path.clone(),
            destination,
            category: category.to_string(),
        })
    }
}

/// Creates `path` as a directory unless a directory is already there.
fn ensure_directory(path: &Path) -> io::Result<()> {
    match fs::create_dir(path) {
        Ok(()) => {
            tracing::debug!("Created directory {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            if path.is_dir() {
                Ok(())
            } else {
                Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "a non-directory entry occupies the category name",
                ))
            }
        }
        Err(e) => Err(e),
    }
}

/// True if `path` is a symlink whose target is a regular file.
fn resolves_to_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// True if anything, including a dangling symlink, sits at `path`.
fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
