/// A small persisted to-do list.
///
/// The list is stored as a JSON document of the form
/// `{"tasks": [{"name": "...", "done": false}]}`. A missing file is treated
/// as an empty list.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default location of the task document, relative to the working directory.
pub const DEFAULT_TASKS_FILE: &str = "lifeops_data.json";

/// Errors that can occur while reading or changing the task list.
#[derive(Debug)]
pub enum TaskError {
    /// Failed to read the task document.
    ReadFailed { source: std::io::Error },
    /// Failed to write the task document.
    WriteFailed { source: std::io::Error },
    /// The task document is not valid JSON of the expected shape.
    InvalidFormat { reason: String },
    /// The task name is empty.
    EmptyName,
    /// No task has this 1-based number.
    InvalidNumber { number: usize, len: usize },
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { source } => write!(f, "Failed to read task file: {}", source),
            Self::WriteFailed { source } => write!(f, "Failed to write task file: {}", source),
            Self::InvalidFormat { reason } => write!(f, "Invalid task file format: {}", reason),
            Self::EmptyName => write!(f, "Task name cannot be empty"),
            Self::InvalidNumber { number, len } => {
                write!(f, "Invalid task number {} (list has {} task(s))", number, len)
            }
        }
    }
}

impl std::error::Error for TaskError {}

/// Result type for task list operations.
pub type TaskResult<T> = Result<T, TaskError>;

/// A single to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub done: bool,
    /// When the task was marked done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Which tasks a listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.done,
            Self::Done => task.done,
        }
    }
}

/// The whole task document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    tasks: Vec<Task>,
}

impl TaskList {
    /// Loads the list from `path`, or returns an empty list if the file is absent.
    pub fn load(path: &Path) -> TaskResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path).map_err(|e| TaskError::ReadFailed { source: e })?;
        serde_json::from_str(&json).map_err(|e| TaskError::InvalidFormat {
            reason: e.to_string(),
        })
    }

    /// Writes the list to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> TaskResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| TaskError::InvalidFormat {
            reason: format!("JSON serialization failed: {}", e),
        })?;

        fs::write(path, json).map_err(|e| TaskError::WriteFailed { source: e })
    }

    /// Returns the tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends a new, unfinished task and returns its 1-based number.
    pub fn add(&mut self, name: &str) -> TaskResult<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TaskError::EmptyName);
        }

        self.tasks.push(Task {
            name: name.to_string(),
            done: false,
            completed_at: None,
        });
        Ok(self.tasks.len())
    }

    /// Marks the task with the given 1-based number as done.
    ///
    /// Completing an already finished task keeps its original timestamp.
    pub fn complete(&mut self, number: usize) -> TaskResult<&Task> {
        let idx = self.index_of(number)?;
        let task = &mut self.tasks[idx];

        if !task.done {
            task.done = true;
            task.completed_at = Some(Utc::now());
        }
        Ok(task)
    }

    /// Marks a finished task as not done again and clears its timestamp.
    pub fn reopen(&mut self, number: usize) -> TaskResult<&Task> {
        let idx = self.index_of(number)?;
        let task = &mut self.tasks[idx];

        task.done = false;
        task.completed_at = None;
        Ok(task)
    }

    /// Deletes the task with the given 1-based number and returns it.
    ///
    /// Tasks after it move up by one.
    pub fn remove(&mut self, number: usize) -> TaskResult<Task> {
        let idx = self.index_of(number)?;
        Ok(self.tasks.remove(idx))
    }

    /// Number of tasks not yet done.
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.done).count()
    }

    /// Tasks matching `filter`, paired with their 1-based numbers.
    pub fn filtered(&self, filter: TaskFilter) -> impl Iterator<Item = (usize, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .filter(move |(_, task)| filter.matches(task))
            .map(|(idx, task)| (idx + 1, task))
    }

    fn index_of(&self, number: usize) -> TaskResult<usize> {
        let len = self.tasks.len();
        number
            .checked_sub(1)
            .filter(|idx| *idx < len)
            .ok_or(TaskError::InvalidNumber { number, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let list = TaskList::load(&dir.path().join("nope.json")).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_complete_and_reload() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("tasks.json");

        let mut list = TaskList::default();
        assert_eq!(list.add("  water plants ").unwrap(), 1);
        assert_eq!(list.add("file taxes").unwrap(), 2);
        list.complete(2).unwrap();
        list.save(&path).unwrap();

        let reloaded = TaskList::load(&path).unwrap();
        assert_eq!(reloaded, list);
        assert_eq!(reloaded.tasks()[0].name, "water plants");
        assert!(!reloaded.tasks()[0].done);
        assert!(reloaded.tasks()[1].done);
        assert!(reloaded.tasks()[1].completed_at.is_some());
        assert_eq!(reloaded.pending(), 1);
    }

    #[test]
    fn test_loads_plain_document() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("lifeops_data.json");
        fs::write(
            &path,
            r#"{"tasks": [{"name": "read", "done": true}, {"name": "run", "done": false}]}"#,
        )
        .unwrap();

        let list = TaskList::load(&path).unwrap();
        assert_eq!(list.tasks().len(), 2);
        assert!(list.tasks()[0].done);
        assert_eq!(list.tasks()[0].completed_at, None);
    }

    #[test]
    fn test_unset_timestamp_not_written() {
        let mut list = TaskList::default();
        list.add("stretch").unwrap();
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"{"tasks":[{"name":"stretch","done":false}]}"#);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let mut list = TaskList::default();
        list.add("only one").unwrap();

        assert!(matches!(
            list.complete(0),
            Err(TaskError::InvalidNumber { number: 0, len: 1 })
        ));
        assert!(matches!(
            list.complete(2),
            Err(TaskError::InvalidNumber { number: 2, len: 1 })
        ));
        assert!(!list.tasks()[0].done);
    }

    #[test]
    fn test_reopen_clears_completion() {
        let mut list = TaskList::default();
        list.add("call mom").unwrap();
        list.complete(1).unwrap();
        assert_eq!(list.pending(), 0);

        let task = list.reopen(1).unwrap();
        assert!(!task.done);
        assert_eq!(task.completed_at, None);
        assert_eq!(list.pending(), 1);

        // reopening an open task is a no-op
        list.reopen(1).unwrap();
        assert!(!list.tasks()[0].done);
        assert!(matches!(
            list.reopen(2),
            Err(TaskError::InvalidNumber { number: 2, len: 1 })
        ));
    }

    #[test]
    fn test_remove_renumbers_following_tasks() {
        let mut list = TaskList::default();
        list.add("first").unwrap();
        list.add("second").unwrap();
        list.add("third").unwrap();

        let removed = list.remove(2).unwrap();
        assert_eq!(removed.name, "second");
        let names: Vec<_> = list.tasks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["first", "third"]);

        assert!(matches!(
            list.remove(0),
            Err(TaskError::InvalidNumber { number: 0, len: 2 })
        ));
        assert!(matches!(
            list.remove(3),
            Err(TaskError::InvalidNumber { number: 3, len: 2 })
        ));
        assert_eq!(list.tasks().len(), 2);
    }

    #[test]
    fn test_filtered_keeps_list_numbers() {
        let mut list = TaskList::default();
        list.add("a").unwrap();
        list.add("b").unwrap();
        list.add("c").unwrap();
        list.complete(2).unwrap();

        let pending: Vec<_> = list
            .filtered(TaskFilter::Pending)
            .map(|(n, t)| (n, t.name.as_str()))
            .collect();
        assert_eq!(pending, [(1, "a"), (3, "c")]);

        let done: Vec<_> = list
            .filtered(TaskFilter::Done)
            .map(|(n, t)| (n, t.name.as_str()))
            .collect();
        assert_eq!(done, [(2, "b")]);

        assert_eq!(list.filtered(TaskFilter::All).count(), 3);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut list = TaskList::default();
        assert!(matches!(list.add("   "), Err(TaskError::EmptyName)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_corrupt_file_reported() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            TaskList::load(&path),
            Err(TaskError::InvalidFormat { .. })
        ));
    }
}
