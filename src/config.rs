//! Sorting configuration.
//!
//! This module loads optional TOML configuration that can:
//! - Replace the built-in category table with custom categories
//! - Leave some files in place through exclusion rules
//!   (exact filename, glob, extension, regex)
//! - Override exclusions with include (whitelist) globs
//!
//! # Configuration File Format
//!
//! ```toml
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["tmp"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//!
//! [[categories]]
//! name = "Images"
//! extensions = [".jpg", "png"]
//! ```
//!
//! Patterns are matched against the file name only, since only the direct
//! children of the sorted directory are ever considered.

use crate::category_registry::{CategoryRegistry, RegistryError};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".folder-sorter.toml";

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// A configured category cannot be used.
    InvalidCategory(RegistryError),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::InvalidCategory(e) => write!(f, "Invalid category: {}", e),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<RegistryError> for ConfigError {
    fn from(e: RegistryError) -> Self {
        ConfigError::InvalidCategory(e)
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SorterConfig {
    /// Rules deciding which files are left in place.
    #[serde(default)]
    pub filters: FilterRules,

    /// Custom categories, in priority order. Absent means the built-in table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryConfig>>,
}

/// One custom category entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category and destination directory name.
    pub name: String,
    /// Accepted extensions, with or without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// Root-level filter rules configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether hidden files (starting with ".") are sorted. Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

fn default_enable_hidden_files() -> bool {
    true
}

/// Rules for leaving files out of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude, without the dot (e.g., "tmp").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns to exclude.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl SorterConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.folder-sorter.toml` in the current directory
    /// 3. Look for `~/.config/folder-sorter/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("folder-sorter")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        tracing::debug!("Loaded configuration from {}", path.display());

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the category registry this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCategory` if a category name is unusable.
    pub fn registry(&self) -> Result<CategoryRegistry, ConfigError> {
        match &self.categories {
            Some(categories) => Ok(CategoryRegistry::new(
                categories
                    .iter()
                    .map(|c| (c.name.clone(), c.extensions.iter().map(String::as_str))),
            )?),
            None => Ok(CategoryRegistry::default()),
        }
    }

    /// Compile the filter rules into matching structures.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

/// Compiled filter structures for matching file names.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    /// Create compiled filters from filter rules.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex patterns are invalid.
    pub fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Check if a file should be sorted (not excluded).
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, file_name: &str) -> bool {
        if self
            .include_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
        {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        if let Some(ext) = Path::new(file_name).extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(file_name))
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rules(exclude: ExcludeRules) -> FilterRules {
        FilterRules {
            enable_hidden_files: true,
            exclude,
            include: IncludeRules::default(),
        }
    }

    #[test]
    fn test_default_config_excludes_nothing() {
        let compiled = SorterConfig::default().compile_filters().unwrap();
        assert!(compiled.should_include(".DS_Store"));
        assert!(compiled.should_include("photo.jpg"));
        assert!(compiled.should_include("README"));
    }

    #[test]
    fn test_default_config_uses_builtin_registry() {
        let registry = SorterConfig::default().registry().unwrap();
        assert_eq!(registry.classify("a.pdf"), "PDF");
    }

    #[test]
    fn test_hidden_files_excluded_when_disabled() {
        let compiled = CompiledFilters::new(&FilterRules {
            enable_hidden_files: false,
            ..FilterRules::default()
        })
        .unwrap();

        assert!(!compiled.should_include(".DS_Store"));
        assert!(compiled.should_include("visible.txt"));
    }

    #[test]
    fn test_exclude_exact_filename() {
        let compiled = CompiledFilters::new(&rules(ExcludeRules {
            filenames: vec!["Thumbs.db".to_string()],
            ..Default::default()
        }))
        .unwrap();

        assert!(!compiled.should_include("Thumbs.db"));
        assert!(compiled.should_include("image.jpg"));
    }

    #[test]
    fn test_exclude_extensions_case_insensitive() {
        let compiled = CompiledFilters::new(&rules(ExcludeRules {
            extensions: vec!["bak".to_string(), ".tmp".to_string()],
            ..Default::default()
        }))
        .unwrap();

        assert!(!compiled.should_include("file.bak"));
        assert!(!compiled.should_include("file.TMP"));
        assert!(compiled.should_include("file.txt"));
    }

    #[test]
    fn test_exclude_glob_and_regex() {
        let compiled = CompiledFilters::new(&rules(ExcludeRules {
            patterns: vec!["*.part".to_string(), "[0-9]*.log".to_string()],
            regex: vec![r"^draft_.*\.txt$".to_string()],
            ..Default::default()
        }))
        .unwrap();

        assert!(!compiled.should_include("movie.mkv.part"));
        assert!(!compiled.should_include("1debug.log"));
        assert!(!compiled.should_include("draft_notes.txt"));
        assert!(compiled.should_include("debug.log"));
        assert!(compiled.should_include("notes.txt"));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let compiled = CompiledFilters::new(&FilterRules {
            enable_hidden_files: false,
            exclude: ExcludeRules {
                extensions: vec!["tmp".to_string()],
                ..Default::default()
            },
            include: IncludeRules {
                patterns: vec![".important".to_string(), "keep*.tmp".to_string()],
            },
        })
        .unwrap();

        assert!(compiled.should_include(".important"));
        assert!(compiled.should_include("keep_me.tmp"));
        assert!(!compiled.should_include(".other"));
        assert!(!compiled.should_include("scratch.tmp"));
    }

    #[test]
    fn test_invalid_patterns_return_errors() {
        let bad_regex = CompiledFilters::new(&rules(ExcludeRules {
            regex: vec!["[invalid(".to_string()],
            ..Default::default()
        }));
        assert!(matches!(
            bad_regex,
            Err(ConfigError::InvalidRegexPattern { .. })
        ));

        let bad_glob = CompiledFilters::new(&rules(ExcludeRules {
            patterns: vec!["[invalid".to_string()],
            ..Default::default()
        }));
        assert!(matches!(bad_glob, Err(ConfigError::InvalidGlobPattern(_))));
    }

    #[test]
    fn test_parse_custom_categories() {
        let config = SorterConfig::from_toml(
            r#"
            [[categories]]
            name = "Code"
            extensions = ["rs", ".PY"]

            [[categories]]
            name = "Books"
            extensions = [".epub", ".pdf"]
            "#,
        )
        .unwrap();

        let registry = config.registry().unwrap();
        assert_eq!(registry.classify("main.rs"), "Code");
        assert_eq!(registry.classify("tool.py"), "Code");
        assert_eq!(registry.classify("novel.pdf"), "Books");
        assert_eq!(registry.classify("photo.jpg"), "Unclassified");
        assert!(config.filters.enable_hidden_files);
    }

    #[test]
    fn test_invalid_category_name_rejected() {
        let config = SorterConfig::from_toml(
            r#"
            [[categories]]
            name = "../escape"
            extensions = ["txt"]
            "#,
        )
        .unwrap();

        assert!(matches!(
            config.registry(),
            Err(ConfigError::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = SorterConfig::from_toml("[filters\nbroken");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("sorter.toml");
        fs::write(
            &path,
            "[filters.exclude]\nfilenames = [\"desktop.ini\"]\n",
        )
        .expect("Failed to write config");

        let config = SorterConfig::load(Some(&path)).unwrap();
        let compiled = config.compile_filters().unwrap();
        assert!(!compiled.should_include("desktop.ini"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = SorterConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }
}
