/// Extension-based file categorization.
///
/// A [`CategoryRegistry`] is an ordered table of named categories, each owning
/// a set of file extensions. Classification walks the table in declaration
/// order and returns the first category whose set contains the file's
/// extension, or [`FALLBACK_CATEGORY`] when none does.
///
/// # Examples
///
/// ```
/// use folder_sorter::category_registry::CategoryRegistry;
///
/// let registry = CategoryRegistry::default();
/// assert_eq!(registry.classify("holiday.JPG"), "Images");
/// assert_eq!(registry.classify("report.pdf"), "PDF");
/// assert_eq!(registry.classify("archive.zip"), "Unclassified");
/// ```
use std::collections::HashSet;

/// Name of the category that receives files matching no declared category.
pub const FALLBACK_CATEGORY: &str = "Unclassified";

/// The built-in table, in declaration order.
const DEFAULT_TABLE: &[(&str, &[&str])] = &[
    ("Images", &[".jpg", ".jpeg", ".png", ".gif", ".bmp"]),
    ("PDF", &[".pdf"]),
    ("Documents", &[".doc", ".docx", ".txt", ".odt"]),
    ("Audio", &[".mp3", ".wav", ".aac"]),
    ("Videos", &[".mp4", ".avi", ".mkv"]),
];

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The category name cannot be used as a single directory name.
    InvalidCategoryName(String),
    /// The category name collides with the fallback category.
    ReservedCategoryName(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCategoryName(name) => {
                write!(f, "Invalid category name '{}': must be a plain directory name", name)
            }
            Self::ReservedCategoryName(name) => {
                write!(f, "Category name '{}' is reserved for unmatched files", name)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// A named bucket of extensions sharing one destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: HashSet<String>,
}

impl Category {
    /// Returns the category (and destination directory) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this category accepts the given normalized extension.
    pub fn accepts(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    /// Returns the accepted extensions, sorted for display.
    pub fn sorted_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }
}

/// Immutable, ordered mapping from category name to accepted extensions.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Builds a registry from `(name, extensions)` pairs, keeping their order.
    ///
    /// Extensions are lowercased and given a leading dot when it is missing,
    /// so `"JPG"` and `".jpg"` are equivalent.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if a name is empty, `.` or `..`, contains a
    /// path separator, or equals [`FALLBACK_CATEGORY`].
    pub fn new<I, N, E, S>(categories: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (N, E)>,
        N: Into<String>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let categories = categories
            .into_iter()
            .map(|(name, extensions)| {
                let name = name.into();
                validate_name(&name)?;
                Ok(Category {
                    name,
                    extensions: extensions
                        .into_iter()
                        .map(|ext| normalize_extension(ext.as_ref()))
                        .filter(|ext| ext.len() > 1)
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { categories })
    }

    /// Iterates the categories in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Returns the category name for a file name (not a full path).
    ///
    /// The first declared category accepting the extension wins; files with
    /// an unknown or missing extension get [`FALLBACK_CATEGORY`].
    ///
    /// # Examples
    ///
    /// ```
    /// use folder_sorter::category_registry::{CategoryRegistry, FALLBACK_CATEGORY};
    ///
    /// let registry = CategoryRegistry::default();
    /// assert_eq!(registry.classify("song.Mp3"), "Audio");
    /// assert_eq!(registry.classify("Makefile"), FALLBACK_CATEGORY);
    /// ```
    pub fn classify(&self, file_name: &str) -> &str {
        let extension = extension_of(file_name);
        if extension.is_empty() {
            return FALLBACK_CATEGORY;
        }

        self.categories
            .iter()
            .find(|category| category.accepts(&extension))
            .map(Category::name)
            .unwrap_or(FALLBACK_CATEGORY)
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self {
            categories: DEFAULT_TABLE
                .iter()
                .map(|(name, extensions)| Category {
                    name: (*name).to_string(),
                    extensions: extensions.iter().map(|ext| (*ext).to_string()).collect(),
                })
                .collect(),
        }
    }
}

/// Extracts the lowercased extension of a file name, dot included.
///
/// The extension runs from the last `.` to the end of the name; a name
/// without a dot has an empty extension.
///
/// # Examples
///
/// ```
/// use folder_sorter::category_registry::extension_of;
///
/// assert_eq!(extension_of("backup.tar.GZ"), ".gz");
/// assert_eq!(extension_of("README"), "");
/// ```
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rfind('.')
        .map(|idx| file_name[idx..].to_lowercase())
        .unwrap_or_default()
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.trim() != name
    {
        return Err(RegistryError::InvalidCategoryName(name.to_string()));
    }
    if name == FALLBACK_CATEGORY {
        return Err(RegistryError::ReservedCategoryName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_reproduced() {
        let registry = CategoryRegistry::default();
        let names: Vec<&str> = registry.categories().map(Category::name).collect();
        assert_eq!(names, ["Images", "PDF", "Documents", "Audio", "Videos"]);

        let images = registry.categories().next().unwrap();
        assert_eq!(
            images.sorted_extensions(),
            [".bmp", ".gif", ".jpeg", ".jpg", ".png"]
        );
    }

    #[test]
    fn test_classify_every_default_extension() {
        let registry = CategoryRegistry::default();
        for (name, extensions) in DEFAULT_TABLE {
            for ext in *extensions {
                assert_eq!(registry.classify(&format!("file{}", ext)), *name);
            }
        }
    }

    #[test]
    fn test_classify_case_insensitive() {
        let registry = CategoryRegistry::default();
        assert_eq!(registry.classify("photo.JPG"), "Images");
        assert_eq!(registry.classify("Scan.Pdf"), "PDF");
        assert_eq!(registry.classify("CLIP.MKV"), "Videos");
    }

    #[test]
    fn test_classify_unknown_and_missing_extension() {
        let registry = CategoryRegistry::default();
        assert_eq!(registry.classify("archive.zip"), FALLBACK_CATEGORY);
        assert_eq!(registry.classify("Makefile"), FALLBACK_CATEGORY);
        assert_eq!(registry.classify("trailing."), FALLBACK_CATEGORY);
    }

    #[test]
    fn test_classify_uses_last_dot() {
        let registry = CategoryRegistry::default();
        assert_eq!(registry.classify("notes.txt.mp3"), "Audio");
        assert_eq!(registry.classify("song.mp3.txt"), "Documents");
    }

    #[test]
    fn test_first_declared_category_wins() {
        let registry = CategoryRegistry::new([
            ("Scans", vec![".pdf", ".png"]),
            ("Pictures", vec![".png", ".jpg"]),
        ])
        .unwrap();

        assert_eq!(registry.classify("page.png"), "Scans");
        assert_eq!(registry.classify("cat.jpg"), "Pictures");
    }

    #[test]
    fn test_custom_extensions_are_normalized() {
        let registry = CategoryRegistry::new([("Code", vec!["RS", ".Toml", " py "])]).unwrap();
        assert_eq!(registry.classify("main.rs"), "Code");
        assert_eq!(registry.classify("Cargo.toml"), "Code");
        assert_eq!(registry.classify("script.PY"), "Code");
    }

    #[test]
    fn test_invalid_category_names_rejected() {
        for name in ["", ".", "..", "a/b", "a\\b", " padded"] {
            let result = CategoryRegistry::new([(name, vec![".txt"])]);
            assert_eq!(
                result.unwrap_err(),
                RegistryError::InvalidCategoryName(name.to_string())
            );
        }
    }

    #[test]
    fn test_fallback_name_reserved() {
        let result = CategoryRegistry::new([(FALLBACK_CATEGORY, vec![".zip"])]);
        assert!(matches!(result, Err(RegistryError::ReservedCategoryName(_))));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), ".jpg");
        assert_eq!(extension_of("a.b.c"), ".c");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of(".bashrc"), ".bashrc");
    }
}
