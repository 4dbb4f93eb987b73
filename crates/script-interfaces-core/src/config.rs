use std::path::PathBuf;

use rustc_hash::FxHashSet;

/// Directory names skipped by the startup sweep unless overridden.
pub const DEFAULT_IGNORED_DIRECTORIES: &[&str] = &[".git", ".godot", ".import"];

/// Source file extensions scanned unless overridden.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["gd"];

/// Validator settings.
///
/// Fixed once the validator is constructed; there is no way to change them
/// afterwards.
///
/// # Examples
///
/// ```
/// use script_interfaces_core::ValidatorConfig;
///
/// let config = ValidatorConfig::default()
///     .with_project_root("game")
///     .with_strict_interface_prefix(true)
///     .with_ignored_directory("addons");
///
/// assert!(config.strict_interface_prefix);
/// assert!(config.is_ignored_directory("addons"));
/// assert!(config.is_ignored_directory(".git"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Permit `implements` entries written as bare class names.
    pub allow_string_classes: bool,
    /// Default `validate` mode, and the mode used by the startup sweep.
    pub strict_validation: bool,
    /// Require string interface names to start with `interface_prefix`.
    pub strict_interface_prefix: bool,
    /// Prefix enforced by `strict_interface_prefix`.
    pub interface_prefix: String,
    /// Root directory walked by the startup sweep.
    pub project_root: PathBuf,
    /// Directory base names the scanner never descends into.
    pub ignored_directories: FxHashSet<String>,
    /// File extensions (without the dot) treated as source.
    pub source_extensions: Vec<String>,
    /// Constant member holding a script's declared interface list.
    pub implements_constant: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            allow_string_classes: true,
            strict_validation: true,
            strict_interface_prefix: false,
            interface_prefix: "I".to_owned(),
            project_root: PathBuf::from("."),
            ignored_directories: DEFAULT_IGNORED_DIRECTORIES
                .iter()
                .map(|d| (*d).to_owned())
                .collect(),
            source_extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|e| (*e).to_owned())
                .collect(),
            implements_constant: "implements".to_owned(),
        }
    }
}

impl ValidatorConfig {
    pub fn with_allow_string_classes(mut self, allow: bool) -> Self {
        self.allow_string_classes = allow;
        self
    }

    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    pub fn with_strict_interface_prefix(mut self, strict: bool) -> Self {
        self.strict_interface_prefix = strict;
        self
    }

    pub fn with_interface_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.interface_prefix = prefix.into();
        self
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Add a directory name to the ignore set.
    pub fn with_ignored_directory(mut self, name: impl Into<String>) -> Self {
        self.ignored_directories.insert(name.into());
        self
    }

    /// Replace the ignore set.
    pub fn with_ignored_directories<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.ignored_directories = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the source extensions.
    pub fn with_source_extensions<I>(mut self, extensions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.source_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_implements_constant(mut self, name: impl Into<String>) -> Self {
        self.implements_constant = name.into();
        self
    }

    /// Check whether a directory base name is skipped.
    pub fn is_ignored_directory(&self, name: &str) -> bool {
        self.ignored_directories.contains(name)
    }

    /// Check whether an extension marks a source file (case-insensitive).
    pub fn is_source_extension(&self, extension: &str) -> bool {
        self.source_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}
