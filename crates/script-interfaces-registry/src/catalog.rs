//! ClassCatalog - global class name to defining path table.
//!
//! Built once from the host's registered-class listing and read-only
//! afterwards. A class registered after construction is invisible until a
//! new catalog is built.
//!
//! # Example
//!
//! ```
//! use script_interfaces_core::ClassCatalogEntry;
//! use script_interfaces_registry::ClassCatalog;
//! use std::path::Path;
//!
//! let catalog = ClassCatalog::from_entries([
//!     ClassCatalogEntry::new("IDamagable", "res://interfaces/damagable.gd"),
//!     ClassCatalogEntry::new("Player", "res://player.gd"),
//! ]);
//!
//! assert_eq!(
//!     catalog.resolve("IDamagable"),
//!     Some(Path::new("res://interfaces/damagable.gd"))
//! );
//! assert!(catalog.resolve("Enemy").is_none());
//! ```

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use script_interfaces_core::{ClassCatalogEntry, ScriptHost};

/// Read-only table of globally registered classes.
#[derive(Debug, Clone, Default)]
pub struct ClassCatalog {
    /// Class name -> defining path.
    classes: FxHashMap<String, PathBuf>,
    /// Reverse index: defining path -> class name.
    by_path: FxHashMap<PathBuf, String>,
}

impl ClassCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the catalog from the host's global class list.
    pub fn from_host<H: ScriptHost + ?Sized>(host: &H) -> Self {
        let catalog = Self::from_entries(host.global_class_list());
        debug!(classes = catalog.len(), "class catalog built");
        catalog
    }

    /// Build the catalog from explicit entries.
    ///
    /// When a class name appears twice the first registration is kept.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ClassCatalogEntry>,
    {
        let mut catalog = Self::new();
        for entry in entries {
            if catalog.classes.contains_key(&entry.class_name) {
                warn!(
                    class = %entry.class_name,
                    path = %entry.path.display(),
                    "duplicate class registration ignored"
                );
                continue;
            }
            catalog
                .by_path
                .entry(entry.path.clone())
                .or_insert_with(|| entry.class_name.clone());
            catalog.classes.insert(entry.class_name, entry.path);
        }
        catalog
    }

    /// Defining path of a registered class.
    pub fn resolve(&self, class_name: &str) -> Option<&Path> {
        self.classes.get(class_name).map(PathBuf::as_path)
    }

    /// Check if a class name is registered.
    pub fn contains(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// Class registered for a defining path.
    pub fn class_for_path(&self, path: &Path) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate `(class name, path)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.classes
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}
