//! Host object model.
//!
//! The conformance engine does not load, parse or run scripts itself. It
//! consumes the host runtime through the traits in this module:
//!
//! - [`HostScript`] - reflection over one loaded script
//! - [`Scripted`] - anything a script can be attached to
//! - [`ScriptHost`] - global class listing, script loading, environment queries

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{HostError, ScriptId};

/// Shared handle to a loaded script.
pub type ScriptRef = Arc<dyn HostScript>;

/// Reflection over a single script, supplied by the host.
pub trait HostScript: fmt::Debug + Send + Sync {
    /// Stable identity key, usually the resource path.
    ///
    /// Every cache is keyed on this value, so it must be non-empty and
    /// unique per script. In-memory scripts need a synthetic key.
    fn identity(&self) -> ScriptId;

    /// Whether the script exposes its source text.
    fn has_source_text(&self) -> bool {
        self.source_text().is_some()
    }

    /// The script's source text, if available.
    fn source_text(&self) -> Option<&str>;

    /// Constant members declared by the script, in declaration order.
    fn constant_members(&self) -> Vec<(String, ConstantValue)>;

    /// Names of signals declared directly on this script.
    fn declared_signal_names(&self) -> Vec<String>;

    /// Names of methods declared directly on this script.
    fn declared_method_names(&self) -> Vec<String>;

    /// Path the script was loaded from.
    fn defining_path(&self) -> &str;

    /// Look up a single constant by name.
    fn constant(&self, name: &str) -> Option<ConstantValue> {
        self.constant_members()
            .into_iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }
}

/// An object that may carry a script.
pub trait Scripted {
    /// The script attached to this object, if any.
    fn attached_script(&self) -> Option<ScriptRef>;
}

impl Scripted for ScriptRef {
    fn attached_script(&self) -> Option<ScriptRef> {
        Some(Arc::clone(self))
    }
}

impl<T: Scripted + ?Sized> Scripted for &T {
    fn attached_script(&self) -> Option<ScriptRef> {
        (**self).attached_script()
    }
}

/// Services the host runtime provides to the engine.
pub trait ScriptHost {
    /// Every globally registered class with its defining path.
    fn global_class_list(&self) -> Vec<ClassCatalogEntry>;

    /// Load (or fetch an already loaded) script at `path`.
    fn load_script(&self, path: &str) -> Result<ScriptRef, HostError>;

    /// Whether the host's loader already holds a script cached under `name`.
    fn has_cached_script(&self, name: &str) -> bool;

    /// Whether the process runs in an authoring/editor context.
    fn is_authoring(&self) -> bool;
}

/// One row of the host's global class registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassCatalogEntry {
    /// Registered class name.
    pub class_name: String,
    /// Path of the defining script.
    pub path: PathBuf,
}

impl ClassCatalogEntry {
    /// Create a new entry.
    pub fn new(class_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            class_name: class_name.into(),
            path: path.into(),
        }
    }

    /// Defining path as a `Path`.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Value of a script constant, as far as the engine needs to see it.
#[derive(Debug, Clone)]
pub enum ConstantValue {
    /// A string constant.
    String(String),
    /// A reference to another script (a preloaded class).
    Script(ScriptRef),
    /// An array of values.
    Array(Vec<ConstantValue>),
    /// Any other value, rendered by the host.
    Other(String),
}

impl ConstantValue {
    /// Borrow as a string, if this is a string constant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstantValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow as a script, if this is a script reference.
    pub fn as_script(&self) -> Option<&ScriptRef> {
        match self {
            ConstantValue::Script(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ConstantValue {
    fn from(s: &str) -> Self {
        ConstantValue::String(s.to_owned())
    }
}

impl From<String> for ConstantValue {
    fn from(s: String) -> Self {
        ConstantValue::String(s)
    }
}

impl From<ScriptRef> for ConstantValue {
    fn from(s: ScriptRef) -> Self {
        ConstantValue::Script(s)
    }
}

impl<T: Into<ConstantValue>> From<Vec<T>> for ConstantValue {
    fn from(values: Vec<T>) -> Self {
        ConstantValue::Array(values.into_iter().map(Into::into).collect())
    }
}

/// An interface as named by a caller: a registered class name or a script.
#[derive(Debug, Clone)]
pub enum InterfaceRef {
    /// Bare class name, resolved through the class catalog.
    Name(String),
    /// Already loaded interface script.
    Script(ScriptRef),
}

impl From<&str> for InterfaceRef {
    fn from(name: &str) -> Self {
        InterfaceRef::Name(name.to_owned())
    }
}

impl From<String> for InterfaceRef {
    fn from(name: String) -> Self {
        InterfaceRef::Name(name)
    }
}

impl From<ScriptRef> for InterfaceRef {
    fn from(script: ScriptRef) -> Self {
        InterfaceRef::Script(script)
    }
}

impl From<&ScriptRef> for InterfaceRef {
    fn from(script: &ScriptRef) -> Self {
        InterfaceRef::Script(Arc::clone(script))
    }
}

/// One or more interfaces requested in a single query.
///
/// A single interface is normalized into a one-element list.
#[derive(Debug, Clone)]
pub struct Interfaces(Vec<InterfaceRef>);

impl Interfaces {
    /// The requested interfaces in order.
    pub fn as_slice(&self) -> &[InterfaceRef] {
        &self.0
    }

    /// Number of requested interfaces.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<InterfaceRef> for Interfaces {
    fn from(single: InterfaceRef) -> Self {
        Interfaces(vec![single])
    }
}

impl From<&str> for Interfaces {
    fn from(name: &str) -> Self {
        InterfaceRef::from(name).into()
    }
}

impl From<String> for Interfaces {
    fn from(name: String) -> Self {
        InterfaceRef::from(name).into()
    }
}

impl From<ScriptRef> for Interfaces {
    fn from(script: ScriptRef) -> Self {
        InterfaceRef::from(script).into()
    }
}

impl From<&ScriptRef> for Interfaces {
    fn from(script: &ScriptRef) -> Self {
        InterfaceRef::from(script).into()
    }
}

impl From<&[InterfaceRef]> for Interfaces {
    fn from(list: &[InterfaceRef]) -> Self {
        Interfaces(list.to_vec())
    }
}

impl From<Vec<InterfaceRef>> for Interfaces {
    fn from(list: Vec<InterfaceRef>) -> Self {
        Interfaces(list)
    }
}

impl FromIterator<InterfaceRef> for Interfaces {
    fn from_iter<I: IntoIterator<Item = InterfaceRef>>(iter: I) -> Self {
        Interfaces(iter.into_iter().collect())
    }
}
