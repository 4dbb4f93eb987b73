// tests/common/mod.rs
//! Test hosts for the conformance engine.
//!
//! - [`MemoryHost`] holds hand-built scripts in memory
//! - [`FsHost`] loads `.gd` files from disk and reads their top-level
//!   `class_name`, `signal`, `func` and `const` lines

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use script_interfaces::prelude::*;
use script_interfaces::{ClassCatalogEntry, extract_class_name};

// =============================================================================
// In-memory scripts
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryScript {
    pub path: String,
    pub source: Option<String>,
    pub signals: Vec<String>,
    pub methods: Vec<String>,
    pub constants: Vec<(String, ConstantValue)>,
    pub introspections: AtomicUsize,
}

impl MemoryScript {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            ..Self::default()
        }
    }

    pub fn class_name(mut self, name: &str) -> Self {
        self.source = Some(format!("extends Node\nclass_name {name}\n"));
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.source = Some("extends Node\n".to_owned());
        self
    }

    pub fn signals(mut self, names: &[&str]) -> Self {
        self.signals = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn methods(mut self, names: &[&str]) -> Self {
        self.methods = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn constant(mut self, name: &str, value: impl Into<ConstantValue>) -> Self {
        self.constants.push((name.to_owned(), value.into()));
        self
    }

    pub fn implements(self, names: &[&str]) -> Self {
        self.constant("implements", names.to_vec())
    }

    pub fn build(self) -> Arc<MemoryScript> {
        Arc::new(self)
    }

    pub fn introspection_count(&self) -> usize {
        self.introspections.load(Ordering::Relaxed)
    }
}

impl HostScript for MemoryScript {
    fn identity(&self) -> ScriptId {
        ScriptId::new(self.path.clone())
    }

    fn source_text(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn constant_members(&self) -> Vec<(String, ConstantValue)> {
        self.introspections.fetch_add(1, Ordering::Relaxed);
        self.constants.clone()
    }

    fn declared_signal_names(&self) -> Vec<String> {
        self.introspections.fetch_add(1, Ordering::Relaxed);
        self.signals.clone()
    }

    fn declared_method_names(&self) -> Vec<String> {
        self.introspections.fetch_add(1, Ordering::Relaxed);
        self.methods.clone()
    }

    fn defining_path(&self) -> &str {
        &self.path
    }
}

pub fn script_ref(script: &Arc<MemoryScript>) -> ScriptRef {
    script.clone()
}

// =============================================================================
// In-memory host
// =============================================================================

#[derive(Default)]
pub struct MemoryHost {
    scripts: HashMap<String, ScriptRef>,
    classes: Vec<ClassCatalogEntry>,
    cached_names: Vec<String>,
    pub authoring: bool,
    pub loads: AtomicUsize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            authoring: true,
            ..Self::default()
        }
    }

    /// Add a script loadable by its path.
    pub fn add(&mut self, script: &Arc<MemoryScript>) -> ScriptRef {
        let script = script_ref(script);
        self.scripts
            .insert(script.defining_path().to_owned(), script.clone());
        script
    }

    /// Add a script and register it as a global class.
    pub fn register(&mut self, class_name: &str, script: &Arc<MemoryScript>) -> ScriptRef {
        let script = self.add(script);
        self.classes.push(ClassCatalogEntry::new(
            class_name,
            script.defining_path().to_owned(),
        ));
        script
    }

    /// Make a script loadable under a bare name, as if already cached.
    pub fn cache_as(&mut self, name: &str, script: &Arc<MemoryScript>) {
        self.scripts.insert(name.to_owned(), script_ref(script));
        self.cached_names.push(name.to_owned());
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl ScriptHost for MemoryHost {
    fn global_class_list(&self) -> Vec<ClassCatalogEntry> {
        self.classes.clone()
    }

    fn load_script(&self, path: &str) -> Result<ScriptRef, HostError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.scripts
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::NotFound(path.to_owned()))
    }

    fn has_cached_script(&self, name: &str) -> bool {
        self.cached_names.iter().any(|n| n == name)
    }

    fn is_authoring(&self) -> bool {
        self.authoring
    }
}

/// A scene-tree style object that may carry a script.
#[derive(Debug)]
pub struct Node {
    pub name: &'static str,
    pub script: Option<ScriptRef>,
}

impl Node {
    pub fn new(name: &'static str, script: Option<ScriptRef>) -> Self {
        Self { name, script }
    }
}

impl Scripted for Node {
    fn attached_script(&self) -> Option<ScriptRef> {
        self.script.clone()
    }
}

// =============================================================================
// Filesystem host
// =============================================================================

/// Host that loads scripts from a directory tree.
pub struct FsHost {
    root: PathBuf,
    loaded: Mutex<HashMap<String, ScriptRef>>,
    pub authoring: bool,
    pub loads: AtomicUsize,
}

impl FsHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            loaded: Mutex::new(HashMap::new()),
            authoring: true,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Paths of every file loaded so far.
    pub fn loaded_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.loaded.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl ScriptHost for FsHost {
    fn global_class_list(&self) -> Vec<ClassCatalogEntry> {
        let mut classes = Vec::new();
        collect_classes(&self.root, &mut classes);
        classes
    }

    fn load_script(&self, path: &str) -> Result<ScriptRef, HostError> {
        let mut loaded = self.loaded.lock().unwrap();
        if let Some(script) = loaded.get(path) {
            return Ok(script.clone());
        }
        self.loads.fetch_add(1, Ordering::Relaxed);
        let source = fs::read_to_string(path).map_err(|e| HostError::LoadFailed {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        let script: ScriptRef = Arc::new(parse_script(path, &source));
        loaded.insert(path.to_owned(), script.clone());
        Ok(script)
    }

    fn has_cached_script(&self, name: &str) -> bool {
        self.loaded.lock().unwrap().contains_key(name)
    }

    fn is_authoring(&self) -> bool {
        self.authoring
    }
}

fn collect_classes(dir: &Path, classes: &mut Vec<ClassCatalogEntry>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_classes(&path, classes);
        } else if path.extension().is_some_and(|ext| ext == "gd") {
            let Ok(source) = fs::read_to_string(&path) else {
                continue;
            };
            if let Some(name) = extract_class_name(&source) {
                classes.push(ClassCatalogEntry::new(name, path.clone()));
            }
        }
    }
}

/// Read top-level declarations of a `.gd` file.
///
/// Indented lines belong to function bodies or inner classes and are not
/// direct declarations.
pub fn parse_script(path: &str, source: &str) -> MemoryScript {
    let mut script = MemoryScript::new(path);
    script.source = Some(source.to_owned());

    for line in source.lines() {
        if line.starts_with([' ', '\t']) {
            continue;
        }
        if let Some(rest) = line.strip_prefix("signal ") {
            script.signals.push(ident(rest));
        } else if let Some(rest) = line.strip_prefix("func ") {
            script.methods.push(ident(rest));
        } else if let Some(rest) = line.strip_prefix("const ") {
            let Some((name, value)) = rest.split_once('=') else {
                continue;
            };
            script
                .constants
                .push((name.trim().to_owned(), parse_value(value.trim())));
        }
    }
    script
}

fn ident(rest: &str) -> String {
    rest.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .unwrap_or_default()
        .to_owned()
}

fn parse_value(value: &str) -> ConstantValue {
    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        return ConstantValue::Array(
            inner
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(parse_value)
                .collect(),
        );
    }
    if let Some(s) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        return ConstantValue::String(s.to_owned());
    }
    ConstantValue::Other(value.to_owned())
}

/// Write `files` (relative path, contents) under `root`.
pub fn write_project(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
    }
}

/// Directory holding the checked-in fixture scripts.
pub fn fixtures_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_scripts")
        .join(name)
}
