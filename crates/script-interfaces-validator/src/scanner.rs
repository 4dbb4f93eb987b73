//! Source Scanner - breadth-first project walk.
//!
//! Produces every file reachable from a root, never descending into a
//! directory whose base name is in the ignore set. Failures are soft: an
//! unreadable directory is skipped and recorded in
//! [`ScanOutcome::diagnostics`], the walk carries on.
//!
//! Order follows a breadth-first walk but callers must only rely on
//! completeness, not on ordering.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, warn};

use script_interfaces_core::ValidatorConfig;

/// Soft failures recorded during a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A directory could not be opened.
    #[error("cannot open directory '{}': {source}", .path.display())]
    OpenDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory entry could not be read.
    #[error("cannot read entry in '{}': {source}", .path.display())]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Path the failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            ScanError::OpenDirectory { path, .. } => path,
            ScanError::ReadEntry { path, .. } => path,
        }
    }
}

/// Files found by a scan plus any soft failures.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Every file found.
    pub files: Vec<PathBuf>,
    /// Directories that could not be walked.
    pub diagnostics: Vec<ScanError>,
}

impl ScanOutcome {
    /// Check whether the scan hit no failures.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Log and keep a soft failure.
    fn record(&mut self, error: ScanError) {
        warn!(path = %error.path().display(), error = %error, "scan skipped unreadable path");
        self.diagnostics.push(error);
    }
}

/// Walk `root` breadth-first, returning every file outside ignored directories.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn scan(root: &Path, ignored: &FxHashSet<String>) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    let mut pending = VecDeque::from([root.to_path_buf()]);

    while let Some(dir) = pending.pop_front() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) => {
                outcome.record(ScanError::OpenDirectory { path: dir, source });
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => {
                    outcome.record(ScanError::ReadEntry {
                        path: dir.clone(),
                        source,
                    });
                    continue;
                }
            };

            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == "." || name == ".." {
                continue;
            }

            let path = entry.path();
            // Symlinked directories are not followed; symlinked files are kept.
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                if ignored.contains(name.as_ref()) {
                    debug!(path = %path.display(), "ignored directory");
                } else {
                    pending.push_back(path);
                }
            } else if path.is_file() {
                outcome.files.push(path);
            }
        }
    }

    outcome
}

/// Scan the configured project root and keep only source files.
pub fn scan_sources(config: &ValidatorConfig) -> ScanOutcome {
    let mut outcome = scan(&config.project_root, &config.ignored_directories);
    outcome.files.retain(|path| is_source_file(path, config));
    debug!(
        root = %config.project_root.display(),
        sources = outcome.files.len(),
        "source scan complete"
    );
    outcome
}

/// Check whether a path's extension marks it as source.
pub fn is_source_file(path: &Path, config: &ValidatorConfig) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| config.is_source_extension(ext))
        .unwrap_or(false)
}
