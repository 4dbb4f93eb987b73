//! Interface conformance engine.
//!
//! Layers, leaves first:
//!
//! - [`scanner`] - breadth-first walk of the project tree
//! - [`identifier`] - `class_name` extraction from source
//! - [`resolver`] - memoized script descriptors and `implements` lists
//! - [`checker`] - memoized signal/method membership comparison
//! - [`validator`] - `implements`, `implementations` and the startup sweep

pub mod checker;
pub mod fatal;
pub mod identifier;
pub mod resolver;
pub mod scanner;
pub mod validator;

pub use checker::ConformanceChecker;
pub use identifier::{IdentifierMode, UNKNOWN_IDENTIFIER, declared_identifier, extract_class_name};
pub use resolver::{Environment, InterfaceList, Resolver, ScriptDescriptor};
pub use scanner::{ScanError, ScanOutcome, is_source_file, scan, scan_sources};
pub use validator::{CacheStats, SweepReport, Validator};
