//! Core types for script interface conformance.
//!
//! This crate holds everything the other layers share: the host object model
//! traits, script identities, capability sets, configuration and errors.

mod config;
mod error;
mod host;
mod member;
mod script_id;

pub use config::{DEFAULT_IGNORED_DIRECTORIES, DEFAULT_SOURCE_EXTENSIONS, ValidatorConfig};
pub use error::{ConformanceError, FailurePolicy, HostError, Result};
pub use host::{
    ClassCatalogEntry, ConstantValue, HostScript, InterfaceRef, Interfaces, ScriptHost,
    ScriptRef, Scripted,
};
pub use member::{MemberKind, MemberSet};
pub use script_id::ScriptId;
