//! Runtime interface conformance for scripts.
//!
//! A script declares the interfaces it claims to implement in an
//! `implements` constant. The [`Validator`] checks that the script directly
//! declares every signal and method each interface declares, memoizing every
//! step for the lifetime of the process.
//!
//! ```ignore
//! use script_interfaces::prelude::*;
//!
//! let mut validator = Validator::new(host, ValidatorConfig::default());
//! validator.validate_all_or_abort();
//!
//! let damagable = validator.implementations(&nodes, "IDamagable", false)?;
//! ```

pub use script_interfaces_core::*;
pub use script_interfaces_registry::{ClassCatalog, MemoStats, MemoTable};
pub use script_interfaces_validator::{
    CacheStats, ConformanceChecker, IdentifierMode, ScanError, ScanOutcome, ScriptDescriptor,
    SweepReport, Validator, extract_class_name, scan, scan_sources,
};

pub mod fatal {
    pub use script_interfaces_validator::fatal::{abort, or_abort};
}

pub mod prelude {
    pub use crate::fatal::or_abort;
    pub use script_interfaces_core::{
        ConformanceError, ConstantValue, FailurePolicy, HostError, HostScript, InterfaceRef,
        Interfaces, ScriptHost, ScriptId, ScriptRef, Scripted, ValidatorConfig,
    };
    pub use script_interfaces_validator::{SweepReport, Validator};
}
