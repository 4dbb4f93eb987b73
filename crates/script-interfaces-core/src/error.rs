//! Error types for interface conformance checking.
//!
//! Conformance failures travel on two channels:
//!
//! ```text
//! FailurePolicy::Fatal  -> Err(ConformanceError)   (caller aborts at the boundary)
//! FailurePolicy::Soft   -> Ok(false)               (member/declaration mismatches only)
//! ```
//!
//! Configuration violations (a disallowed string interface name, a missing
//! prefix, an unregistered interface, an interface carrying constants) are
//! always `Err`, whatever policy the caller picked.

use thiserror::Error;

// ============================================================================
// Host Errors
// ============================================================================

/// Errors reported by the host object model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host could not load a script at the given path.
    #[error("failed to load script at '{path}': {reason}")]
    LoadFailed {
        /// Path that was requested.
        path: String,
        /// Host-provided reason.
        reason: String,
    },

    /// The host has no script registered under this path.
    #[error("no script at '{0}'")]
    NotFound(String),
}

// ============================================================================
// Conformance Errors
// ============================================================================

/// Fatal diagnostics produced while resolving or checking interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConformanceError {
    /// An `implements` list used a bare string while string names are disabled.
    #[error("'{implementor}' declares interface '{interface}' by name, but string interface names are disabled")]
    StringInterfacesDisallowed {
        /// Declared identifier of the implementor.
        implementor: String,
        /// The bare interface name.
        interface: String,
    },

    /// A string interface name lacks the required prefix.
    #[error("interface '{interface}' declared by '{implementor}' must start with '{prefix}'")]
    MissingInterfacePrefix {
        /// Declared identifier of the implementor.
        implementor: String,
        /// The offending interface name.
        interface: String,
        /// The configured prefix.
        prefix: String,
    },

    /// A string interface name is not a registered global class.
    #[error("interface '{interface}' declared by '{implementor}' is not a registered class")]
    UnregisteredInterface {
        /// Declared identifier of the implementor.
        implementor: String,
        /// The unknown interface name.
        interface: String,
    },

    /// An interface declares constant members.
    #[error("interface '{interface}' must not declare constants (found '{constant}')")]
    InterfaceHasConstants {
        /// Identifier of the interface.
        interface: String,
        /// First constant found.
        constant: String,
    },

    /// The implementor exposes no source text, so nothing can be compared.
    #[error("'{implementor}' has no source and cannot implement '{interface}'")]
    MissingSource {
        /// Identifier of the implementor.
        implementor: String,
        /// Identifier of the interface.
        interface: String,
    },

    /// A signal required by the interface is not declared by the implementor.
    #[error("'{implementor}' does not implement signal '{signal}' of interface '{interface}'")]
    MissingSignal {
        /// Identifier of the implementor.
        implementor: String,
        /// Identifier of the interface.
        interface: String,
        /// The missing signal.
        signal: String,
    },

    /// A method required by the interface is not declared by the implementor.
    #[error("'{implementor}' does not implement method '{method}' of interface '{interface}'")]
    MissingMethod {
        /// Identifier of the implementor.
        implementor: String,
        /// Identifier of the interface.
        interface: String,
        /// The missing method.
        method: String,
    },

    /// The interface is not in the implementor's declared list.
    #[error("'{implementor}' does not declare interface '{interface}'")]
    NotDeclared {
        /// Identifier of the implementor.
        implementor: String,
        /// Identifier of the interface.
        interface: String,
    },

    /// An `implements` entry is neither a name nor a script.
    #[error("'{implementor}' has an invalid implements entry: {entry}")]
    InvalidImplementsEntry {
        /// Identifier of the implementor.
        implementor: String,
        /// Debug rendering of the entry.
        entry: String,
    },

    /// The object has no script attached.
    #[error("object has no script attached")]
    NoScriptAttached,

    /// The host failed while loading an interface script.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl ConformanceError {
    /// Check whether this error is a member or declaration mismatch.
    ///
    /// Mismatches are the only errors that [`FailurePolicy::Soft`] turns
    /// into a `false` return.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            ConformanceError::MissingSource { .. }
                | ConformanceError::MissingSignal { .. }
                | ConformanceError::MissingMethod { .. }
                | ConformanceError::NotDeclared { .. }
        )
    }
}

/// Result alias used throughout the crates.
pub type Result<T> = std::result::Result<T, ConformanceError>;

// ============================================================================
// Failure Policy
// ============================================================================

/// How a failed check is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FailurePolicy {
    /// Report mismatches as `Err`, for the caller to abort on.
    #[default]
    Fatal,
    /// Report mismatches as `Ok(false)`.
    Soft,
}

impl FailurePolicy {
    /// Route a mismatch through this policy.
    ///
    /// Non-mismatch errors are returned unchanged under either policy.
    pub fn fail(self, error: ConformanceError) -> Result<bool> {
        match self {
            FailurePolicy::Soft if error.is_mismatch() => Ok(false),
            _ => Err(error),
        }
    }
}

impl From<bool> for FailurePolicy {
    /// `true` means assert on failure.
    fn from(assert_on_fail: bool) -> Self {
        if assert_on_fail {
            FailurePolicy::Fatal
        } else {
            FailurePolicy::Soft
        }
    }
}
