//! Process-boundary adapter for fatal diagnostics.
//!
//! The engine reports every fatal condition as an `Err`. Hosts that want the
//! assert-and-abort behaviour call [`or_abort`] at the outermost layer.

use std::fmt;

use tracing::error;

use script_interfaces_core::Result;

/// Unwrap `result`, aborting with the diagnostic on error.
///
/// The diagnostic is logged before the panic so it reaches the host's log
/// even when panics are configured to abort without unwinding.
#[track_caller]
pub fn or_abort<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => abort(err),
    }
}

/// Log `diagnostic` and abort.
#[track_caller]
pub fn abort(diagnostic: impl fmt::Display) -> ! {
    error!(error = %diagnostic, "interface conformance violation");
    panic!("interface conformance violation: {diagnostic}");
}
