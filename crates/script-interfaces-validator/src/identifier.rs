//! Declared-identifier extraction from script source.

use lazy_static::lazy_static;
use regex::Regex;

use script_interfaces_core::HostScript;

/// Identifier reported for scripts that expose no source text.
pub const UNKNOWN_IDENTIFIER: &str = "Unknown";

lazy_static! {
    static ref CLASS_NAME: Regex =
        Regex::new(r"(?m)^[ \t]*class_name[ \t]+([A-Za-z_][A-Za-z0-9_]*)")
            .expect("class_name pattern is valid");
}

/// How a script without a `class_name` declaration is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierMode {
    /// Fall back to the defining path.
    Lenient,
    /// Fall back to the empty string.
    Strict,
}

/// First `class_name` declared in `source`.
///
/// ```
/// use script_interfaces_validator::extract_class_name;
///
/// let source = "extends Node\nclass_name IDamagable\n\nsignal damage\n";
/// assert_eq!(extract_class_name(source), Some("IDamagable"));
/// assert_eq!(extract_class_name("extends Node\n"), None);
/// ```
pub fn extract_class_name(source: &str) -> Option<&str> {
    CLASS_NAME
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Declared identifier of a script, used in diagnostics.
pub fn declared_identifier(script: &dyn HostScript, mode: IdentifierMode) -> String {
    let Some(source) = script.source_text() else {
        return UNKNOWN_IDENTIFIER.to_owned();
    };
    match (extract_class_name(source), mode) {
        (Some(name), _) => name.to_owned(),
        (None, IdentifierMode::Lenient) => script.defining_path().to_owned(),
        (None, IdentifierMode::Strict) => String::new(),
    }
}
