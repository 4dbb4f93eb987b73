use std::fmt;

/// Stable identity of a script, used as the key of every cache.
///
/// Derived from the script's resource path (or whatever stable handle the
/// host has). Two handles with the same `ScriptId` are the same script.
///
/// # Examples
///
/// ```
/// use script_interfaces_core::ScriptId;
///
/// let id = ScriptId::new("res://enemies/goblin.gd");
/// assert_eq!(id.as_str(), "res://enemies/goblin.gd");
/// assert_eq!(id.to_string(), "res://enemies/goblin.gd");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptId(String);

impl ScriptId {
    /// Create an identity from any string-like key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The identity key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScriptId {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ScriptId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for ScriptId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
