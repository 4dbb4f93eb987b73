use std::fmt;

use rustc_hash::FxHashSet;

/// Kind of a directly declared script member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberKind {
    /// A named event declaration.
    Signal,
    /// A callable method.
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Signal => f.write_str("signal"),
            MemberKind::Method => f.write_str("method"),
        }
    }
}

/// Capability set of a script: the `(kind, name)` pairs it declares directly.
///
/// Conformance is subset inclusion. Insertion order is kept so that the
/// first missing member is reported in the order the interface declared it,
/// with all signals ahead of all methods.
///
/// # Examples
///
/// ```
/// use script_interfaces_core::{MemberKind, MemberSet};
///
/// let mut implementor = MemberSet::new();
/// implementor.extend(MemberKind::Signal, ["damage", "died"]);
/// implementor.extend(MemberKind::Method, ["deal_damage"]);
///
/// let mut interface = MemberSet::new();
/// interface.insert(MemberKind::Signal, "damage");
/// assert!(implementor.first_missing(&interface).is_none());
///
/// interface.insert(MemberKind::Signal, "healed");
/// assert_eq!(
///     implementor.first_missing(&interface),
///     Some((MemberKind::Signal, "healed"))
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemberSet {
    order: Vec<(MemberKind, String)>,
    index: FxHashSet<(MemberKind, String)>,
}

impl MemberSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from declared signal and method names.
    pub fn from_declared<S, M>(signals: S, methods: M) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        let mut set = Self::new();
        set.extend(MemberKind::Signal, signals);
        set.extend(MemberKind::Method, methods);
        set
    }

    /// Insert a member. Returns `false` if it was already present.
    pub fn insert(&mut self, kind: MemberKind, name: impl Into<String>) -> bool {
        let key = (kind, name.into());
        if self.index.contains(&key) {
            return false;
        }
        self.index.insert(key.clone());
        self.order.push(key);
        true
    }

    /// Insert every name with the given kind.
    pub fn extend<I>(&mut self, kind: MemberKind, names: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for name in names {
            self.insert(kind, name);
        }
    }

    /// Check whether a member is present.
    pub fn contains(&self, kind: MemberKind, name: &str) -> bool {
        self.index.contains(&(kind, name.to_owned()))
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MemberKind, &str)> {
        self.order.iter().map(|(kind, name)| (*kind, name.as_str()))
    }

    /// First member of `required` absent from `self`.
    ///
    /// Signals are examined before methods regardless of insertion order.
    pub fn first_missing<'r>(&self, required: &'r MemberSet) -> Option<(MemberKind, &'r str)> {
        [MemberKind::Signal, MemberKind::Method]
            .into_iter()
            .flat_map(|kind| required.iter().filter(move |(k, _)| *k == kind))
            .find(|(kind, name)| !self.contains(*kind, name))
    }

    /// Check subset inclusion.
    pub fn is_superset_of(&self, required: &MemberSet) -> bool {
        self.first_missing(required).is_none()
    }
}
