//! Descriptor Resolver - scripts to descriptors, names to interfaces.
//!
//! Four memo tables:
//!
//! - descriptors: script identity -> [`ScriptDescriptor`]
//! - interface lists: implementor identity -> resolved `implements` list
//! - identifiers: (identity, [`IdentifierMode`]) -> declared identifier
//! - interface names: requested name -> interface descriptor
//!
//! ## Interface name resolution
//!
//! A bare string in an `implements` list (or passed by a caller) goes through
//! these steps, in order, each fatal on failure:
//!
//! 1. `allow_string_classes` must be enabled
//! 2. with `strict_interface_prefix`, the name must start with the prefix
//! 3. with `strict_interface_prefix`, the name must be in the class catalog
//! 4. the host loader's cache is tried first, then the catalog path
//!
//! The prefix is checked on the literal name, before anything is loaded.
//! Once a name resolves, later requests for it never reach the host again.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use script_interfaces_core::{
    ConformanceError, ConstantValue, HostScript, InterfaceRef, MemberSet, Result, ScriptHost,
    ScriptId, ScriptRef, Scripted, ValidatorConfig,
};
use script_interfaces_registry::{ClassCatalog, MemoStats, MemoTable};

use crate::identifier::{IdentifierMode, declared_identifier};

/// Everything a resolution needs from its surroundings.
pub struct Environment<'a, H: ?Sized> {
    pub host: &'a H,
    pub catalog: &'a ClassCatalog,
    pub config: &'a ValidatorConfig,
}

impl<H: ?Sized> Clone for Environment<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: ?Sized> Copy for Environment<'_, H> {}

/// Resolved view of a script.
///
/// Two descriptors are equal when their identities are equal.
#[derive(Clone)]
pub struct ScriptDescriptor {
    id: ScriptId,
    script: ScriptRef,
    has_source: bool,
    identifier: String,
    is_interface: bool,
}

impl ScriptDescriptor {
    fn new(script: ScriptRef, identifier: String) -> Self {
        Self {
            id: script.identity(),
            has_source: script.has_source_text(),
            script,
            identifier,
            is_interface: false,
        }
    }

    /// Stable identity key.
    pub fn id(&self) -> &ScriptId {
        &self.id
    }

    /// Underlying script handle.
    pub fn script(&self) -> &ScriptRef {
        &self.script
    }

    /// Whether the script exposes source text.
    pub fn has_source(&self) -> bool {
        self.has_source
    }

    /// Source text, if any.
    pub fn source(&self) -> Option<&str> {
        self.script.source_text()
    }

    /// Declared identifier (class name, path, or `"Unknown"`).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Identifier for diagnostics, never empty.
    pub fn display_name(&self) -> &str {
        if self.identifier.is_empty() {
            self.id.as_str()
        } else {
            &self.identifier
        }
    }

    /// Whether this descriptor was resolved from an `implements` list.
    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    /// Directly declared signals and methods.
    pub fn members(&self) -> MemberSet {
        MemberSet::from_declared(
            self.script.declared_signal_names(),
            self.script.declared_method_names(),
        )
    }

    /// Name of the first constant the script declares, if any.
    pub fn first_constant(&self) -> Option<String> {
        self.script
            .constant_members()
            .into_iter()
            .next()
            .map(|(name, _)| name)
    }

    fn as_interface(&self, identifier: String) -> Self {
        Self {
            identifier,
            is_interface: true,
            ..self.clone()
        }
    }
}

impl PartialEq for ScriptDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ScriptDescriptor {}

impl fmt::Debug for ScriptDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptDescriptor")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("has_source", &self.has_source)
            .field("is_interface", &self.is_interface)
            .finish()
    }
}

/// Declared interface list of one implementor.
pub type InterfaceList = Arc<[ScriptDescriptor]>;

/// Memoizing resolver from scripts and names to descriptors.
#[derive(Default)]
pub struct Resolver {
    descriptors: MemoTable<ScriptId, ScriptDescriptor>,
    interface_lists: MemoTable<ScriptId, InterfaceList>,
    identifiers: MemoTable<(ScriptId, IdentifierMode), String>,
    interface_names: MemoTable<String, ScriptDescriptor>,
}

impl Resolver {
    /// Create a resolver with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an object (or a script) to its descriptor.
    pub fn descriptor_of(&mut self, subject: &dyn Scripted) -> Result<ScriptDescriptor> {
        let script = subject
            .attached_script()
            .ok_or(ConformanceError::NoScriptAttached)?;
        Ok(self.descriptor_of_script(script))
    }

    fn descriptor_of_script(&mut self, script: ScriptRef) -> ScriptDescriptor {
        let id = script.identity();
        if let Some(descriptor) = self.descriptors.lookup(&id) {
            trace!(script = %id, "descriptor cache hit");
            return descriptor;
        }
        let identifier = self.identifier(&script, IdentifierMode::Lenient);
        let descriptor = ScriptDescriptor::new(script, identifier);
        debug!(script = %id, identifier = %descriptor.identifier, "descriptor resolved");
        self.descriptors.insert(id, descriptor)
    }

    /// Memoized declared identifier of a script.
    pub fn identifier(&mut self, script: &ScriptRef, mode: IdentifierMode) -> String {
        self.identifiers
            .get_or_insert_with((script.identity(), mode), || {
                declared_identifier(script.as_ref(), mode)
            })
    }

    /// Resolved `implements` list of an implementor.
    ///
    /// A script without an `implements` constant has an empty list.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn declared_interfaces<H>(
        &mut self,
        env: Environment<'_, H>,
        implementor: &ScriptDescriptor,
    ) -> Result<InterfaceList>
    where
        H: ScriptHost + ?Sized,
    {
        if let Some(list) = self.interface_lists.lookup(implementor.id()) {
            trace!(script = %implementor.id(), "interface list cache hit");
            return Ok(list);
        }

        let declared = implementor
            .script()
            .constant(&env.config.implements_constant);
        let entries = match declared {
            None => Vec::new(),
            Some(ConstantValue::Array(items)) => items,
            Some(single @ (ConstantValue::String(_) | ConstantValue::Script(_))) => vec![single],
            Some(other) => {
                return Err(ConformanceError::InvalidImplementsEntry {
                    implementor: implementor.display_name().to_owned(),
                    entry: format!("{other:?}"),
                });
            }
        };

        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            let interface = match entry {
                ConstantValue::String(name) => self.interface_by_name(env, implementor, &name)?,
                ConstantValue::Script(script) => self.interface_from_script(script),
                other => {
                    return Err(ConformanceError::InvalidImplementsEntry {
                        implementor: implementor.display_name().to_owned(),
                        entry: format!("{other:?}"),
                    });
                }
            };
            resolved.push(interface);
        }

        debug!(
            script = %implementor.id(),
            interfaces = ?resolved.iter().map(ScriptDescriptor::display_name).collect::<Vec<_>>(),
            "interface list resolved"
        );
        Ok(self
            .interface_lists
            .insert(implementor.id().clone(), resolved.into()))
    }

    /// Resolve an interface requested by a caller on behalf of `implementor`.
    pub fn resolve_interface<H>(
        &mut self,
        env: Environment<'_, H>,
        implementor: &ScriptDescriptor,
        interface: &InterfaceRef,
    ) -> Result<ScriptDescriptor>
    where
        H: ScriptHost + ?Sized,
    {
        match interface {
            InterfaceRef::Name(name) => self.interface_by_name(env, implementor, name),
            InterfaceRef::Script(script) => Ok(self.interface_from_script(Arc::clone(script))),
        }
    }

    fn interface_from_script(&mut self, script: ScriptRef) -> ScriptDescriptor {
        let identifier = self.identifier(&script, IdentifierMode::Strict);
        self.descriptor_of_script(script).as_interface(identifier)
    }

    fn interface_by_name<H>(
        &mut self,
        env: Environment<'_, H>,
        implementor: &ScriptDescriptor,
        name: &str,
    ) -> Result<ScriptDescriptor>
    where
        H: ScriptHost + ?Sized,
    {
        let config = env.config;
        if !config.allow_string_classes {
            return Err(ConformanceError::StringInterfacesDisallowed {
                implementor: implementor.display_name().to_owned(),
                interface: name.to_owned(),
            });
        }

        if config.strict_interface_prefix {
            if !name.starts_with(&config.interface_prefix) {
                return Err(ConformanceError::MissingInterfacePrefix {
                    implementor: implementor.display_name().to_owned(),
                    interface: name.to_owned(),
                    prefix: config.interface_prefix.clone(),
                });
            }
            if !env.catalog.contains(name) {
                return Err(unregistered(implementor, name));
            }
        }

        if let Some(interface) = self.interface_names.lookup(name) {
            trace!(interface = name, "interface name cache hit");
            return Ok(interface);
        }

        let script = if env.host.has_cached_script(name) {
            env.host.load_script(name)?
        } else {
            let path = env
                .catalog
                .resolve(name)
                .ok_or_else(|| unregistered(implementor, name))?;
            env.host.load_script(&path.to_string_lossy())?
        };
        let interface = self.interface_from_script(script);
        Ok(self.interface_names.insert(name.to_owned(), interface))
    }

    /// Counters of the descriptor table.
    pub fn descriptor_stats(&self) -> MemoStats {
        self.descriptors.stats()
    }

    /// Counters of the interface-list table.
    pub fn interface_list_stats(&self) -> MemoStats {
        self.interface_lists.stats()
    }

    /// Counters of the identifier table.
    pub fn identifier_stats(&self) -> MemoStats {
        self.identifiers.stats()
    }

    /// Counters of the interface-name table.
    pub fn interface_name_stats(&self) -> MemoStats {
        self.interface_names.stats()
    }
}

fn unregistered(implementor: &ScriptDescriptor, name: &str) -> ConformanceError {
    ConformanceError::UnregisteredInterface {
        implementor: implementor.display_name().to_owned(),
        interface: name.to_owned(),
    }
}
