//! Validation Orchestrator - the public query surface.
//!
//! [`Validator`] owns the host, the class catalog and every cache. All
//! operations run to completion on the calling thread.

use tracing::{debug, info, warn};

use script_interfaces_core::{
    ConformanceError, FailurePolicy, InterfaceRef, Interfaces, Result, ScriptHost, ScriptId,
    Scripted, ValidatorConfig,
};
use script_interfaces_registry::{ClassCatalog, MemoStats};

use crate::checker::ConformanceChecker;
use crate::resolver::{Environment, InterfaceList, Resolver, ScriptDescriptor};
use crate::scanner::{ScanError, scan_sources};

/// Snapshot of every cache's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub descriptors: MemoStats,
    pub interface_lists: MemoStats,
    pub identifiers: MemoStats,
    pub interface_names: MemoStats,
    pub conformance: MemoStats,
}

/// Outcome of the startup sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Whether the sweep ran (it is skipped outside authoring contexts).
    pub ran: bool,
    /// Source files found under the project root.
    pub files_scanned: usize,
    /// Scripts that declare at least one interface.
    pub scripts_with_interfaces: usize,
    /// (script, interface) pairs validated.
    pub validated: usize,
    /// Scripts reported as non-conforming from an earlier cached result.
    pub failed: Vec<ScriptId>,
    /// Directories the scanner could not walk.
    pub scan_diagnostics: Vec<ScanError>,
}

/// Interface conformance validator bound to one host.
///
/// # Example
///
/// ```ignore
/// let mut validator = Validator::new(host, ValidatorConfig::default());
/// validator.validate_all()?;
///
/// let ok = validator.implements(&player, "IDamagable", true, FailurePolicy::Soft)?;
/// ```
pub struct Validator<H> {
    host: H,
    config: ValidatorConfig,
    catalog: ClassCatalog,
    resolver: Resolver,
    checker: ConformanceChecker,
}

impl<H: ScriptHost> Validator<H> {
    /// Create a validator, building the class catalog from the host.
    pub fn new(host: H, config: ValidatorConfig) -> Self {
        let catalog = ClassCatalog::from_host(&host);
        Self::with_catalog(host, config, catalog)
    }

    /// Create a validator over an already built catalog.
    pub fn with_catalog(host: H, config: ValidatorConfig, catalog: ClassCatalog) -> Self {
        Self {
            host,
            config,
            catalog,
            resolver: Resolver::new(),
            checker: ConformanceChecker::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    /// Check whether `implementation` satisfies every requested interface.
    ///
    /// With `validate` the full structural check runs; without it only the
    /// declared `implements` list is consulted. An implementor that declares
    /// no interfaces satisfies nothing.
    pub fn implements(
        &mut self,
        implementation: &dyn Scripted,
        interfaces: impl Into<Interfaces>,
        validate: bool,
        policy: impl Into<FailurePolicy>,
    ) -> Result<bool> {
        let interfaces = interfaces.into();
        let policy = policy.into();

        let implementor = self.resolver.descriptor_of(implementation)?;
        let declared = self.declared_list(&implementor)?;
        if declared.is_empty() {
            return Ok(false);
        }

        for requested in interfaces.as_slice() {
            let env = Environment {
                host: &self.host,
                catalog: &self.catalog,
                config: &self.config,
            };
            let interface = self.resolver.resolve_interface(env, &implementor, requested)?;

            let satisfied = if validate {
                self.checker.check(&implementor, &interface, policy)?
            } else if declared.contains(&interface) {
                true
            } else {
                policy.fail(ConformanceError::NotDeclared {
                    implementor: implementor.display_name().to_owned(),
                    interface: interface.display_name().to_owned(),
                })?
            };

            if !satisfied {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [`implements`](Self::implements) with the configured validation mode,
    /// failing fatally.
    pub fn implements_default(
        &mut self,
        implementation: &dyn Scripted,
        interfaces: impl Into<Interfaces>,
    ) -> Result<bool> {
        let validate = self.config.strict_validation;
        self.implements(implementation, interfaces, validate, FailurePolicy::Fatal)
    }

    /// Keep the objects that implement every requested interface.
    ///
    /// Order is preserved. Objects with no script attached are dropped.
    pub fn implementations<'o, O: Scripted>(
        &mut self,
        objects: &'o [O],
        interfaces: impl Into<Interfaces>,
        validate: bool,
    ) -> Result<Vec<&'o O>> {
        self.implementations_with_policy(objects, interfaces, validate, FailurePolicy::Fatal)
    }

    /// [`implementations`](Self::implementations) with an explicit failure policy.
    pub fn implementations_with_policy<'o, O: Scripted>(
        &mut self,
        objects: &'o [O],
        interfaces: impl Into<Interfaces>,
        validate: bool,
        policy: FailurePolicy,
    ) -> Result<Vec<&'o O>> {
        let interfaces = interfaces.into();
        let mut kept = Vec::new();
        for object in objects {
            match self.implements(object, interfaces.clone(), validate, policy) {
                Ok(true) => kept.push(object),
                Ok(false) | Err(ConformanceError::NoScriptAttached) => {}
                Err(error) => return Err(error),
            }
        }
        Ok(kept)
    }

    /// Resolved `implements` list of an object or script.
    pub fn declared_interfaces(&mut self, subject: &dyn Scripted) -> Result<Vec<ScriptDescriptor>> {
        let implementor = self.resolver.descriptor_of(subject)?;
        Ok(self.declared_list(&implementor)?.to_vec())
    }

    fn declared_list(&mut self, implementor: &ScriptDescriptor) -> Result<InterfaceList> {
        let env = Environment {
            host: &self.host,
            catalog: &self.catalog,
            config: &self.config,
        };
        self.resolver.declared_interfaces(env, implementor)
    }

    /// Validate every declared interface in the project.
    ///
    /// Runs only when the host reports an authoring context. Every source
    /// file under the project root is loaded once; the first malformed or
    /// non-conforming declaration is returned as an error.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn validate_all(&mut self) -> Result<SweepReport> {
        if !self.host.is_authoring() {
            debug!("not an authoring context, startup sweep skipped");
            return Ok(SweepReport::default());
        }

        let scan = scan_sources(&self.config);
        let mut report = SweepReport {
            ran: true,
            files_scanned: scan.files.len(),
            scan_diagnostics: scan.diagnostics,
            ..SweepReport::default()
        };
        info!(
            root = %self.config.project_root.display(),
            files = report.files_scanned,
            "validating declared interfaces"
        );

        let validate = self.config.strict_validation;
        for path in &scan.files {
            let script = self.host.load_script(&path.to_string_lossy())?;
            let implementor = self.resolver.descriptor_of(&script)?;
            let declared = self.declared_list(&implementor)?;
            if declared.is_empty() {
                continue;
            }

            report.scripts_with_interfaces += 1;
            report.validated += declared.len();
            let interfaces: Interfaces = declared
                .iter()
                .map(|d| InterfaceRef::from(d.script()))
                .collect();
            if !self.implements(&script, interfaces, validate, FailurePolicy::Fatal)? {
                warn!(script = %implementor.id(), "script previously recorded as non-conforming");
                report.failed.push(implementor.id().clone());
            }
        }

        info!(
            scripts = report.scripts_with_interfaces,
            validated = report.validated,
            "startup sweep complete"
        );
        Ok(report)
    }

    /// [`validate_all`](Self::validate_all), aborting on the first violation.
    ///
    /// A script recorded as non-conforming by an earlier query also aborts.
    #[track_caller]
    pub fn validate_all_or_abort(&mut self) -> SweepReport {
        let report = crate::fatal::or_abort(self.validate_all());
        if let Some(script) = report.failed.first() {
            crate::fatal::abort(format_args!(
                "script '{script}' does not conform to its declared interfaces"
            ));
        }
        report
    }

    /// Counters of every cache.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            descriptors: self.resolver.descriptor_stats(),
            interface_lists: self.resolver.interface_list_stats(),
            identifiers: self.resolver.identifier_stats(),
            interface_names: self.resolver.interface_name_stats(),
            conformance: self.checker.stats(),
        }
    }
}
