//! Conformance Checker - structural membership comparison.
//!
//! ## Algorithm
//!
//! 1. An interface without source text constrains nothing: pass.
//! 2. An implementor without source text fails (policy applies).
//! 3. An interface declaring constants is malformed: always fatal.
//! 4. Every signal the interface declares must be declared by the implementor.
//! 5. Same for methods.
//!
//! Only directly declared members count on either side; inherited members
//! are not part of a script's contribution.
//!
//! Results are memoized by the ordered pair (implementor, interface). The
//! first computed result is kept, whichever [`FailurePolicy`] produced it.

use tracing::{debug, trace, warn};

use script_interfaces_core::{ConformanceError, FailurePolicy, MemberKind, Result, ScriptId};
use script_interfaces_registry::{MemoStats, MemoTable};

use crate::resolver::ScriptDescriptor;

/// Memoizing structural checker.
#[derive(Debug, Default)]
pub struct ConformanceChecker {
    results: MemoTable<(ScriptId, ScriptId), bool>,
}

impl ConformanceChecker {
    /// Create a checker with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `implementor` declares every member `interface` requires.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn check(
        &mut self,
        implementor: &ScriptDescriptor,
        interface: &ScriptDescriptor,
        policy: FailurePolicy,
    ) -> Result<bool> {
        let key = (implementor.id().clone(), interface.id().clone());
        if let Some(conforms) = self.results.lookup(&key) {
            trace!(
                implementor = %implementor.id(),
                interface = %interface.id(),
                conforms,
                "conformance cache hit"
            );
            return Ok(conforms);
        }

        match compare(implementor, interface) {
            Ok(()) => {
                debug!(
                    implementor = implementor.display_name(),
                    interface = interface.display_name(),
                    "conforms"
                );
                Ok(self.results.insert(key, true))
            }
            Err(error) if error.is_mismatch() => {
                self.results.insert(key, false);
                if policy == FailurePolicy::Soft {
                    warn!(%error, "conformance check failed");
                }
                policy.fail(error)
            }
            Err(error) => Err(error),
        }
    }

    /// Counters of the result table.
    pub fn stats(&self) -> MemoStats {
        self.results.stats()
    }
}

fn compare(implementor: &ScriptDescriptor, interface: &ScriptDescriptor) -> Result<()> {
    if !interface.has_source() {
        return Ok(());
    }

    if !implementor.has_source() {
        return Err(ConformanceError::MissingSource {
            implementor: implementor.display_name().to_owned(),
            interface: interface.display_name().to_owned(),
        });
    }

    if let Some(constant) = interface.first_constant() {
        return Err(ConformanceError::InterfaceHasConstants {
            interface: interface.display_name().to_owned(),
            constant,
        });
    }

    let required = interface.members();
    let provided = implementor.members();
    match provided.first_missing(&required) {
        None => Ok(()),
        Some((MemberKind::Signal, signal)) => Err(ConformanceError::MissingSignal {
            implementor: implementor.display_name().to_owned(),
            interface: interface.display_name().to_owned(),
            signal: signal.to_owned(),
        }),
        Some((MemberKind::Method, method)) => Err(ConformanceError::MissingMethod {
            implementor: implementor.display_name().to_owned(),
            interface: interface.display_name().to_owned(),
            method: method.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Resolver;
    use script_interfaces_core::{ConstantValue, HostScript, ScriptRef};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Fake {
        path: &'static str,
        source: Option<&'static str>,
        signals: Vec<&'static str>,
        methods: Vec<&'static str>,
        constants: Vec<&'static str>,
        introspections: AtomicUsize,
    }

    impl HostScript for Fake {
        fn identity(&self) -> ScriptId {
            ScriptId::new(self.path)
        }
        fn source_text(&self) -> Option<&str> {
            self.source
        }
        fn constant_members(&self) -> Vec<(String, ConstantValue)> {
            self.constants
                .iter()
                .map(|c| (c.to_string(), ConstantValue::Other("0".into())))
                .collect()
        }
        fn declared_signal_names(&self) -> Vec<String> {
            self.introspections.fetch_add(1, Ordering::Relaxed);
            self.signals.iter().map(|s| s.to_string()).collect()
        }
        fn declared_method_names(&self) -> Vec<String> {
            self.methods.iter().map(|s| s.to_string()).collect()
        }
        fn defining_path(&self) -> &str {
            self.path
        }
    }

    fn describe(resolver: &mut Resolver, fake: Fake) -> (ScriptDescriptor, Arc<Fake>) {
        let fake = Arc::new(fake);
        let script: ScriptRef = fake.clone();
        (resolver.descriptor_of(&script).unwrap(), fake)
    }

    fn implementor(signals: Vec<&'static str>, methods: Vec<&'static str>) -> Fake {
        Fake {
            path: "res://player.gd",
            source: Some("class_name Player"),
            signals,
            methods,
            ..Fake::default()
        }
    }

    fn interface(signals: Vec<&'static str>, methods: Vec<&'static str>) -> Fake {
        Fake {
            path: "res://i_damagable.gd",
            source: Some("class_name IDamagable"),
            signals,
            methods,
            ..Fake::default()
        }
    }

    #[test]
    fn superset_conforms() {
        let mut resolver = Resolver::new();
        let (imp, _) = describe(&mut resolver, implementor(vec!["a", "b"], vec!["m"]));
        let (iface, _) = describe(&mut resolver, interface(vec!["a"], vec!["m"]));

        let mut checker = ConformanceChecker::new();
        assert_eq!(checker.check(&imp, &iface, FailurePolicy::Fatal), Ok(true));
    }

    #[test]
    fn missing_signal_soft_and_fatal() {
        let mut resolver = Resolver::new();
        let (imp, _) = describe(&mut resolver, implementor(vec!["a", "b"], vec!["m"]));
        let (iface, _) = describe(&mut resolver, interface(vec!["a", "c"], vec!["m"]));

        let mut soft = ConformanceChecker::new();
        assert_eq!(soft.check(&imp, &iface, FailurePolicy::Soft), Ok(false));

        let mut fatal = ConformanceChecker::new();
        assert_eq!(
            fatal.check(&imp, &iface, FailurePolicy::Fatal),
            Err(ConformanceError::MissingSignal {
                implementor: "Player".into(),
                interface: "IDamagable".into(),
                signal: "c".into(),
            })
        );
    }

    #[test]
    fn missing_method_is_named() {
        let mut resolver = Resolver::new();
        let (imp, _) = describe(&mut resolver, implementor(vec![], vec!["heal"]));
        let (iface, _) = describe(&mut resolver, interface(vec![], vec!["deal_damage"]));

        let err = ConformanceChecker::new()
            .check(&imp, &iface, FailurePolicy::Fatal)
            .unwrap_err();
        assert!(err.to_string().contains("method 'deal_damage'"));
    }

    #[test]
    fn interface_without_source_always_passes() {
        let mut resolver = Resolver::new();
        let (imp, _) = describe(&mut resolver, implementor(vec![], vec![]));
        let (iface, _) = describe(
            &mut resolver,
            Fake {
                path: "res://native.gd",
                signals: vec!["never_checked"],
                ..Fake::default()
            },
        );

        let mut checker = ConformanceChecker::new();
        assert_eq!(checker.check(&imp, &iface, FailurePolicy::Soft), Ok(true));
    }

    #[test]
    fn implementor_without_source_fails() {
        let mut resolver = Resolver::new();
        let (imp, _) = describe(
            &mut resolver,
            Fake {
                path: "res://opaque.gd",
                ..Fake::default()
            },
        );
        let (iface, _) = describe(&mut resolver, interface(vec![], vec![]));

        assert_eq!(
            ConformanceChecker::new().check(&imp, &iface, FailurePolicy::Soft),
            Ok(false)
        );
        assert_eq!(
            ConformanceChecker::new().check(&imp, &iface, FailurePolicy::Fatal),
            Err(ConformanceError::MissingSource {
                implementor: "Unknown".into(),
                interface: "IDamagable".into(),
            })
        );
    }

    #[test]
    fn interface_constants_are_fatal_even_when_soft() {
        let mut resolver = Resolver::new();
        let (imp, _) = describe(&mut resolver, implementor(vec![], vec![]));
        let (iface, _) = describe(
            &mut resolver,
            Fake {
                constants: vec!["MAX_HEALTH"],
                ..interface(vec![], vec![])
            },
        );

        let mut checker = ConformanceChecker::new();
        let err = checker.check(&imp, &iface, FailurePolicy::Soft).unwrap_err();
        assert_eq!(
            err,
            ConformanceError::InterfaceHasConstants {
                interface: "IDamagable".into(),
                constant: "MAX_HEALTH".into(),
            }
        );
        assert_eq!(checker.stats().entries, 0);
    }

    #[test]
    fn results_are_memoized_per_ordered_pair() {
        let mut resolver = Resolver::new();
        let (imp, imp_script) = describe(&mut resolver, implementor(vec!["a"], vec![]));
        let (iface, _) = describe(&mut resolver, interface(vec!["a"], vec![]));

        let mut checker = ConformanceChecker::new();
        assert_eq!(checker.check(&imp, &iface, FailurePolicy::Soft), Ok(true));
        let seen = imp_script.introspections.load(Ordering::Relaxed);
        assert_eq!(checker.check(&imp, &iface, FailurePolicy::Soft), Ok(true));

        assert_eq!(imp_script.introspections.load(Ordering::Relaxed), seen);
        assert_eq!(checker.stats().hits, 1);

        // Reversed pair is a different key.
        checker.check(&iface, &imp, FailurePolicy::Soft).unwrap();
        assert_eq!(checker.stats().entries, 2);
    }

    #[test]
    fn first_policy_wins_for_cached_results() {
        let mut resolver = Resolver::new();
        let (imp, _) = describe(&mut resolver, implementor(vec![], vec![]));
        let (iface, _) = describe(&mut resolver, interface(vec!["x"], vec![]));

        let mut checker = ConformanceChecker::new();
        assert_eq!(checker.check(&imp, &iface, FailurePolicy::Soft), Ok(false));
        assert_eq!(checker.check(&imp, &iface, FailurePolicy::Fatal), Ok(false));
    }
}
