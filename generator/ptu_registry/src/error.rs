//! Registry invariant violations.

use thiserror::Error;

/// A uniqueness invariant was violated while accumulating or validating
/// the registry. All of these are fatal: the registry may be left
/// inconsistent and must not be used for generation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The same abstract method was declared twice for one base type.
    #[error("method `{method}` is already declared for base type `{base}`")]
    DuplicateMethod { base: String, method: String },

    /// The same variant was registered twice as extending one base type.
    #[error("variant `{variant}` already extends base type `{base}`")]
    DuplicateExtension { base: String, variant: String },

    /// Two overrides with the same function identifier were recorded for
    /// one (base, variant) pair.
    #[error("override `{ident}` is already recorded for variant `{variant}` of `{base}`")]
    DuplicateOverride {
        base: String,
        variant: String,
        ident: String,
    },

    /// Post-scan validation: two override records under one (base,
    /// variant) name the same target method, so dispatch would emit more
    /// than one forwarding call for it.
    #[error(
        "variant `{variant}` of `{base}` overrides method `{method}` more than once"
    )]
    DuplicateDispatchTarget {
        base: String,
        variant: String,
        method: String,
    },
}
