//! Cross-file registry of closed polymorphic record types.
//!
//! The registry is the single evolving model built up during the scan
//! phase: which records extend which base type, which abstract dispatch
//! methods each base declares, and which per-variant functions override
//! them. Directives may mention a base type in any order across any number
//! of files, so every operation here is an upsert keyed by identifier
//! strings — the final content is identical for every file-processing
//! order. There is no delete.
//!
//! The registry is populated exclusively during scanning, validated once,
//! read exclusively during generation, and never persisted.

mod error;
mod model;
mod registry;

pub use error::RegistryError;
pub use model::{MethodSig, OverrideRecord, Param, RunToken};
pub use registry::{BaseEntry, Registry};
