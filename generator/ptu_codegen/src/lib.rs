//! Artifact generation from a finished registry.
//!
//! Three text artifacts per base type: the tagged-union declaration, the
//! per-variant include aggregator, and the dispatch function definitions.
//! Generation is a pure read of registry content; it performs no I/O and
//! no validation — callers run [`ptu_registry::Registry::validate`] before
//! coming here. Output is deterministic because the registry iterates in
//! identifier order.

mod emitter;
mod generate;

pub use emitter::StringEmitter;
pub use generate::{
    dispatch_file_name, generate, includes_file_name, union_file_name, Artifacts,
};
