//! Driver library for the `ptu` command-line tool.
//!
//! The binary is a thin shell around [`driver::run`]: parse the command
//! line, scan every file under the input directories into one registry,
//! validate it, and write the generated artifacts into the output
//! directory. Everything here is also callable from tests.

pub mod config;
pub mod driver;
pub mod walk;

pub use config::{Config, UsageError};
pub use driver::{run, RunError, RunReport};
pub use walk::{discover_files, IoFailure, WalkResult};
