//! Directive recognition over a token stream.
//!
//! The parser makes one [`ptu_lexer::Scanner`] pass over each source file,
//! ignoring everything except the four directive identifiers (and `#define`
//! lines, which are skipped wholesale so directives quoted inside macro
//! bodies are not interpreted). Recognized directives parse their argument
//! forms and feed the shared [`ptu_registry::Registry`].
//!
//! All failures come back as [`ParseError`] values; this crate never
//! terminates the process.

mod context;
mod error;
mod parser;

pub use context::{ScanContext, UNBOUND_VARIANT};
pub use error::{Directive, ParseError};
pub use parser::scan_source;
