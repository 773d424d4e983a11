//! Token scanner for the ptu generator.
//!
//! Converts raw file text into a lazy sequence of classified tokens over a
//! sentinel-terminated buffer. The scanner recognizes just enough of C-like
//! surface syntax for the directive parser to slice token runs out of it:
//! punctuation, identifiers, whitespace runs, comments, and string/char
//! literal bodies. It is not a lexer for a full language grammar.
//!
//! # Pipeline position
//!
//! ```text
//! file text ──► SourceBuffer ──► Cursor ──► Scanner ──► Token stream
//! ```
//!
//! Tokens borrow their text from the buffer; nothing here allocates per
//! token. Downstream layers copy the few tokens they keep.

mod cursor;
mod scanner;
mod source_buffer;
mod token;

pub use cursor::Cursor;
pub use scanner::Scanner;
pub use source_buffer::SourceBuffer;
pub use token::{Token, TokenKind};
