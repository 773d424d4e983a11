//! Classified source tokens.

/// Classification of a scanned token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    ParenOpen,
    ParenClose,
    Colon,
    Comma,
    Semicolon,
    Asterisk,
    BracketOpen,
    BracketClose,
    BraceOpen,
    BraceClose,
    Hash,
    /// A contiguous run of spaces, tabs, and line terminators.
    Whitespace,
    /// `//` to the end of the line (terminator excluded).
    LineComment,
    /// `/*` through the matching `*/`, or to end of input if unterminated.
    BlockComment,
    /// The inner content of a `"`-delimited literal (delimiters excluded).
    Str,
    /// The inner content of a `'`-delimited literal (delimiters excluded).
    Char,
    /// A letter or underscore followed by letters, digits, or underscores.
    Ident,
    /// Terminal token; repeated scans keep returning it.
    Eof,
    /// Any single character the scanner has no classification for.
    Unknown,
}

/// A classified slice of source text.
///
/// Borrows from the whole-file buffer; never owns text. For string and
/// character literals, `start` and `text` cover only the inner content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// Byte offset of `text` within the source.
    pub start: u32,
    pub text: &'src str,
}

impl Token<'_> {
    /// Byte length of the token's text.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "token text is a source slice; sources are capped at u32"
    )]
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    /// `true` for tokens with empty text (`Eof`, empty literal bodies).
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_is_byte_length() {
        let tok = Token {
            kind: TokenKind::Ident,
            start: 0,
            text: "draw",
        };
        assert_eq!(tok.len(), 4);
        assert!(!tok.is_empty());
    }
}
