//! Hand-written scanner producing classified [`Token`]s.
//!
//! Main dispatch covers the byte at the cursor. Each arm calls a focused
//! method that advances the cursor and returns the finished token. The
//! sentinel byte (`0x00`) dispatches to `eof()`.
//!
//! Tokens borrow their text from the source buffer. String and character
//! literal tokens cover only the inner content — the delimiters are
//! consumed but excluded from the slice.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// One scanning pass over a single source buffer.
///
/// Error conditions do not exist at this layer: unterminated comments and
/// literals simply extend to end of input, and unclassifiable characters
/// come back as [`TokenKind::Unknown`].
pub struct Scanner<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Scanner<'src> {
    /// Create a new scanner from a cursor.
    pub fn new(cursor: Cursor<'src>) -> Self {
        Self { cursor }
    }

    /// Produce the next token, advancing past its text.
    ///
    /// Returns [`TokenKind::Eof`] with empty text when the source is
    /// exhausted; subsequent calls keep returning it.
    pub fn next_token(&mut self) -> Token<'src> {
        let start = self.cursor.pos();
        match self.cursor.current() {
            // NUL terminates the scan whether it is the sentinel or an
            // interior byte; nothing meaningful follows one in C-like text.
            0 => Token {
                kind: TokenKind::Eof,
                start,
                text: "",
            },
            b' ' | b'\t' | b'\r' | b'\n' => self.whitespace(start),
            b'(' => self.single(start, TokenKind::ParenOpen),
            b')' => self.single(start, TokenKind::ParenClose),
            b':' => self.single(start, TokenKind::Colon),
            b',' => self.single(start, TokenKind::Comma),
            b';' => self.single(start, TokenKind::Semicolon),
            b'*' => self.single(start, TokenKind::Asterisk),
            b'[' => self.single(start, TokenKind::BracketOpen),
            b']' => self.single(start, TokenKind::BracketClose),
            b'{' => self.single(start, TokenKind::BraceOpen),
            b'}' => self.single(start, TokenKind::BraceClose),
            b'#' => self.single(start, TokenKind::Hash),
            b'/' => self.slash_or_comment(start),
            b'"' => self.literal(b'"', TokenKind::Str),
            b'\'' => self.literal(b'\'', TokenKind::Char),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(start),
            _ => self.unknown(start),
        }
    }

    /// Repeatedly call [`next_token`](Self::next_token) until it returns a
    /// token of `kind` or the end-of-stream token, whichever comes first.
    ///
    /// Callers must check the returned kind; reaching end of stream while
    /// searching is not itself an error at this layer.
    pub fn require_next(&mut self, kind: TokenKind) -> Token<'src> {
        loop {
            let token = self.next_token();
            if token.kind == kind || token.kind == TokenKind::Eof {
                return token;
            }
        }
    }

    /// Consume raw bytes to the end of the current line, honoring
    /// backslash-newline continuations.
    ///
    /// A backslash immediately followed by a line terminator consumes the
    /// backslash and every consecutive terminator, then the scan continues
    /// on the next line. Used to skip preprocessor-style `#define` bodies
    /// so directives quoted inside them are not interpreted.
    pub fn skip_logical_line(&mut self) {
        loop {
            let b = self.cursor.current();
            if b == 0 || is_line_end(b) {
                return;
            }
            if b == b'\\' && is_line_end(self.cursor.peek()) {
                self.cursor.advance(); // the backslash
                while is_line_end(self.cursor.current()) {
                    self.cursor.advance();
                }
            } else {
                self.cursor.advance();
            }
        }
    }

    // ─── Token constructors ─────────────────────────────────────────────

    fn single(&mut self, start: u32, kind: TokenKind) -> Token<'src> {
        self.cursor.advance();
        Token {
            kind,
            start,
            text: self.cursor.slice_from(start),
        }
    }

    fn whitespace(&mut self, start: u32) -> Token<'src> {
        self.cursor
            .eat_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'));
        Token {
            kind: TokenKind::Whitespace,
            start,
            text: self.cursor.slice_from(start),
        }
    }

    fn identifier(&mut self, start: u32) -> Token<'src> {
        self.cursor.advance(); // first char, already validated
        self.cursor.eat_while(is_ident_continue);
        Token {
            kind: TokenKind::Ident,
            start,
            text: self.cursor.slice_from(start),
        }
    }

    fn slash_or_comment(&mut self, start: u32) -> Token<'src> {
        match self.cursor.peek() {
            b'/' => {
                self.cursor.advance_n(2);
                self.cursor.eat_until_line_end();
                Token {
                    kind: TokenKind::LineComment,
                    start,
                    text: self.cursor.slice_from(start),
                }
            }
            b'*' => self.block_comment(start),
            // A lone slash is something else, like a division operator.
            _ => self.unknown(start),
        }
    }

    fn block_comment(&mut self, start: u32) -> Token<'src> {
        self.cursor.advance_n(2); // "/*"
        loop {
            if !self.cursor.skip_to_byte(b'*') {
                // Unterminated: the comment extends to end of input.
                break;
            }
            if self.cursor.peek() == b'/' {
                self.cursor.advance_n(2);
                break;
            }
            self.cursor.advance();
        }
        Token {
            kind: TokenKind::BlockComment,
            start,
            text: self.cursor.slice_from(start),
        }
    }

    /// String or character literal. The token covers only the inner
    /// content; a backslash always consumes the following character,
    /// regardless of what it is. If no closing delimiter is found the
    /// token ends at end of input.
    fn literal(&mut self, quote: u8, kind: TokenKind) -> Token<'src> {
        self.cursor.advance(); // opening delimiter
        let content_start = self.cursor.pos();
        loop {
            let b = self.cursor.skip_to_literal_delim(quote);
            if b == b'\\' {
                self.cursor.advance();
                if !self.cursor.is_eof() {
                    self.cursor.advance();
                }
                continue;
            }
            // Either the closing delimiter or EOF.
            let text = self.cursor.slice_from(content_start);
            if b == quote {
                self.cursor.advance();
            }
            return Token {
                kind,
                start: content_start,
                text,
            };
        }
    }

    fn unknown(&mut self, start: u32) -> Token<'src> {
        self.cursor.advance_char();
        Token {
            kind: TokenKind::Unknown,
            start,
            text: self.cursor.slice_from(start),
        }
    }
}

fn is_line_end(b: u8) -> bool {
    b == b'\r' || b == b'\n'
}

fn is_ident_continue(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use super::*;
    use crate::SourceBuffer;

    /// Helper: scan a source string and collect all tokens (excluding Eof).
    fn scan(source: &str) -> Vec<(TokenKind, String)> {
        let buf = SourceBuffer::new(source);
        let mut scanner = Scanner::new(buf.cursor());
        let mut tokens = Vec::new();
        loop {
            let tok = scanner.next_token();
            if tok.kind == TokenKind::Eof {
                break;
            }
            tokens.push((tok.kind, tok.text.to_owned()));
        }
        tokens
    }

    /// Helper: scan and return kinds only.
    fn scan_kinds(source: &str) -> Vec<TokenKind> {
        scan(source).into_iter().map(|(k, _)| k).collect()
    }

    // ─── Whitespace ─────────────────────────────────────────────────────

    #[test]
    fn whitespace_run_is_one_token() {
        assert_eq!(scan("  \t\r\n  "), vec![(TokenKind::Whitespace, "  \t\r\n  ".into())]);
    }

    #[test]
    fn empty_source_yields_only_eof() {
        assert_eq!(scan_kinds(""), vec![]);
        let buf = SourceBuffer::new("");
        let mut scanner = Scanner::new(buf.cursor());
        for _ in 0..3 {
            assert_eq!(scanner.next_token().kind, TokenKind::Eof);
        }
    }

    // ─── Punctuation ────────────────────────────────────────────────────

    #[test]
    fn single_char_tokens() {
        assert_eq!(
            scan_kinds("():,;*[]{}#"),
            vec![
                TokenKind::ParenOpen,
                TokenKind::ParenClose,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Asterisk,
                TokenKind::BracketOpen,
                TokenKind::BracketClose,
                TokenKind::BraceOpen,
                TokenKind::BraceClose,
                TokenKind::Hash,
            ]
        );
    }

    // ─── Comments ───────────────────────────────────────────────────────

    #[test]
    fn line_comment_excludes_terminator() {
        let tokens = scan("// hello\nx");
        assert_eq!(tokens[0], (TokenKind::LineComment, "// hello".into()));
        assert_eq!(tokens[1].0, TokenKind::Whitespace);
        assert_eq!(tokens[2], (TokenKind::Ident, "x".into()));
    }

    #[test]
    fn line_comment_at_eof() {
        assert_eq!(scan("// tail"), vec![(TokenKind::LineComment, "// tail".into())]);
    }

    #[test]
    fn block_comment_spans_lines() {
        let tokens = scan("/* a\nb */x");
        assert_eq!(tokens[0], (TokenKind::BlockComment, "/* a\nb */".into()));
        assert_eq!(tokens[1], (TokenKind::Ident, "x".into()));
    }

    #[test]
    fn unterminated_block_comment_extends_to_eof() {
        assert_eq!(
            scan("/* never closed"),
            vec![(TokenKind::BlockComment, "/* never closed".into())]
        );
    }

    #[test]
    fn block_comment_with_stray_stars() {
        assert_eq!(
            scan("/* a * b ** c */"),
            vec![(TokenKind::BlockComment, "/* a * b ** c */".into())]
        );
    }

    #[test]
    fn lone_slash_is_unknown() {
        assert_eq!(scan("/"), vec![(TokenKind::Unknown, "/".into())]);
        let tokens = scan("a/b");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Ident, "a".into()),
                (TokenKind::Unknown, "/".into()),
                (TokenKind::Ident, "b".into()),
            ]
        );
    }

    // ─── Literals ───────────────────────────────────────────────────────

    #[test]
    fn string_token_covers_inner_content_only() {
        assert_eq!(scan("\"hello\""), vec![(TokenKind::Str, "hello".into())]);
    }

    #[test]
    fn string_escape_consumes_following_char() {
        assert_eq!(scan(r#""a\"b""#), vec![(TokenKind::Str, "a\\\"b".into())]);
        // Even an escaped backslash before the closing quote.
        assert_eq!(scan(r#""a\\""#), vec![(TokenKind::Str, "a\\\\".into())]);
    }

    #[test]
    fn unterminated_string_ends_at_eof() {
        assert_eq!(scan("\"open"), vec![(TokenKind::Str, "open".into())]);
    }

    #[test]
    fn string_may_contain_newlines() {
        assert_eq!(scan("\"a\nb\""), vec![(TokenKind::Str, "a\nb".into())]);
    }

    #[test]
    fn char_literal_inner_content() {
        assert_eq!(scan("'c'"), vec![(TokenKind::Char, "c".into())]);
        assert_eq!(scan(r"'\n'"), vec![(TokenKind::Char, "\\n".into())]);
    }

    #[test]
    fn unterminated_char_ends_at_eof() {
        assert_eq!(scan("'x"), vec![(TokenKind::Char, "x".into())]);
    }

    // ─── Identifiers ────────────────────────────────────────────────────

    #[test]
    fn identifiers() {
        assert_eq!(scan("foo"), vec![(TokenKind::Ident, "foo".into())]);
        assert_eq!(scan("_foo9"), vec![(TokenKind::Ident, "_foo9".into())]);
        assert_eq!(
            scan_kinds("KCPP_POLYMORPHIC_TAGGED_UNION"),
            vec![TokenKind::Ident]
        );
    }

    #[test]
    fn identifier_stops_at_punctuation() {
        assert_eq!(
            scan("draw(self)"),
            vec![
                (TokenKind::Ident, "draw".into()),
                (TokenKind::ParenOpen, "(".into()),
                (TokenKind::Ident, "self".into()),
                (TokenKind::ParenClose, ")".into()),
            ]
        );
    }

    // ─── Unknown ────────────────────────────────────────────────────────

    #[test]
    fn unknown_advances_one_character() {
        assert_eq!(
            scan("a+b"),
            vec![
                (TokenKind::Ident, "a".into()),
                (TokenKind::Unknown, "+".into()),
                (TokenKind::Ident, "b".into()),
            ]
        );
    }

    #[test]
    fn unknown_multibyte_char_stays_on_boundary() {
        let tokens = scan("é x");
        assert_eq!(tokens[0], (TokenKind::Unknown, "é".into()));
        assert_eq!(tokens[2], (TokenKind::Ident, "x".into()));
    }

    // ─── require_next ───────────────────────────────────────────────────

    #[test]
    fn require_next_skips_to_requested_kind() {
        let buf = SourceBuffer::new("( /* c */ struct Foo )");
        let mut scanner = Scanner::new(buf.cursor());
        assert_eq!(scanner.require_next(TokenKind::ParenOpen).kind, TokenKind::ParenOpen);
        let tok = scanner.require_next(TokenKind::Ident);
        assert_eq!(tok.text, "struct");
        let tok = scanner.require_next(TokenKind::Ident);
        assert_eq!(tok.text, "Foo");
    }

    #[test]
    fn require_next_returns_eof_when_kind_absent() {
        let buf = SourceBuffer::new("a b c");
        let mut scanner = Scanner::new(buf.cursor());
        let tok = scanner.require_next(TokenKind::ParenOpen);
        assert_eq!(tok.kind, TokenKind::Eof);
    }

    // ─── skip_logical_line ──────────────────────────────────────────────

    #[test]
    fn skip_logical_line_stops_at_terminator() {
        let buf = SourceBuffer::new("FOO 1\nnext");
        let mut scanner = Scanner::new(buf.cursor());
        scanner.skip_logical_line();
        assert_eq!(scanner.next_token().kind, TokenKind::Whitespace);
        assert_eq!(scanner.next_token().text, "next");
    }

    #[test]
    fn skip_logical_line_honors_continuations() {
        let buf = SourceBuffer::new("FOO 1 \\\n  2 \\\r\n  3\nnext");
        let mut scanner = Scanner::new(buf.cursor());
        scanner.skip_logical_line();
        assert_eq!(scanner.next_token().kind, TokenKind::Whitespace);
        assert_eq!(scanner.next_token().text, "next");
    }

    #[test]
    fn skip_logical_line_at_eof() {
        let buf = SourceBuffer::new("FOO 1");
        let mut scanner = Scanner::new(buf.cursor());
        scanner.skip_logical_line();
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    }

    // ─── Properties ─────────────────────────────────────────────────────

    #[test]
    fn non_literal_token_lengths_cover_source() {
        // Sources without literals: token texts concatenate to the source.
        let sources = ["a b(c, d)*e;", "// x\n/* y */z", "  #define A 1"];
        for source in sources {
            let joined: String = scan(source).iter().map(|(_, t)| t.as_str()).collect();
            assert_eq!(joined, source, "coverage mismatch for {source:?}");
        }
    }

    mod proptest_scan {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scanner_always_reaches_eof(source in "\\PC{0,120}") {
                let buf = SourceBuffer::new(&source);
                let mut scanner = Scanner::new(buf.cursor());
                // Bounded by one token per byte plus slack; overrunning
                // the bound means the scanner failed to make progress.
                let mut budget = source.len() + 8;
                loop {
                    let tok = scanner.next_token();
                    if tok.kind == TokenKind::Eof {
                        break;
                    }
                    prop_assert!(budget > 0, "scanner stalled on {source:?}");
                    budget -= 1;
                }
            }
        }
    }
}
