//! Byte cursor over a sentinel-terminated buffer.
//!
//! The cursor advances through the buffer byte by byte. EOF is detected
//! when the current byte equals the sentinel (`0x00`) and the position has
//! reached the source length. Predicate loops need no bounds checks: the
//! sentinel fails every classification predicate and stops them.

/// Byte cursor over a sentinel-terminated buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor).
/// The cursor is [`Copy`], enabling cheap state snapshots.
///
/// # Invariant
///
/// `buf[source_len] == 0x00` and all bytes after it are `0x00` padding;
/// `text` is the same content as `buf[..source_len]`, valid UTF-8. Both
/// are guaranteed by `SourceBuffer` construction.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Sentinel-terminated buffer (source + sentinel + padding).
    buf: &'a [u8],
    /// The source as text, for boundary-checked slicing.
    text: &'a str,
    /// Current read position (byte index into `buf`).
    pos: u32,
    /// Length of actual source content (excludes sentinel and padding).
    source_len: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], text: &'a str, source_len: u32) -> Self {
        debug_assert!((source_len as usize) < buf.len());
        debug_assert!(buf[source_len as usize] == 0, "sentinel byte must be 0x00");
        Self {
            buf,
            text,
            pos: 0,
            source_len,
        }
    }

    /// The byte at the current position. Returns `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    /// The byte one position ahead of current.
    ///
    /// Safe to call at any position: the sentinel and padding guarantee
    /// valid reads beyond the source content.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.buf[self.pos as usize + 1]
    }

    /// Advance the cursor by one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Advance the cursor by `n` bytes.
    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// Advance past one full UTF-8 character.
    ///
    /// Uses the current byte as the leading byte to determine how many
    /// bytes to skip, keeping the position on a character boundary.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = match self.current() {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        self.advance_n(width);
    }

    /// `true` once the cursor has consumed the whole source.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Extract a source substring.
    ///
    /// `start..end` must fall on character boundaries within the source;
    /// the scanner only produces boundaries at ASCII bytes, which always
    /// qualify.
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        &self.text[start as usize..end as usize]
    }

    /// Extract a source substring from `start` to the current position.
    pub fn slice_from(&self, start: u32) -> &'a str {
        self.slice(start, self.pos)
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// `pred(0)` must return `false`; this holds for every classification
    /// predicate the scanner uses, so the sentinel terminates the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
    }

    /// Advance to the next `\n` or `\r` byte, or EOF, whichever is first.
    ///
    /// Used by the comment scanner to skip line-comment bodies.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offset < remaining.len() <= source_len which fits in u32"
    )]
    pub fn eat_until_line_end(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        if let Some(offset) = memchr::memchr2(b'\n', b'\r', remaining) {
            self.pos += offset as u32;
        } else {
            self.pos = self.source_len;
        }
    }

    /// Advance past ordinary literal content to the closing quote or a
    /// backslash. Returns the byte found, or 0 for EOF.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offset < remaining.len() <= source_len which fits in u32"
    )]
    pub fn skip_to_literal_delim(&mut self, quote: u8) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        if let Some(offset) = memchr::memchr2(quote, b'\\', remaining) {
            self.pos += offset as u32;
            self.buf[self.pos as usize]
        } else {
            self.pos = self.source_len;
            0
        }
    }

    /// Advance to the next occurrence of `byte`. Returns `false` (with the
    /// cursor at EOF) if the byte does not occur before end of input.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offset < remaining.len() <= source_len which fits in u32"
    )]
    pub fn skip_to_byte(&mut self, byte: u8) -> bool {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        if let Some(offset) = memchr::memchr(byte, remaining) {
            self.pos += offset as u32;
            true
        } else {
            self.pos = self.source_len;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::SourceBuffer;

    #[test]
    fn advance_through_entire_source() {
        let buf = SourceBuffer::new("hi");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.current(), b'h');
        cursor.advance();
        assert_eq!(cursor.current(), b'i');
        cursor.advance();
        assert!(cursor.is_eof());
    }

    #[test]
    fn peek_near_end_returns_sentinel() {
        let buf = SourceBuffer::new("ab");
        let mut cursor = buf.cursor();
        cursor.advance(); // at 'b'
        assert_eq!(cursor.peek(), 0);
    }

    #[test]
    fn slice_extracts_substring() {
        let buf = SourceBuffer::new("hello world");
        let cursor = buf.cursor();
        assert_eq!(cursor.slice(0, 5), "hello");
        assert_eq!(cursor.slice(6, 11), "world");
    }

    #[test]
    fn slice_from_extracts_to_current() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        cursor.advance_n(3);
        assert_eq!(cursor.slice_from(0), "abc");
        assert_eq!(cursor.slice_from(1), "bc");
    }

    #[test]
    fn eat_while_stops_at_sentinel() {
        let buf = SourceBuffer::new("aaa");
        let mut cursor = buf.cursor();
        cursor.eat_while(|b| b == b'a');
        assert_eq!(cursor.pos(), 3);
        assert!(cursor.is_eof());
    }

    #[test]
    fn eat_until_line_end_finds_lf() {
        let buf = SourceBuffer::new("hello\nworld");
        let mut cursor = buf.cursor();
        cursor.eat_until_line_end();
        assert_eq!(cursor.pos(), 5);
        assert_eq!(cursor.current(), b'\n');
    }

    #[test]
    fn eat_until_line_end_finds_cr() {
        let buf = SourceBuffer::new("hello\rworld");
        let mut cursor = buf.cursor();
        cursor.eat_until_line_end();
        assert_eq!(cursor.pos(), 5);
        assert_eq!(cursor.current(), b'\r');
    }

    #[test]
    fn eat_until_line_end_stops_at_eof() {
        let buf = SourceBuffer::new("no newline here");
        let mut cursor = buf.cursor();
        cursor.eat_until_line_end();
        assert!(cursor.is_eof());
    }

    #[test]
    fn skip_to_literal_delim_finds_earliest() {
        let buf = SourceBuffer::new("abc\\\"rest");
        let mut cursor = buf.cursor();
        let b = cursor.skip_to_literal_delim(b'"');
        assert_eq!(b, b'\\');
        assert_eq!(cursor.pos(), 3);
    }

    #[test]
    fn skip_to_literal_delim_eof() {
        let buf = SourceBuffer::new("hello");
        let mut cursor = buf.cursor();
        let b = cursor.skip_to_literal_delim(b'"');
        assert_eq!(b, 0);
        assert!(cursor.is_eof());
    }

    #[test]
    fn skip_to_byte_not_found_lands_on_eof() {
        let buf = SourceBuffer::new("hello");
        let mut cursor = buf.cursor();
        assert!(!cursor.skip_to_byte(b'*'));
        assert!(cursor.is_eof());
    }

    #[test]
    fn cursor_is_copy_for_checkpointing() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        cursor.advance_n(2);
        let saved = cursor;
        cursor.advance_n(3);
        assert_eq!(cursor.pos(), 5);
        assert_eq!(saved.pos(), 2);
    }
}
