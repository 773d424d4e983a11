//! Sentinel-terminated source buffer for zero-bounds-check scanning.
//!
//! The buffer guarantees a `0x00` sentinel byte after the source content,
//! allowing the scanner to detect end of input without explicit bounds
//! checking. The byte copy is padded to a 64-byte boundary so `peek()`
//! near the end of the buffer always reads a valid (zero) byte.

use crate::Cursor;

/// Cache line size in bytes, used for buffer alignment padding.
const CACHE_LINE: usize = 64;

/// Sentinel-terminated source buffer.
///
/// # Layout
///
/// ```text
/// [source_bytes..., 0x00, padding_zeros...]
///  ^                ^     ^
///  0                |     rounded up to 64-byte boundary
///              source_len (sentinel)
/// ```
///
/// The original text is kept alongside the padded byte copy so token
/// slices can be handed out as `&str` without any unsafe re-validation.
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// The source text, unmodified. Token slices borrow from here.
    text: String,
    /// Padded byte copy: `[source_bytes..., 0x00 sentinel, 0x00 padding...]`.
    buf: Vec<u8>,
    /// Length of the actual source content (excludes sentinel and padding).
    source_len: u32,
}

impl SourceBuffer {
    /// Create a new sentinel-terminated buffer from source text.
    ///
    /// Sources larger than `u32::MAX` bytes are truncated (at a char
    /// boundary); the directive scanner has no business in 4 GiB files.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "cap is clamped to u32::MAX before the cast"
    )]
    pub fn new(source: &str) -> Self {
        let mut cap = source.len().min(u32::MAX as usize);
        while !source.is_char_boundary(cap) {
            cap -= 1;
        }
        let source_len = cap as u32;
        let text = source[..cap].to_owned();

        // Round up to the next 64-byte boundary. The minimum is source +
        // sentinel + one extra zero byte, so `peek()` stays in bounds even
        // with the cursor parked on the sentinel.
        let padded_len = (source_len as usize + 2 + CACHE_LINE - 1) & !(CACHE_LINE - 1);
        let mut buf = vec![0u8; padded_len];
        buf[..source_len as usize].copy_from_slice(text.as_bytes());

        Self {
            text,
            buf,
            source_len,
        }
    }

    /// A cursor positioned at the start of the source.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, &self.text, self.source_len)
    }

    /// Length of the source content in bytes.
    pub fn len(&self) -> u32 {
        self.source_len
    }

    /// `true` if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_has_sentinel() {
        let buf = SourceBuffer::new("");
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert!(buf.cursor().is_eof());
    }

    #[test]
    fn cursor_reads_source_bytes() {
        let buf = SourceBuffer::new("abc");
        let cursor = buf.cursor();
        assert_eq!(cursor.current(), b'a');
        assert_eq!(cursor.peek(), b'b');
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn peek_stays_in_bounds_at_padding_boundary() {
        // 63 content bytes + sentinel would exactly fill one cache line.
        let source = "a".repeat(63);
        let buf = SourceBuffer::new(&source);
        let mut cursor = buf.cursor();
        cursor.advance_n(63);
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), 0);
    }

    #[test]
    fn peek_past_end_reads_padding() {
        let buf = SourceBuffer::new("x");
        let mut cursor = buf.cursor();
        cursor.advance();
        assert_eq!(cursor.current(), 0);
        assert_eq!(cursor.peek(), 0);
    }
}
