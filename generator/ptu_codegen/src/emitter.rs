//! In-memory output emitter.

/// Incrementally builds one artifact's text.
///
/// Generated C-like text is tab-indented, one tab per level.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Emit a text fragment.
    pub fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Emit a newline (Unix-style `\n`).
    pub fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    /// Emit indentation, one tab per level.
    pub fn emit_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.buffer.push('\t');
        }
    }

    /// Consume the emitter and take the finished text.
    pub fn output(self) -> String {
        self.buffer
    }

    /// The buffer contents so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_fragments_in_order() {
        let mut emitter = StringEmitter::new();
        emitter.emit("switch");
        emitter.emit("(tag)");
        emitter.emit_newline();
        emitter.emit_indent(1);
        emitter.emit("{");
        assert_eq!(emitter.output(), "switch(tag)\n\t{");
    }

    #[test]
    fn indent_uses_tabs() {
        let mut emitter = StringEmitter::new();
        emitter.emit_indent(2);
        emitter.emit("x");
        assert_eq!(emitter.output(), "\t\tx");
    }

    #[test]
    fn with_capacity_starts_empty() {
        let emitter = StringEmitter::with_capacity(256);
        assert!(emitter.is_empty());
        assert_eq!(emitter.len(), 0);
    }
}
