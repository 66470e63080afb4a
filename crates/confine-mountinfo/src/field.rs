//! Whitespace-delimited field extraction into a per-entry backing buffer.
//!
//! Every token is copied into the buffer at the same offset it occupies in
//! the source line, so fields never overlap and a buffer one byte longer
//! than the line always suffices. Fields are addressed by [`Span`]s.

use std::ops::Range;

/// Byte range of one field inside a [`FieldBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    start: usize,
    len: usize,
}

impl Span {
    /// An empty field anchored at `start`.
    pub const fn empty(start: usize) -> Self {
        Self { start, len: 0 }
    }

    /// Offset of the first byte.
    pub const fn start(self) -> usize {
        self.start
    }

    /// Length in bytes.
    pub const fn len(self) -> usize {
        self.len
    }

    /// Whether the field holds no bytes.
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    const fn end(self) -> usize {
        self.start + self.len
    }

    const fn range(self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Whitespace as understood by the C locale: space, `\t`, `\n`, `\v`, `\f`, `\r`.
pub const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Backing storage for every string field of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBuffer {
    bytes: Vec<u8>,
}

impl FieldBuffer {
    /// Allocates storage for the fields of `line`.
    pub fn for_line(line: &[u8]) -> Self {
        Self {
            bytes: vec![0; line.len() + 1],
        }
    }

    /// Extracts the next token of `line` starting at `*offset`.
    ///
    /// A space right at the offset is an empty field and consumes exactly
    /// that byte. Otherwise leading whitespace is skipped, the token is
    /// copied into the buffer, and the offset moves past the token and one
    /// trailing space if there is one. Returns `None` when the line holds
    /// no further token.
    pub fn next_field(&mut self, line: &[u8], offset: &mut usize) -> Option<Span> {
        let at = *offset;
        if line.get(at) == Some(&b' ') {
            *offset += 1;
            tracing::trace!(offset = at, "empty field");
            return Some(Span::empty(at));
        }

        let rest = line.get(at..)?;
        let start = at + rest.iter().take_while(|&&b| is_space(b)).count();
        let len = line[start..].iter().take_while(|&&b| !is_space(b)).count();
        if len == 0 {
            return None;
        }

        let span = Span { start, len };
        self.bytes[span.range()].copy_from_slice(&line[span.range()]);
        *offset = span.end();
        if line.get(*offset) == Some(&b' ') {
            *offset += 1;
        }
        tracing::trace!(
            start,
            len,
            next = *offset,
            field = %String::from_utf8_lossy(self.get(span)),
            "scanned field"
        );
        Some(span)
    }

    /// Appends `field` to the run `acc`, separated by a single space unless
    /// `acc` has not taken any field yet.
    ///
    /// `field` must lie after `acc` in the buffer.
    pub fn append_joined(&mut self, acc: &mut Span, field: Span, first: bool) {
        let mut end = acc.end();
        if !first {
            self.bytes[end] = b' ';
            end += 1;
        }
        self.bytes.copy_within(field.range(), end);
        acc.len = end + field.len - acc.start;
    }

    /// Bytes of `span`.
    pub fn get(&self, span: Span) -> &[u8] {
        &self.bytes[span.range()]
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }
}
