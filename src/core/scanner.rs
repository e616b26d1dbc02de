//! Byte cursor over one chunk of markup.
//!
//! Delimiter searches go through memchr / memmem, which pick SSE2, AVX2 or
//! NEON at runtime.

use memchr::{memchr, memmem};

use crate::text::is_space;

/// Cursor over one chunk of markup
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to `pos`, clamped to the end of input
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Byte `ahead` positions past the cursor
    #[inline]
    pub fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.pos + ahead).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.set_position(self.pos + n);
    }

    /// Skip blanks, including carriage returns
    #[inline]
    pub fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        let skip = rest
            .iter()
            .position(|&b| !(is_space(b) || b == b'\r'))
            .unwrap_or(rest.len());
        self.pos += skip;
    }

    /// Absolute position of the next `byte`
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Absolute position of the next multi-byte terminator such as `-->`
    #[inline]
    pub fn find_seq(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(&self.input[self.pos..], needle).map(|i| self.pos + i)
    }

    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Consume an element or attribute name; `None` leaves the cursor alone
    pub fn read_name(&mut self) -> Option<&'a [u8]> {
        let input = self.input;
        let rest = &input[self.pos..];
        if !is_name_start_char(*rest.first()?) {
            return None;
        }
        let len = rest[1..]
            .iter()
            .position(|&b| !is_name_char(b))
            .map_or(rest.len(), |i| i + 1);
        self.pos += len;
        Some(&rest[..len])
    }
}

/// ASCII letters, `_`, `:` and any byte of a multi-byte UTF-8 sequence
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Name start bytes plus digits, `-` and `.`
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

/// Strip a namespace prefix: `lei:LEIRecord` becomes `LEIRecord`.
#[inline]
pub fn local_name(name: &[u8]) -> &[u8] {
    match memchr(b':', name) {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}
