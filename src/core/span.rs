//! Span - offset and length into a byte buffer
//!
//! Zero-copy reference to a portion of a buffer. Used by the scanner for
//! names and attribute values inside the current chunk, and by the field
//! table for captured text inside the scratch arena.

/// A span referencing a portion of a buffer.
///
/// Size: 8 bytes (offset: 4 bytes, len: 4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Span {
    /// Byte offset into the buffer
    pub offset: u32,
    /// Length in bytes
    pub len: u32,
}

impl Span {
    /// Create a new span
    #[inline]
    pub const fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// Create an empty span (used for "no value")
    #[inline]
    pub const fn empty() -> Self {
        Self { offset: 0, len: 0 }
    }

    /// Span between two positions (`end` exclusive); `None` when either
    /// does not fit a 32-bit offset
    #[inline]
    pub fn between(start: usize, end: usize) -> Option<Self> {
        let offset = u32::try_from(start).ok()?;
        let len = u32::try_from(end.saturating_sub(start)).ok()?;
        Some(Self::new(offset, len))
    }

    /// Check if this span is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the end offset (exclusive)
    #[inline]
    pub const fn end(&self) -> u32 {
        self.offset.saturating_add(self.len)
    }

    /// Extract the byte slice from the buffer
    ///
    /// Out-of-range spans yield an empty slice instead of panicking.
    #[inline]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        let start = self.offset as usize;
        let end = start.saturating_add(self.len as usize);
        if end <= input.len() {
            &input[start..end]
        } else {
            &[]
        }
    }
}
