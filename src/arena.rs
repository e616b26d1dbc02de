//! Scratch arena for captured character data.
//!
//! Holds the text of every field of the record in flight. Fields refer to
//! their text through [`Span`]s (offset + length) into this buffer rather
//! than through pointers, so growth never invalidates a capture.
//!
//! The arena is reset once per finished record and keeps its allocation, so
//! a long document settles on the size of its largest record. Spans use
//! 32-bit offsets, so a record may not capture more than 4 GiB of text.

use crate::core::span::Span;
use crate::error::{ConvertError, Result};
use crate::text::decode_entities_in_place;

/// Growth granularity in bytes
pub const BLOCK_SIZE: usize = 4096;

/// Round `len` up to the next multiple of [`BLOCK_SIZE`] strictly above it.
#[inline]
pub(crate) fn round_to_block(len: usize) -> usize {
    (len & !(BLOCK_SIZE - 1)) + BLOCK_SIZE
}

/// Arena offset of `pos`, or an out-of-memory error past the 32-bit range
fn offset(pos: usize) -> Result<u32> {
    u32::try_from(pos).map_err(|_| ConvertError::OutOfMemory {
        buffer: "scratch arena",
        requested: pos,
    })
}

/// Append-only byte buffer with a write cursor
#[derive(Debug, Default)]
pub struct ScratchArena {
    buf: Vec<u8>,
}

impl ScratchArena {
    /// Create an empty arena (no allocation until the first push)
    pub fn new() -> Self {
        ScratchArena { buf: Vec::new() }
    }

    /// Current write cursor
    #[inline]
    pub fn cursor(&self) -> Result<u32> {
        offset(self.buf.len())
    }

    /// Allocated capacity in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Append `bytes`, returning the offset where they start.
    pub fn push(&mut self, bytes: &[u8]) -> Result<u32> {
        let start = self.buf.len();
        let needed = start.saturating_add(bytes.len());
        offset(needed)?;
        if needed > self.buf.capacity() {
            let target = round_to_block(needed);
            self.buf
                .try_reserve_exact(target - start)
                .map_err(|e| ConvertError::out_of_memory("scratch arena", target, e))?;
        }
        self.buf.extend_from_slice(bytes);
        offset(start)
    }

    /// Drop all captured text, keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Bytes covered by `span`, or an empty slice if the span is stale.
    #[inline]
    pub fn get(&self, span: Span) -> &[u8] {
        span.slice(&self.buf)
    }

    /// Span from `start` up to the cursor
    #[inline]
    pub fn span_from(&self, start: u32) -> Result<Span> {
        let end = self.cursor()?;
        let start = start.min(end);
        Ok(Span::new(start, end - start))
    }

    /// Decode predefined entities in `start..cursor` in place.
    ///
    /// The tail is compacted and the cursor pulled back, so the returned span
    /// is the decoded field. Nothing before `start` is touched.
    pub fn decode_tail(&mut self, start: u32) -> Result<Span> {
        let start = start.min(self.cursor()?);
        let tail = start as usize;
        let new_len = decode_entities_in_place(&mut self.buf[tail..]);
        self.buf.truncate(tail + new_len);
        Ok(Span::new(start, offset(new_len)?))
    }
}
