//! Streaming XML Reader
//!
//! Reads a document from any [`Read`] source in fixed-size chunks with
//! bounded memory. Each refill scans only the prefix that ends on a complete
//! markup boundary; the unfinished tail is moved to the front of the buffer
//! and completed by the next read.

use std::io::{ErrorKind, Read};

use super::boundary::BoundaryTracker;
use crate::core::unified_scanner::{ScanContext, ScanHandler, UnifiedScanner};
use crate::error::{ConvertError, Result};

/// Default number of bytes requested per read
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Chunked reader feeding a [`ScanHandler`]
pub struct StreamingReader<R: Read> {
    reader: R,
    /// Unscanned input; always starts at a markup boundary
    buffer: Vec<u8>,
    chunk_size: usize,
    tracker: BoundaryTracker,
    ctx: ScanContext,
    /// Absolute document offset of `buffer[0]`
    base: u64,
}

impl<R: Read> StreamingReader<R> {
    /// Create a new streaming reader
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// Create a new streaming reader with a specific read size
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        StreamingReader {
            reader,
            buffer: Vec::with_capacity(chunk_size),
            chunk_size,
            tracker: BoundaryTracker::new(),
            ctx: ScanContext::new(),
            base: 0,
        }
    }

    /// Bytes of input scanned so far
    pub fn position(&self) -> u64 {
        self.base
    }

    /// Read one chunk, returning false at end of input
    fn fill(&mut self) -> Result<bool> {
        let len = self.buffer.len();
        self.buffer.resize(len + self.chunk_size, 0);
        loop {
            match self.reader.read(&mut self.buffer[len..]) {
                Ok(n) => {
                    self.buffer.truncate(len + n);
                    return Ok(n > 0);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buffer.truncate(len);
                    return Err(ConvertError::Read(e));
                }
            }
        }
    }

    /// Scan `buffer[..end]` and drop it
    fn scan_prefix<H: ScanHandler>(&mut self, end: usize, handler: &mut H) -> Result<()> {
        UnifiedScanner::new(&self.buffer[..end], self.base, &mut self.ctx).scan(handler)?;
        self.buffer.drain(..end);
        self.tracker.consume(end);
        self.base += end as u64;
        Ok(())
    }

    /// Drive the whole document through `handler`.
    ///
    /// Fails if the input ends inside markup or leaves elements open.
    pub fn run<H: ScanHandler>(&mut self, handler: &mut H) -> Result<()> {
        while self.fill()? {
            let boundary = self.tracker.advance(&self.buffer);
            if boundary > 0 {
                self.scan_prefix(boundary, handler)?;
            }
        }

        if self.tracker.in_markup() {
            return Err(ConvertError::malformed(
                self.base,
                "unexpected end of input inside markup",
            ));
        }
        if !self.buffer.is_empty() {
            let end = self.buffer.len();
            self.scan_prefix(end, handler)?;
        }
        self.ctx.nesting.finish(self.base)
    }
}
