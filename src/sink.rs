//! Batched output sink.
//!
//! Output accumulates in an owned buffer and reaches the writer in large
//! blocks: either when the next append would overflow the capacity, or on
//! an explicit [`OutputSink::flush`]. A flush drains the buffer completely,
//! looping over partial writes.

use std::io::{ErrorKind, Write};

use crate::arena::round_to_block;
use crate::error::{ConvertError, Result};
use crate::text::ByteSink;

/// Default capacity of the output buffer
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Buffered writer that only grows and flushes in whole batches
pub struct OutputSink<W: Write> {
    writer: W,
    buf: Vec<u8>,
    capacity: usize,
    /// Number of `write` calls issued, for diagnostics
    writes: u64,
}

impl<W: Write> OutputSink<W> {
    /// Create a sink with the default capacity
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, DEFAULT_CAPACITY)
    }

    /// Create a sink whose buffer holds at least `capacity` bytes
    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        let capacity = if capacity == 0 { 0 } else { round_to_block(capacity - 1) };
        OutputSink {
            writer,
            buf: Vec::new(),
            capacity,
            writes: 0,
        }
    }

    /// Buffer capacity; grows only when a single append needs more
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes waiting to be written
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Number of `write` calls issued on the underlying writer so far
    #[inline]
    pub fn write_calls(&self) -> u64 {
        self.writes
    }

    /// Borrow the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Append `bytes`, flushing first when they would not fit.
    pub fn push(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.buf.is_empty() && self.buf.len() + bytes.len() > self.capacity {
            self.flush()?;
        }
        if bytes.len() > self.capacity {
            self.capacity = round_to_block(bytes.len());
        }
        if self.buf.capacity() < self.capacity {
            let additional = self.capacity - self.buf.len();
            self.buf
                .try_reserve_exact(additional)
                .map_err(|e| ConvertError::out_of_memory("output buffer", self.capacity, e))?;
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Write out everything pending; a no-op when nothing is.
    ///
    /// The buffer is emptied even when the writer fails: a stream that
    /// rejected a write is not retried.
    pub fn flush(&mut self) -> Result<()> {
        let drained = self.drain();
        self.buf.clear();
        drained
    }

    fn drain(&mut self) -> Result<()> {
        let mut written = 0;
        while written < self.buf.len() {
            self.writes += 1;
            match self.writer.write(&self.buf[written..]) {
                Ok(0) => {
                    return Err(ConvertError::Write(std::io::Error::new(
                        ErrorKind::WriteZero,
                        "output stream accepted no bytes",
                    )));
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(ConvertError::Write(e)),
            }
        }
        if written > 0 {
            self.writer.flush().map_err(ConvertError::Write)?;
        }
        Ok(())
    }

    /// Flush and hand back the writer
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> ByteSink for OutputSink<W> {
    #[inline]
    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.push(bytes)
    }
}
