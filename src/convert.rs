//! Document-level driver.
//!
//! A [`Converter`] owns the output sink for a whole run and converts input
//! documents one after another, each with a fresh [`Session`]. Pending
//! output is flushed after every document, including failed ones.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::config::{Config, EmptyDocumentPolicy};
use crate::emit::RecordEmitter;
use crate::error::{ConvertError, Result};
use crate::reader::StreamingReader;
use crate::session::{DocumentStats, Session};
use crate::sink::OutputSink;

/// Converts documents into a single output stream
pub struct Converter<W: Write> {
    sink: OutputSink<W>,
    emitter: RecordEmitter,
    config: Config,
}

impl<W: Write> Converter<W> {
    pub fn new(writer: W, config: Config) -> Self {
        Converter {
            sink: OutputSink::with_capacity(writer, config.output_capacity),
            emitter: RecordEmitter::new(config.profile),
            config,
        }
    }

    /// Convert one document read from `input`.
    pub fn convert<R: Read>(&mut self, input: R) -> Result<DocumentStats> {
        let mut reader = StreamingReader::with_chunk_size(input, self.config.read_chunk);
        let mut session = Session::new(&mut self.sink, &self.emitter);
        let scanned = reader.run(&mut session);
        let stats = session.finish();

        let flushed = self.sink.flush();
        match (scanned, flushed) {
            (Err(e), _) if e.is_fatal() => return Err(e),
            (_, Err(e)) => return Err(e),
            (Err(e), Ok(())) => return Err(e),
            (Ok(()), Ok(())) => {}
        }

        log::debug!(
            "converted {} bytes: {} records emitted, {} discarded ({} write calls so far)",
            reader.position(),
            stats.emitted,
            stats.discarded,
            self.sink.write_calls()
        );
        if stats.emitted == 0 && self.config.empty_document == EmptyDocumentPolicy::Reject {
            return Err(ConvertError::NoRecords);
        }
        Ok(stats)
    }

    /// Convert the file at `path`; `-` reads standard input.
    pub fn convert_path(&mut self, path: &Path) -> Result<DocumentStats> {
        if path == Path::new("-") {
            return self.convert(io::stdin().lock());
        }
        let file = File::open(path).map_err(ConvertError::Read)?;
        self.convert(file)
    }

    /// Flush what is left and return the writer
    pub fn finish(self) -> Result<W> {
        self.sink.into_inner()
    }
}

/// Convert an in-memory document to an in-memory result.
pub fn convert_bytes(input: &[u8], config: Config) -> Result<Vec<u8>> {
    let mut converter = Converter::new(Vec::new(), config);
    converter.convert(input)?;
    converter.finish()
}
