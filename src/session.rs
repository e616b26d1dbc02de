//! Per-document record state machine.
//!
//! A [`Session`] receives scan events for one document. It detects the
//! dialect from the first recognised root, tracks the section context,
//! captures field text into the scratch arena and hands each finished
//! record to the [`RecordEmitter`].
//!
//! Capture is a single flag: while set, every text event is appended to the
//! arena. A field's start tag records where its text begins and its end tag
//! records the length, so nested captured elements each get their own span.

use std::io::Write;

use crate::arena::ScratchArena;
use crate::core::scanner::local_name;
use crate::core::span::Span;
use crate::core::unified_scanner::{Attributes, ScanHandler};
use crate::dialect::{Dialect, Role, Schema, Section, Token};
use crate::emit::{Closed, DocumentHeader, RecordEmitter};
use crate::error::Result;
use crate::record::{FieldTable, LangTag};
use crate::sink::OutputSink;

/// Summary of one converted document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    /// Dialect of the last recognised root
    pub dialect: Dialect,
    pub emitted: u64,
    /// Records closed without the fields the profile needs
    pub discarded: u64,
    /// Whether a recognised root element was closed
    pub completed: bool,
}

/// Event handler that turns one document into output records
pub struct Session<'s, W: Write> {
    sink: &'s mut OutputSink<W>,
    emitter: &'s RecordEmitter,
    arena: ScratchArena,
    table: FieldTable,
    schema: Option<&'static Schema>,
    section: Section,
    capturing: bool,
    /// Document content date, captured before the root is recognised
    content_date: Span,
    stats: DocumentStats,
}

impl<'s, W: Write> Session<'s, W> {
    pub fn new(sink: &'s mut OutputSink<W>, emitter: &'s RecordEmitter) -> Self {
        Session {
            sink,
            emitter,
            arena: ScratchArena::new(),
            table: FieldTable::new(),
            schema: None,
            section: Section::Top,
            capturing: false,
            content_date: Span::empty(),
            stats: DocumentStats::default(),
        }
    }

    /// End the session; a record still in flight is dropped.
    pub fn finish(self) -> DocumentStats {
        if self.schema.is_some() {
            log::debug!(
                "document ended inside {:?} data; in-flight record dropped",
                self.stats.dialect
            );
        }
        self.stats
    }

    fn open_document(&mut self, schema: &'static Schema) -> Result<()> {
        self.schema = Some(schema);
        self.section = Section::Top;
        self.capturing = false;
        self.stats.dialect = schema.dialect;
        log::debug!("recognised {:?} dialect", schema.dialect);

        let content_date = if self.content_date.is_empty() {
            None
        } else {
            Some(self.arena.get(self.content_date))
        };
        let header = DocumentHeader {
            content_date,
        };
        self.emitter.preamble(&header, &mut *self.sink)
    }

    fn close_record(&mut self) -> Result<()> {
        self.capturing = false;
        match self.emitter.close(&mut self.arena, &mut self.table, &mut *self.sink)? {
            Closed::Emitted => self.stats.emitted += 1,
            Closed::Discarded => {
                self.stats.discarded += 1;
                log::trace!("record without required fields discarded");
            }
        }
        Ok(())
    }

    fn close_document(&mut self) -> Result<()> {
        self.sink.flush()?;
        log::debug!(
            "{:?} data closed: {} records emitted, {} discarded",
            self.stats.dialect,
            self.stats.emitted,
            self.stats.discarded
        );
        self.schema = None;
        self.section = Section::Top;
        self.capturing = false;
        self.content_date = Span::empty();
        self.table.clear();
        self.arena.reset();
        self.stats.completed = true;
        Ok(())
    }
}

impl<W: Write> ScanHandler for Session<'_, W> {
    fn start_element(&mut self, name: &[u8], attrs: Attributes<'_>) -> Result<()> {
        let Some(token) = Token::lookup(local_name(name)) else {
            return Ok(());
        };

        let Some(schema) = self.schema else {
            if let Some(schema) = Schema::for_root(token) {
                return self.open_document(schema);
            }
            if token == Token::ContentDate {
                self.content_date = Span::new(self.arena.cursor()?, 0);
                self.capturing = true;
            }
            return Ok(());
        };

        match schema.role(self.section, token) {
            Some(Role::Capture(field)) => {
                self.table.open(field, self.arena.cursor()?);
                self.capturing = true;
                if schema.lang_field == Some(field) {
                    if let Some((_, lang)) = attrs.iter().find(|(n, _)| local_name(n) == b"lang") {
                        self.table.set_lang(LangTag::new(lang));
                    }
                }
            }
            Some(Role::Enter(section)) => self.section = section,
            _ => {}
        }
        Ok(())
    }

    fn end_element(&mut self, name: &[u8]) -> Result<()> {
        let Some(token) = Token::lookup(local_name(name)) else {
            return Ok(());
        };

        let Some(schema) = self.schema else {
            if token == Token::ContentDate && self.capturing {
                self.content_date = self.arena.span_from(self.content_date.offset)?;
                self.capturing = false;
            }
            return Ok(());
        };

        match schema.role(self.section, token) {
            Some(Role::Capture(field)) => {
                if schema.decode_captures {
                    let span = self.arena.decode_tail(self.table.start(field))?;
                    self.table.set(field, span);
                } else {
                    self.table.close(field, self.arena.cursor()?);
                }
                self.capturing = false;
            }
            Some(Role::Leave) => self.section = Section::Top,
            Some(Role::Record) => self.close_record()?,
            Some(Role::Document) => self.close_document()?,
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &[u8]) -> Result<()> {
        if self.capturing {
            self.arena.push(text)?;
        }
        Ok(())
    }
}
