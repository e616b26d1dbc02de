//! Output profiles.
//!
//! A [`Renderer`] turns one finished record into output bytes. Which
//! renderer runs is chosen once per run through [`Profile`]; the session
//! only ever talks to the [`RecordEmitter`], which owns the renderer and
//! the emit-or-discard decision.

pub mod tabular;
pub mod turtle;

use crate::arena::ScratchArena;
use crate::error::Result;
use crate::record::{Field, FieldTable};
use crate::text::ByteSink;

/// Read-only view of a finished record
#[derive(Clone, Copy)]
pub struct RecordView<'a> {
    arena: &'a ScratchArena,
    table: &'a FieldTable,
}

impl<'a> RecordView<'a> {
    pub fn new(arena: &'a ScratchArena, table: &'a FieldTable) -> Self {
        RecordView { arena, table }
    }

    /// Captured bytes of `field`, or `None` when it is absent
    #[inline]
    pub fn get(&self, field: Field) -> Option<&'a [u8]> {
        if self.table.is_present(field) {
            Some(self.arena.get(self.table.get(field)))
        } else {
            None
        }
    }

    /// Present and not a `<...>` placeholder such as `<N/A>`
    #[inline]
    pub fn value(&self, field: Field) -> Option<&'a [u8]> {
        self.get(field).filter(|v| v.first() != Some(&b'<'))
    }

    #[inline]
    pub fn has(&self, field: Field) -> bool {
        self.table.is_present(field)
    }

    /// Free-text legal form: the other-form text when given, else the
    /// generic form unless a code or other form was present at all
    pub fn legal_form_text(&self) -> Option<&'a [u8]> {
        if self.has(Field::OtherLegalForm) {
            self.value(Field::OtherLegalForm)
        } else if self.has(Field::LegalFormCode) {
            None
        } else {
            self.value(Field::LegalForm)
        }
    }

    /// Language tag of the legal name, if one was given
    pub fn lang(&self) -> Option<&'a [u8]> {
        let lang = self.table.lang();
        if lang.is_empty() {
            None
        } else {
            Some(lang.as_bytes())
        }
    }
}

/// What the preamble may depend on
#[derive(Debug, Clone, Copy)]
pub struct DocumentHeader<'a> {
    /// Document-level content date, when seen before the root was recognised
    pub content_date: Option<&'a [u8]>,
}

/// One output format
pub trait Renderer {
    /// Written once per document, right after the dialect is recognised
    fn preamble(&self, header: &DocumentHeader<'_>, out: &mut dyn ByteSink) -> Result<()>;

    /// Whether the record carries what this format needs
    fn accepts(&self, record: &RecordView<'_>) -> bool {
        record.has(Field::Lei)
    }

    /// Append the record; only called when [`Renderer::accepts`] held
    fn render(&self, record: &RecordView<'_>, out: &mut dyn ByteSink) -> Result<()>;
}

/// Selectable output profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Profile {
    /// Full Turtle with registration dates, legal form and jurisdiction IRIs
    #[default]
    Turtle,
    /// Reduced Turtle: name, legal form and jurisdiction only
    TurtleLite,
    /// Tab-separated identifier, name and website
    Tsv,
}

impl Profile {
    pub fn renderer(self) -> Box<dyn Renderer + Send + Sync> {
        match self {
            Profile::Turtle => Box::new(turtle::FullTurtle),
            Profile::TurtleLite => Box::new(turtle::LiteTurtle),
            Profile::Tsv => Box::new(tabular::Tabular),
        }
    }
}

/// Outcome of closing one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closed {
    Emitted,
    Discarded,
}

/// Decides per record whether to emit, renders, and clears for reuse
pub struct RecordEmitter {
    renderer: Box<dyn Renderer + Send + Sync>,
}

impl RecordEmitter {
    pub fn new(profile: Profile) -> Self {
        RecordEmitter {
            renderer: profile.renderer(),
        }
    }

    pub fn preamble(&self, header: &DocumentHeader<'_>, out: &mut dyn ByteSink) -> Result<()> {
        self.renderer.preamble(header, out)
    }

    /// Render the record if it qualifies, then reset `table` and `arena`.
    pub fn close(
        &self,
        arena: &mut ScratchArena,
        table: &mut FieldTable,
        out: &mut dyn ByteSink,
    ) -> Result<Closed> {
        let view = RecordView::new(arena, table);
        let outcome = if self.renderer.accepts(&view) {
            self.renderer.render(&view, out).map(|()| Closed::Emitted)
        } else {
            Ok(Closed::Discarded)
        };
        table.clear();
        arena.reset();
        outcome
    }
}
