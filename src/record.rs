//! Field capture table for the record in flight.
//!
//! Each recognised field is a [`Span`] into the scratch arena; an empty span
//! means the field is absent. The span's offset is written when the field's
//! start tag is seen and its length when the end tag is seen, so a field
//! whose element encloses another captured field (`LegalForm` around
//! `EntityLegalFormCode`) still covers the inner text.

use crate::core::span::Span;

/// Fields a record can carry, across both dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Field {
    /// Principal identifier (the LEI); mandatory
    Lei,
    LegalName,
    LegalForm,
    LegalFormCode,
    OtherLegalForm,
    Jurisdiction,
    Status,
    InitialRegistrationDate,
    LastUpdateDate,
    Website,
}

impl Field {
    pub const COUNT: usize = 10;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Maximum bytes kept of a `lang` attribute
pub const LANG_CAPACITY: usize = 7;

/// Language tag stored inline; longer values are truncated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LangTag {
    bytes: [u8; LANG_CAPACITY],
    len: u8,
}

impl LangTag {
    pub fn new(value: &[u8]) -> Self {
        let len = value.len().min(LANG_CAPACITY);
        let mut bytes = [0u8; LANG_CAPACITY];
        bytes[..len].copy_from_slice(&value[..len]);
        LangTag { bytes, len: len as u8 }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Spans of every field of one record, plus the inline language tag
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    spans: [Span; Field::COUNT],
    lang: LangTag,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of `field` at arena offset `offset`
    #[inline]
    pub fn open(&mut self, field: Field, offset: u32) {
        self.spans[field.index()] = Span::new(offset, 0);
    }

    /// Finish `field` with the arena cursor at `cursor`
    #[inline]
    pub fn close(&mut self, field: Field, cursor: u32) {
        let span = &mut self.spans[field.index()];
        span.len = cursor.saturating_sub(span.offset);
    }

    /// Record the final span of `field` directly
    #[inline]
    pub fn set(&mut self, field: Field, span: Span) {
        self.spans[field.index()] = span;
    }

    /// Span of `field`; empty if absent
    #[inline]
    pub fn get(&self, field: Field) -> Span {
        self.spans[field.index()]
    }

    /// Start offset of `field` as recorded by [`FieldTable::open`]
    #[inline]
    pub fn start(&self, field: Field) -> u32 {
        self.spans[field.index()].offset
    }

    /// A field counts as present only with at least one captured byte
    #[inline]
    pub fn is_present(&self, field: Field) -> bool {
        !self.spans[field.index()].is_empty()
    }

    pub fn set_lang(&mut self, lang: LangTag) {
        self.lang = lang;
    }

    pub fn lang(&self) -> &LangTag {
        &self.lang
    }

    /// Forget every field
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
