//! Unified Scanner with ScanHandler Trait
//!
//! Turns a slice of complete markup into start / end / text callbacks.
//! The slice is one chunk handed over by the streaming reader; everything
//! that must survive between chunks (open-element stack, scratch buffers)
//! lives in a [`ScanContext`] owned by the reader.
//!
//! The scanner uses the memchr-based [`Scanner`] for byte searching.

use memchr::memchr2;

use super::entities::{expand_into, predefined};
use super::nesting::Nesting;
use super::scanner::{is_name_start_char, Scanner};
use super::span::Span;
use crate::error::{ConvertError, Result};

/// Trait for handling scan events
///
/// Every callback may fail; the first error stops the scan and is
/// returned from [`UnifiedScanner::scan`].
pub trait ScanHandler {
    /// Called when an element starts. Self-closing elements produce a
    /// start immediately followed by an end.
    ///
    /// # Arguments
    /// * `name` - Full element name, including any namespace prefix
    /// * `attrs` - Attributes in document order, values unexpanded
    fn start_element(&mut self, name: &[u8], attrs: Attributes<'_>) -> Result<()>;

    /// Called when an element ends
    fn end_element(&mut self, name: &[u8]) -> Result<()>;

    /// Called for character data inside the root element, with references
    /// already expanded through [`ScanHandler::resolve_entity`]. CDATA
    /// sections arrive here verbatim.
    fn text(&mut self, text: &[u8]) -> Result<()>;

    /// Replacement text for `&name;`; `None` expands to nothing
    fn resolve_entity(&self, name: &[u8]) -> Option<&'static [u8]> {
        predefined(name)
    }
}

/// Attribute list of one start tag
#[derive(Clone, Copy)]
pub struct Attributes<'a> {
    input: &'a [u8],
    spans: &'a [(Span, Span)],
}

impl<'a> Attributes<'a> {
    /// Wrap attribute spans pointing into `input`
    pub fn new(input: &'a [u8], spans: &'a [(Span, Span)]) -> Self {
        Attributes { input, spans }
    }

    /// Iterate `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&'a [u8], &'a [u8])> + 'a {
        let input = self.input;
        self.spans
            .iter()
            .map(move |(n, v)| (n.slice(input), v.slice(input)))
    }
}

/// State carried from one chunk to the next
#[derive(Debug, Default)]
pub struct ScanContext {
    /// Open-element stack
    pub nesting: Nesting,
    /// Reusable attribute buffer to avoid per-element allocations
    attrs: Vec<(Span, Span)>,
    /// Reusable buffer for expanded character data
    text: Vec<u8>,
}

impl ScanContext {
    pub fn new() -> Self {
        ScanContext {
            nesting: Nesting::new(),
            attrs: Vec::with_capacity(8), // Most elements have < 8 attrs
            text: Vec::new(),
        }
    }
}

/// Unified scanner that uses ScanHandler for event dispatch
pub struct UnifiedScanner<'a, 'c> {
    input: &'a [u8],
    scanner: Scanner<'a>,
    /// Absolute offset of `input[0]` in the document, for error messages
    base: u64,
    ctx: &'c mut ScanContext,
}

impl<'a, 'c> UnifiedScanner<'a, 'c> {
    /// Create a new unified scanner for one chunk starting at `base`
    pub fn new(input: &'a [u8], base: u64, ctx: &'c mut ScanContext) -> Self {
        Self {
            input,
            scanner: Scanner::new(input),
            base,
            ctx,
        }
    }

    #[inline]
    fn offset(&self, pos: usize) -> u64 {
        self.base + pos as u64
    }

    fn malformed(&self, pos: usize, reason: &str) -> ConvertError {
        ConvertError::malformed(self.offset(pos), reason)
    }

    /// Scan the entire chunk, calling handler methods for each token
    pub fn scan<H: ScanHandler>(&mut self, handler: &mut H) -> Result<()> {
        while let Some(c) = self.scanner.peek() {
            if c == b'<' {
                self.scan_markup(handler)?;
            } else {
                self.scan_text(handler)?;
            }
        }
        Ok(())
    }

    /// Scan markup starting with '<'
    fn scan_markup<H: ScanHandler>(&mut self, handler: &mut H) -> Result<()> {
        let start = self.scanner.position();
        self.scanner.advance(1); // Skip '<'

        match self.scanner.peek() {
            Some(b'/') => {
                self.scanner.advance(1);
                self.scan_end_tag(handler, start)
            }
            Some(b'!') => {
                if self.scanner.starts_with(b"!--") {
                    self.scanner.advance(3);
                    self.skip_past(b"-->", start, "unterminated comment")
                } else if self.scanner.starts_with(b"![CDATA[") {
                    self.scanner.advance(8);
                    self.scan_cdata(handler, start)
                } else {
                    self.skip_doctype(start)
                }
            }
            Some(b'?') => {
                // Processing instruction or XML declaration
                self.skip_past(b"?>", start, "unterminated processing instruction")
            }
            Some(c) if is_name_start_char(c) => self.scan_start_tag(handler, start),
            _ => Err(self.malformed(start, "invalid markup")),
        }
    }

    /// Scan a start tag; the scanner sits just after '<'
    fn scan_start_tag<H: ScanHandler>(&mut self, handler: &mut H, start: usize) -> Result<()> {
        let name = match self.scanner.read_name() {
            Some(name) => name,
            None => return Err(self.malformed(start, "invalid element name")),
        };

        // Parse attributes - reuse buffer to avoid per-element allocations
        self.ctx.attrs.clear();
        loop {
            self.scanner.skip_whitespace();
            match self.scanner.peek() {
                Some(b'>') => {
                    self.scanner.advance(1);
                    let at = self.offset(start);
                    self.ctx.nesting.open(name, at)?;
                    handler.start_element(name, Attributes::new(self.input, &self.ctx.attrs))?;
                    return Ok(());
                }
                Some(b'/') if self.scanner.peek_at(1) == Some(b'>') => {
                    self.scanner.advance(2);
                    let at = self.offset(start);
                    self.ctx.nesting.open(name, at)?;
                    handler.start_element(name, Attributes::new(self.input, &self.ctx.attrs))?;
                    self.ctx.nesting.close(name, at)?;
                    return handler.end_element(name);
                }
                Some(c) if is_name_start_char(c) => {
                    let attr = self.scan_attribute(start)?;
                    self.ctx.attrs.push(attr);
                }
                Some(_) => return Err(self.malformed(self.scanner.position(), "invalid character in start tag")),
                None => return Err(self.malformed(start, "unterminated start tag")),
            }
        }
    }

    /// Scan an attribute, returning (name_span, value_span)
    fn scan_attribute(&mut self, tag_start: usize) -> Result<(Span, Span)> {
        let name_start = self.scanner.position();
        self.scanner.read_name();
        let name_end = self.scanner.position();

        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'=') {
            return Err(self.malformed(name_start, "attribute without value"));
        }
        self.scanner.advance(1);
        self.scanner.skip_whitespace();

        let quote = match self.scanner.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.malformed(self.scanner.position(), "unquoted attribute value")),
        };
        self.scanner.advance(1);

        let value_start = self.scanner.position();
        let value_end = match self.scanner.find_byte(quote) {
            Some(end) => end,
            None => return Err(self.malformed(tag_start, "unterminated attribute value")),
        };
        self.scanner.set_position(value_end + 1);

        match (Span::between(name_start, name_end), Span::between(value_start, value_end)) {
            (Some(name), Some(value)) => Ok((name, value)),
            _ => Err(ConvertError::OutOfMemory {
                buffer: "attribute offsets",
                requested: value_end,
            }),
        }
    }

    /// Scan an end tag; the scanner sits just after '</'
    fn scan_end_tag<H: ScanHandler>(&mut self, handler: &mut H, start: usize) -> Result<()> {
        let name = match self.scanner.read_name() {
            Some(name) => name,
            None => return Err(self.malformed(start, "invalid end tag")),
        };
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(self.malformed(start, "unterminated end tag"));
        }
        self.scanner.advance(1);

        let at = self.offset(start);
        self.ctx.nesting.close(name, at)?;
        handler.end_element(name)
    }

    /// Scan text content up to the next '<'
    fn scan_text<H: ScanHandler>(&mut self, handler: &mut H) -> Result<()> {
        let start = self.scanner.position();
        let end = self.scanner.find_byte(b'<').unwrap_or(self.input.len());
        self.scanner.set_position(end);

        let raw = self.scanner.slice(start, end);
        self.ctx.nesting.check_text(raw, self.offset(start))?;
        if self.ctx.nesting.depth() == 0 {
            return Ok(());
        }

        if memchr2(b'&', b'\r', raw).is_none() {
            return handler.text(raw);
        }
        let resolver = &*handler;
        expand_into(raw, &mut self.ctx.text, |name| resolver.resolve_entity(name));
        fold_line_breaks(&mut self.ctx.text);
        handler.text(&self.ctx.text)
    }

    /// Scan a CDATA section; the scanner sits just after `<![CDATA[`
    fn scan_cdata<H: ScanHandler>(&mut self, handler: &mut H, start: usize) -> Result<()> {
        let content_start = self.scanner.position();
        let end = match self.scanner.find_seq(b"]]>") {
            Some(end) => end,
            None => return Err(self.malformed(start, "unterminated CDATA section")),
        };
        self.scanner.set_position(end + 3);

        if self.ctx.nesting.depth() == 0 {
            return Err(self.malformed(start, "CDATA section outside the root element"));
        }
        handler.text(self.scanner.slice(content_start, end))
    }

    /// Skip to just after `terminator`
    fn skip_past(&mut self, terminator: &[u8], start: usize, reason: &str) -> Result<()> {
        match self.scanner.find_seq(terminator) {
            Some(pos) => {
                self.scanner.set_position(pos + terminator.len());
                Ok(())
            }
            None => Err(self.malformed(start, reason)),
        }
    }

    /// Skip a DOCTYPE declaration, including an internal subset
    fn skip_doctype(&mut self, start: usize) -> Result<()> {
        let mut depth = 0usize;
        let mut quote = None;

        while let Some(c) = self.scanner.peek() {
            self.scanner.advance(1);
            match (quote, c) {
                (Some(q), _) if c == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(c),
                (None, b'<') if depth > 0 && self.scanner.starts_with(b"!--") => {
                    self.skip_past(b"-->", start, "unterminated comment")?;
                }
                (None, b'[') => depth += 1,
                (None, b']') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.malformed(start, "unterminated declaration"))
    }
}

/// Apply XML end-of-line handling: `\r\n` and lone `\r` become `\n`.
fn fold_line_breaks(buf: &mut Vec<u8>) {
    if memchr::memchr(b'\r', buf).is_none() {
        return;
    }
    let mut o = 0;
    let mut i = 0;
    while i < buf.len() {
        let b = buf[i];
        i += 1;
        if b == b'\r' {
            if buf.get(i) == Some(&b'\n') {
                i += 1;
            }
            buf[o] = b'\n';
        } else {
            buf[o] = b;
        }
        o += 1;
    }
    buf.truncate(o);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test handler that records events as strings
    #[derive(Default)]
    struct TestHandler {
        events: Vec<String>,
    }

    impl ScanHandler for TestHandler {
        fn start_element(&mut self, name: &[u8], attrs: Attributes<'_>) -> Result<()> {
            let mut ev = format!("<{}", String::from_utf8_lossy(name));
            for (n, v) in attrs.iter() {
                ev.push_str(&format!(" {}={}", String::from_utf8_lossy(n), String::from_utf8_lossy(v)));
            }
            self.events.push(ev);
            Ok(())
        }

        fn end_element(&mut self, name: &[u8]) -> Result<()> {
            self.events.push(format!("/{}", String::from_utf8_lossy(name)));
            Ok(())
        }

        fn text(&mut self, text: &[u8]) -> Result<()> {
            self.events.push(format!("'{}'", String::from_utf8_lossy(text)));
            Ok(())
        }
    }

    fn scan(input: &[u8]) -> Result<Vec<String>> {
        let mut ctx = ScanContext::new();
        let mut handler = TestHandler::default();
        UnifiedScanner::new(input, 0, &mut ctx).scan(&mut handler)?;
        ctx.nesting.finish(input.len() as u64)?;
        Ok(handler.events)
    }

    #[test]
    fn test_simple_element() {
        assert_eq!(scan(b"<root/>").unwrap(), vec!["<root", "/root"]);
    }

    #[test]
    fn test_nested_elements_with_text() {
        assert_eq!(
            scan(b"<a><b>hi</b></a>").unwrap(),
            vec!["<a", "<b", "'hi'", "/b", "/a"]
        );
    }

    #[test]
    fn test_attributes() {
        assert_eq!(
            scan(b"<n xml:lang=\"de\" k='v'/>").unwrap(),
            vec!["<n xml:lang=de k=v", "/n"]
        );
    }

    #[test]
    fn test_entity_expansion() {
        assert_eq!(
            scan(b"<a>Q &amp; A &#x21;</a>").unwrap(),
            vec!["<a", "'Q & A !'", "/a"]
        );
    }

    #[test]
    fn test_cdata_is_verbatim_text() {
        assert_eq!(
            scan(b"<a><![CDATA[x &amp; <y>]]></a>").unwrap(),
            vec!["<a", "'x &amp; <y>'", "/a"]
        );
    }

    #[test]
    fn test_prolog_is_skipped() {
        let input = b"<?xml version=\"1.0\"?>\n<!DOCTYPE r [<!ENTITY x \"y\">]>\n<!-- c --><r/>\n";
        assert_eq!(scan(input).unwrap(), vec!["<r", "/r"]);
    }

    #[test]
    fn test_doctype_subset_comment_with_apostrophe() {
        let input = b"<!DOCTYPE r [<!-- it's -->]><r/>";
        assert_eq!(scan(input).unwrap(), vec!["<r", "/r"]);
    }

    #[test]
    fn test_crlf_is_folded() {
        assert_eq!(scan(b"<a>x\r\ny\rz</a>").unwrap(), vec!["<a", "'x\ny\nz'", "/a"]);
    }

    #[test]
    fn test_invalid_markup_is_an_error() {
        assert!(matches!(scan(b"<a><1bad/></a>"), Err(ConvertError::Malformed { offset: 3, .. })));
    }

    #[test]
    fn test_mismatched_end_tag_is_an_error() {
        assert!(scan(b"<a><b></a></b>").is_err());
    }

    #[test]
    fn test_unterminated_comment_is_an_error() {
        assert!(scan(b"<a><!-- never closed").is_err());
    }
}
