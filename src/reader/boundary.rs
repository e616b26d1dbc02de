//! Markup boundary tracking for chunked input
//!
//! Finds the last position in the buffer where a complete piece of markup
//! has just ended, so everything before it can be scanned without a token
//! being cut in half. The tracker keeps its state between calls and never
//! rescans bytes it has already classified.

use memchr::{memchr, memmem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Character data between tags
    Text,
    /// Inside `<name ...>` or `</name>`, with the open quote if any
    Tag { quote: Option<u8> },
    Comment,
    CData,
    Pi,
    /// `<!DOCTYPE ...>` with internal-subset bracket depth
    Decl { depth: u32, quote: Option<u8> },
    /// Comment inside a declaration's internal subset
    DeclComment { depth: u32 },
}

/// Incremental scanner for safe chunk boundaries
#[derive(Debug)]
pub struct BoundaryTracker {
    mode: Mode,
    /// Next byte to classify
    pos: usize,
    /// End of the last complete markup construct
    boundary: usize,
}

impl Default for BoundaryTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundaryTracker {
    pub fn new() -> Self {
        BoundaryTracker {
            mode: Mode::Text,
            pos: 0,
            boundary: 0,
        }
    }

    /// True when the buffer ends inside a tag, comment, CDATA or declaration
    pub fn in_markup(&self) -> bool {
        self.mode != Mode::Text
    }

    /// Classify new bytes of `buf` and return the safe boundary (0 if none).
    pub fn advance(&mut self, buf: &[u8]) -> usize {
        while self.pos < buf.len() {
            match self.mode {
                Mode::Text => {
                    let Some(i) = memchr(b'<', &buf[self.pos..]) else {
                        self.pos = buf.len();
                        break;
                    };
                    let lt = self.pos + i;
                    match classify(&buf[lt..]) {
                        Some((mode, skip)) => {
                            self.mode = mode;
                            self.pos = lt + skip;
                        }
                        None => {
                            // Not enough bytes to tell what starts here
                            self.pos = lt;
                            break;
                        }
                    }
                }
                Mode::Tag { quote } => {
                    let rest = &buf[self.pos..];
                    let found = match quote {
                        Some(q) => memchr(q, rest).map(|i| (i, Mode::Tag { quote: None })),
                        None => rest.iter().position(|&b| matches!(b, b'"' | b'\'' | b'>')).map(|i| {
                            match rest[i] {
                                b'>' => (i, Mode::Text),
                                q => (i, Mode::Tag { quote: Some(q) }),
                            }
                        }),
                    };
                    match found {
                        Some((i, next)) => {
                            self.pos += i + 1;
                            self.mode = next;
                            if next == Mode::Text {
                                self.boundary = self.pos;
                            }
                        }
                        None => self.pos = buf.len(),
                    }
                }
                Mode::Comment | Mode::CData | Mode::Pi => {
                    let terminator: &[u8] = match self.mode {
                        Mode::Comment => b"-->",
                        Mode::CData => b"]]>",
                        _ => b"?>",
                    };
                    if !self.seek_terminator(buf, terminator) {
                        break;
                    }
                }
                Mode::DeclComment { depth } => match memmem::find(&buf[self.pos..], b"-->") {
                    Some(i) => {
                        self.pos += i + 3;
                        self.mode = Mode::Decl { depth, quote: None };
                    }
                    None => {
                        self.pos = buf.len().saturating_sub(2).max(self.pos);
                        break;
                    }
                },
                Mode::Decl { depth, quote } => {
                    let rest = &buf[self.pos..];
                    if quote.is_none() && depth > 0 && rest[0] == b'<' {
                        if rest.starts_with(COMMENT) {
                            self.pos += COMMENT.len();
                            self.mode = Mode::DeclComment { depth };
                            continue;
                        }
                        if rest.len() < COMMENT.len() && COMMENT.starts_with(rest) {
                            break;
                        }
                    }
                    let b = rest[0];
                    self.pos += 1;
                    self.mode = match (quote, b) {
                        (Some(q), _) if b == q => Mode::Decl { depth, quote: None },
                        (Some(_), _) => continue,
                        (None, b'"' | b'\'') => Mode::Decl { depth, quote: Some(b) },
                        (None, b'[') => Mode::Decl { depth: depth + 1, quote },
                        (None, b']') => Mode::Decl { depth: depth.saturating_sub(1), quote },
                        (None, b'>') if depth == 0 => {
                            self.boundary = self.pos;
                            Mode::Text
                        }
                        _ => continue,
                    };
                }
            }
        }
        self.boundary
    }

    /// Move past `terminator`; false when the buffer ends before it
    fn seek_terminator(&mut self, buf: &[u8], terminator: &[u8]) -> bool {
        match memmem::find(&buf[self.pos..], terminator) {
            Some(i) => {
                self.pos += i + terminator.len();
                self.mode = Mode::Text;
                self.boundary = self.pos;
                true
            }
            None => {
                // The terminator may straddle the end of the buffer
                self.pos = buf.len().saturating_sub(terminator.len() - 1).max(self.pos);
                false
            }
        }
    }

    /// Shift positions after the caller dropped `consumed` bytes from the front
    pub fn consume(&mut self, consumed: usize) {
        self.pos -= consumed.min(self.pos);
        self.boundary -= consumed.min(self.boundary);
    }
}

const COMMENT: &[u8] = b"<!--";

/// Work out which construct starts at `<`, or `None` if more bytes are needed
fn classify(rest: &[u8]) -> Option<(Mode, usize)> {
    const CDATA: &[u8] = b"<![CDATA[";

    if rest.starts_with(COMMENT) {
        return Some((Mode::Comment, COMMENT.len()));
    }
    if rest.starts_with(CDATA) {
        return Some((Mode::CData, CDATA.len()));
    }
    if rest.len() < CDATA.len() && (COMMENT.starts_with(rest) || CDATA.starts_with(rest)) {
        return None;
    }
    match rest.get(1)? {
        b'?' => Some((Mode::Pi, 2)),
        b'!' => Some((Mode::Decl { depth: 0, quote: None }, 2)),
        _ => Some((Mode::Tag { quote: None }, 1)),
    }
}
