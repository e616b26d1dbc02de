//! Element nesting bookkeeping
//!
//! Tracks the open-element stack across chunks so the scanner can report
//! structurally broken documents. Names are kept back to back in one byte
//! buffer; the stack holds end offsets into it.

use crate::error::{ConvertError, Result};
use crate::text::is_space;

/// Open-element stack for one document
#[derive(Debug, Default)]
pub struct Nesting {
    names: Vec<u8>,
    ends: Vec<usize>,
    root_seen: bool,
}

impl Nesting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current element depth
    #[inline]
    pub fn depth(&self) -> usize {
        self.ends.len()
    }

    fn top(&self) -> Option<&[u8]> {
        let end = *self.ends.last()?;
        let start = self.ends.len().checked_sub(2).map_or(0, |i| self.ends[i]);
        Some(&self.names[start..end])
    }

    /// Record an element start
    pub fn open(&mut self, name: &[u8], offset: u64) -> Result<()> {
        if self.ends.is_empty() && self.root_seen {
            return Err(ConvertError::malformed(offset, "extra content after the root element"));
        }
        self.root_seen = true;
        self.names.extend_from_slice(name);
        self.ends.push(self.names.len());
        Ok(())
    }

    /// Record an element end, checking it matches the innermost start
    pub fn close(&mut self, name: &[u8], offset: u64) -> Result<()> {
        let Some(open) = self.top() else {
            return Err(ConvertError::malformed(
                offset,
                format!("unexpected end tag </{}>", String::from_utf8_lossy(name)),
            ));
        };
        if open != name {
            return Err(ConvertError::malformed(
                offset,
                format!(
                    "mismatched end tag: expected </{}>, found </{}>",
                    String::from_utf8_lossy(open),
                    String::from_utf8_lossy(name)
                ),
            ));
        }
        self.ends.pop();
        self.names.truncate(self.ends.last().copied().unwrap_or(0));
        Ok(())
    }

    /// Character data is only allowed outside the root if it is whitespace
    pub fn check_text(&self, text: &[u8], offset: u64) -> Result<()> {
        if self.ends.is_empty() && !text.iter().all(|&b| is_space(b) || b == b'\r') {
            return Err(ConvertError::malformed(offset, "text outside the root element"));
        }
        Ok(())
    }

    /// Verify the document ended cleanly
    pub fn finish(&self, offset: u64) -> Result<()> {
        if let Some(open) = self.top() {
            return Err(ConvertError::malformed(
                offset,
                format!("unexpected end of input inside <{}>", String::from_utf8_lossy(open)),
            ));
        }
        if !self.root_seen {
            return Err(ConvertError::malformed(offset, "document has no root element"));
        }
        Ok(())
    }
}
