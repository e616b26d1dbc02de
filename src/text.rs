//! Text transforms applied between the arena and the output.
//!
//! Every transform walks its input once and hands unchanged runs to the
//! sink as whole slices; only the replaced bytes are written individually.
//! None of them allocate.

use memchr::{memchr, memchr3};

use crate::error::Result;

/// Destination for transformed bytes
pub trait ByteSink {
    /// Append `bytes` verbatim
    fn put(&mut self, bytes: &[u8]) -> Result<()>;
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Whitespace as far as name and literal normalisation is concerned
#[inline]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0c)
}

/// Strip leading and trailing whitespace runs.
pub fn trim_space(src: &[u8]) -> &[u8] {
    let start = src.iter().position(|&b| !is_space(b)).unwrap_or(src.len());
    let end = src.iter().rposition(|&b| !is_space(b)).map_or(start, |i| i + 1);
    &src[start..end]
}

#[inline]
fn put_run<S: ByteSink + ?Sized>(out: &mut S, run: &[u8]) -> Result<()> {
    if run.is_empty() {
        return Ok(());
    }
    out.put(run)
}

/// Backslash-escape `"`, `\` and newline for a single-line quoted literal.
pub fn escape_literal<S: ByteSink + ?Sized>(src: &[u8], out: &mut S) -> Result<()> {
    let mut rest = src;
    while let Some(i) = memchr3(b'"', b'\\', b'\n', rest) {
        put_run(out, &rest[..i])?;
        match rest[i] {
            b'\n' => out.put(b"\\n")?,
            b => out.put(&[b'\\', b])?,
        }
        rest = &rest[i + 1..];
    }
    put_run(out, rest)
}

/// Collapse whitespace runs to one space, trim both ends, escape `"` and `\`.
pub fn escape_normalized<S: ByteSink + ?Sized>(src: &[u8], out: &mut S) -> Result<()> {
    normalize(src, out, true)
}

/// Collapse whitespace runs to one space and trim both ends, no escaping.
pub fn normalize_space<S: ByteSink + ?Sized>(src: &[u8], out: &mut S) -> Result<()> {
    normalize(src, out, false)
}

fn normalize<S: ByteSink + ?Sized>(src: &[u8], out: &mut S, escape: bool) -> Result<()> {
    let body = trim_space(src);
    let mut run = 0;
    let mut i = 0;

    while i < body.len() {
        let b = body[i];
        if is_space(b) {
            put_run(out, &body[run..i])?;
            out.put(b" ")?;
            while i < body.len() && is_space(body[i]) {
                i += 1;
            }
            run = i;
        } else if escape && (b == b'"' || b == b'\\') {
            put_run(out, &body[run..i])?;
            out.put(&[b'\\', b])?;
            i += 1;
            run = i;
        } else {
            i += 1;
        }
    }
    put_run(out, &body[run..])
}

/// Neutralise the bytes that would end an IRI early.
///
/// This is not percent-encoding: only `<`, `>`, `"` and newline are touched.
pub fn escape_iri<S: ByteSink + ?Sized>(src: &[u8], out: &mut S) -> Result<()> {
    let mut run = 0;
    for (i, &b) in src.iter().enumerate() {
        let esc: &[u8] = match b {
            b'<' => b"\\u003C",
            b'>' => b"\\u003E",
            b'"' => b"\\u0022",
            b'\n' => b"\\u000A",
            _ => continue,
        };
        put_run(out, &src[run..i])?;
        out.put(esc)?;
        run = i + 1;
    }
    put_run(out, &src[run..])
}

const PREDEFINED: [(&[u8], u8); 5] = [
    (b"&amp;", b'&'),
    (b"&lt;", b'<'),
    (b"&gt;", b'>'),
    (b"&quot;", b'"'),
    (b"&apos;", b'\''),
];

/// Decode the five predefined entities of `buf` in place.
///
/// Returns the decoded length; bytes past it are garbage. Unknown entity
/// references stay as literal text.
pub fn decode_entities_in_place(buf: &mut [u8]) -> usize {
    let Some(first) = memchr(b'&', buf) else {
        return buf.len();
    };

    let mut i = first;
    let mut o = first;
    while i < buf.len() {
        let b = buf[i];
        if b == b'&' {
            if let Some(&(ent, ch)) = PREDEFINED.iter().find(|(ent, _)| buf[i..].starts_with(ent)) {
                buf[o] = ch;
                o += 1;
                i += ent.len();
                continue;
            }
        }
        buf[o] = b;
        o += 1;
        i += 1;
    }
    o
}
