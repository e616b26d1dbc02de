//! XML Entity Expansion
//!
//! Handles character data as the scanner delivers it:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//!
//! Named references are resolved through a caller-supplied lookup so the
//! event consumer decides what an entity means. Unknown names expand to
//! nothing.

use memchr::memchr;

/// Replacement text of a predefined entity name (without `&` and `;`)
pub fn predefined(name: &[u8]) -> Option<&'static [u8]> {
    match name {
        b"lt" => Some(b"<"),
        b"gt" => Some(b">"),
        b"amp" => Some(b"&"),
        b"quot" => Some(b"\""),
        b"apos" => Some(b"'"),
        _ => None,
    }
}

/// Expand every reference in `input` into `out` (which is cleared first).
///
/// An `&` without a terminating `;` is kept literally.
pub fn expand_into<F>(input: &[u8], out: &mut Vec<u8>, mut resolve: F)
where
    F: FnMut(&[u8]) -> Option<&'static [u8]>,
{
    out.clear();
    out.reserve(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let Some(amp) = memchr(b'&', &input[pos..]) else {
            out.extend_from_slice(&input[pos..]);
            break;
        };
        out.extend_from_slice(&input[pos..pos + amp]);
        pos += amp;

        let Some(semi) = memchr(b';', &input[pos..]) else {
            out.push(b'&');
            pos += 1;
            continue;
        };
        let name = &input[pos + 1..pos + semi];
        if let Some(rest) = name.strip_prefix(b"#") {
            match decode_numeric(rest) {
                Some(ch) => {
                    let mut utf8 = [0u8; 4];
                    out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                }
                None => out.extend_from_slice(&input[pos..=pos + semi]),
            }
        } else if let Some(text) = resolve(name) {
            out.extend_from_slice(text);
        } else {
            log::debug!(
                "dropping unknown entity &{};",
                String::from_utf8_lossy(name)
            );
        }
        pos += semi + 1;
    }
}

/// Decode the digits of a numeric character reference (after `#`)
fn decode_numeric(digits: &[u8]) -> Option<char> {
    let codepoint = match digits.first()? {
        b'x' | b'X' => {
            let hex = std::str::from_utf8(&digits[1..]).ok()?;
            u32::from_str_radix(hex, 16).ok()?
        }
        _ => std::str::from_utf8(digits).ok()?.parse::<u32>().ok()?,
    };
    char::from_u32(codepoint)
}
