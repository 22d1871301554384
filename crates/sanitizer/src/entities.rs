//! Character reference decoding.
//!
//! Contract:
//! - Named references are matched against [`ENTITIES`] with a longest-match rule:
//!   `&notin;` is `∉`, not `¬` followed by `in;`. The trailing `;` is optional and
//!   consumed when present.
//! - Numeric references (`&#65;`, `&#x41;`, `&#X41;`) decode by value. The `;` is
//!   optional. `U+0000`, surrogates and values above `U+10FFFF` decode to
//!   `U+FFFD`.
//! - An `&` that does not start a reference is kept as-is and scanning resumes
//!   at the next byte.
//! - Single pass: decoded characters are never rescanned, so `&amp;lt;` decodes to
//!   `&lt;`.

use std::borrow::Cow;
use std::sync::LazyLock;

use memchr::memchr;

use crate::entity_names::ENTITIES;
use crate::trie::Trie;

/// Largest Unicode scalar value a numeric reference may produce.
pub const MAX_CODEPOINT: u32 = 0x10_FFFF;

/// Substituted for numeric references outside the valid scalar range.
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

static ENTITY_TRIE: LazyLock<Trie<char>> = LazyLock::new(|| {
    Trie::build(ENTITIES.iter().copied()).expect("entity table is a non-empty static")
});

/// Decode every character reference in `s`.
///
/// Returns the input borrowed when nothing was decoded.
pub fn decode(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let Some(first_amp) = memchr(b'&', bytes) else {
        return Cow::Borrowed(s);
    };

    let mut out: Option<String> = None;
    let mut copy_start = 0;
    let mut amp = first_amp;
    loop {
        let resume = match decode_entity_at(s, amp) {
            Some((end, ch)) => {
                let buf = out.get_or_insert_with(|| String::with_capacity(s.len()));
                buf.push_str(&s[copy_start..amp]);
                buf.push(ch);
                copy_start = end;
                end
            }
            // Keep the `&` literally; it is flushed with the next span.
            None => amp + 1,
        };
        match memchr(b'&', &bytes[resume..]) {
            Some(rel) => amp = resume + rel,
            None => break,
        }
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&s[copy_start..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(s),
    }
}

/// Decode the reference starting at the `&` at byte offset `amp`.
///
/// Returns the byte offset just past the reference and the decoded character,
/// or `None` when no reference starts there.
pub fn decode_entity_at(s: &str, amp: usize) -> Option<(usize, char)> {
    debug_assert_eq!(s.as_bytes().get(amp), Some(&b'&'));
    let rest = &s[amp + 1..];
    if let Some(numeric) = rest.strip_prefix('#') {
        return decode_numeric(numeric).map(|(len, ch)| (amp + 2 + len, ch));
    }
    decode_named(rest).map(|(len, ch)| (amp + 1 + len, ch))
}

fn decode_named(rest: &str) -> Option<(usize, char)> {
    let mut node: &Trie<char> = &ENTITY_TRIE;
    let mut longest = None;
    for (idx, ch) in rest.char_indices() {
        let Some(next) = node.child(ch) else {
            break;
        };
        node = next;
        // A shorter name may be a prefix of a longer one; keep going.
        if let Some(&value) = node.value() {
            longest = Some((idx + ch.len_utf8(), value));
        }
    }
    let (mut len, value) = longest?;
    if rest.as_bytes().get(len) == Some(&b';') {
        len += 1;
    }
    Some((len, value))
}

fn decode_numeric(body: &str) -> Option<(usize, char)> {
    let bytes = body.as_bytes();
    let (radix, digits_start) = match bytes.first() {
        Some(b'x' | b'X') => (16, 1),
        _ => (10, 0),
    };

    // Overlong digit runs are consumed in full; the value saturates.
    let mut end = digits_start;
    let mut value: u32 = 0;
    while let Some(digit) = bytes.get(end).and_then(|b| char::from(*b).to_digit(radix)) {
        value = value.saturating_mul(radix).saturating_add(digit);
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    if bytes.get(end) == Some(&b';') {
        end += 1;
    }

    let ch = if value == 0 || value > MAX_CODEPOINT {
        REPLACEMENT_CHARACTER
    } else {
        char::from_u32(value).unwrap_or(REPLACEMENT_CHARACTER)
    };
    Some((end, ch))
}
