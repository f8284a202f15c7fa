//! Character reference decoding and escaping.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Text is decoded in a single left-to-right pass, so the output of one
//! reference is never re-read as the start of another: `&amp;lt;` decodes to
//! `&lt;`, not `<`. This is what makes [`escape_html`] and [`decode_entities`]
//! exact inverses.

use super::named_character_references::{any_entity_has_prefix, lookup_entity};

/// Decode every character reference in `text`.
///
/// Handles named references (longest match wins, legacy forms without `;`
/// included), decimal `&#60;` and hexadecimal `&#x3C;` references. A `&`
/// that does not start a known reference is kept verbatim.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        output.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match decode_reference(after) {
            Some((replacement, consumed)) => {
                output.push_str(&replacement);
                rest = &after[consumed..];
            }
            None => {
                output.push('&');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

/// Escape text so it can be embedded in markup and decoded back unchanged.
///
/// Replaces `&`, `<`, `>` and `"` with their named references.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(c),
        }
    }
    output
}

/// Decode the reference that starts right after a `&`.
///
/// Returns the replacement text and how many bytes of `after` it consumed.
fn decode_reference(after: &str) -> Option<(String, usize)> {
    if let Some(numeric) = after.strip_prefix('#') {
        return decode_numeric_reference(numeric).map(|(c, consumed)| (c.to_string(), consumed + 1));
    }
    decode_named_reference(after).map(|(s, consumed)| (s.to_string(), consumed))
}

/// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
///
/// "Consume the maximum number of characters possible, where the consumed
/// characters are one of the identifiers in the named character references table."
fn decode_named_reference(after: &str) -> Option<(&'static str, usize)> {
    let mut best = None;
    for (i, c) in after.char_indices() {
        let end = i + c.len_utf8();
        let candidate = &after[..end];
        if !any_entity_has_prefix(candidate) {
            break;
        }
        if let Some(replacement) = lookup_entity(candidate) {
            best = Some((replacement, end));
        }
    }
    best
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
///
/// `after` is the text following `&#`. Returns the character and the number
/// of bytes consumed, including an optional trailing `;`.
fn decode_numeric_reference(after: &str) -> Option<(char, usize)> {
    let (digits_start, radix) = match after.chars().next() {
        Some('x' | 'X') => (1, 16),
        _ => (0, 10),
    };
    let digits_len = after[digits_start..]
        .chars()
        .take_while(|c| c.is_digit(radix))
        .count();
    if digits_len == 0 {
        return None;
    }

    let digits_end = digits_start + digits_len;
    let mut consumed = digits_end;
    if after[digits_end..].starts_with(';') {
        consumed += 1;
    }

    // [§ 13.2.5.80 Numeric character reference end state]
    // "If the number is 0x00 ... or outside the range of Unicode ... or a
    // surrogate, set the character reference code to 0xFFFD."
    let c = u32::from_str_radix(&after[digits_start..digits_end], radix)
        .ok()
        .filter(|&code| code != 0)
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER);

    Some((c, consumed))
}
