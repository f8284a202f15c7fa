//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to")
//! - Input/character handling ("Consume the next input character")
//! - Token emission ("Emit the current token")
//! - Tag text splitting into a name and attributes

use super::character_reference::decode_entities;
use super::core::{HTMLTokenizer, TokenizerState};
use super::token::{Attribute, Token};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Switch to the X state"
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Consume the next input character"
    ///
    /// Returns the character at the current position and advances the position.
    /// Returns None if we've reached the end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Consume `count` characters without looking at them.
    pub(super) fn skip(&mut self, count: usize) {
        for _ in 0..count {
            if self.consume().is_none() {
                break;
            }
        }
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "If the next few characters are..."
    ///
    /// Check if the next few characters match the target string exactly.
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this tokenizer."
    ///
    /// Called right after a `<` was consumed in raw text: true if the input
    /// continues with `/name` (ASCII case-insensitive) followed by a tag
    /// delimiter or end of input.
    pub(super) fn is_appropriate_end_tag(&self) -> bool {
        let Some(name) = &self.raw_text_element else {
            return false;
        };
        let Some(rest) = self.input[self.current_pos..].strip_prefix('/') else {
            return false;
        };
        let Some(candidate) = rest.get(..name.len()) else {
            return false;
        };
        if !candidate.eq_ignore_ascii_case(name) {
            return false;
        }
        rest[name.len()..]
            .chars()
            .next()
            .is_none_or(|c| c == '>' || c == '/' || c.is_ascii_whitespace())
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Emit the current token"
    pub(super) fn emit_token(&mut self, token: Token) {
        self.token_stream.push(token);
    }

    /// Emit pending text, if any, as a single text token.
    pub(super) fn flush_text(&mut self) {
        if !self.text_buffer.is_empty() {
            let data = std::mem::take(&mut self.text_buffer);
            self.emit_token(Token::Text { data });
        }
    }

    /// Build the token for the text between `<` and `>`.
    ///
    /// Returns `None` for tags that carry nothing, such as `<>` or `</>`.
    pub(super) fn tag_token(text: &str) -> Option<Token> {
        if let Some(data) = text.strip_prefix('!') {
            return Some(Token::Comment {
                data: data.to_string(),
            });
        }

        if let Some(rest) = text.strip_prefix('/') {
            let name = rest.split_whitespace().next()?.trim_end_matches('/');
            if name.is_empty() {
                return None;
            }
            return Some(Token::EndTag {
                name: name.to_ascii_lowercase(),
            });
        }

        let (text, self_closing) = strip_self_closing_slash(text);
        let mut tokens = split_tag_text(text).into_iter();
        let name = tokens.next()?.to_ascii_lowercase();
        let attributes = tokens.filter_map(|token| parse_attribute(&token)).collect();
        Some(Token::StartTag {
            name,
            self_closing,
            attributes,
        })
    }
}

// =============================================================================
// Tag Text Helpers
// =============================================================================

/// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
///
/// A trailing `/` marks the tag self-closing when it stands on its own
/// (`<br />`) or directly follows a bare tag name (`<br/>`). In `<a href=/x/>`
/// the slash belongs to the attribute value.
fn strip_self_closing_slash(text: &str) -> (&str, bool) {
    let trimmed = text.trim_end();
    let Some(before) = trimmed.strip_suffix('/') else {
        return (text, false);
    };
    let stands_alone = before.ends_with(|c: char| c.is_ascii_whitespace());
    let bare_name = !before.contains(|c: char| c.is_ascii_whitespace());
    if stands_alone || bare_name {
        (before, true)
    } else {
        (text, false)
    }
}

/// Split tag text on whitespace, keeping quoted attribute values together.
///
/// A quote only opens a quoted run directly after `=`, so `class='a b'` stays
/// one token while a stray quote inside a name does not swallow the rest of
/// the tag.
#[must_use]
pub fn split_tag_text(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut previous: Option<char> = None;

    for c in text.chars() {
        match quote {
            Some(open) => {
                current.push(c);
                if c == open {
                    quote = None;
                }
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => {
                if (c == '"' || c == '\'') && previous == Some('=') {
                    quote = Some(c);
                }
                current.push(c);
            }
        }
        previous = Some(c);
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Parse one `key=value` or bare `key` token.
///
/// The key is lowercased. A value wrapped in matching quotes has them
/// stripped, and character references in the value are decoded. A bare key
/// maps to the empty string. Tokens with an empty key (`=x`) are dropped.
#[must_use]
pub fn parse_attribute(token: &str) -> Option<Attribute> {
    let (key, value) = token.split_once('=').unwrap_or((token, ""));
    if key.is_empty() {
        return None;
    }
    let value = strip_matching_quotes(value);
    Some(Attribute::new(
        key.to_ascii_lowercase(),
        decode_entities(value),
    ))
}

/// Remove one pair of matching `'` or `"` quotes around `value`.
fn strip_matching_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first @ ('"' | '\'')), Some(last)) if first == last => &value[1..value.len() - 1],
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_quoted_values() {
        assert_eq!(
            split_tag_text("div class='a b'  id=x"),
            vec!["div", "class='a b'", "id=x"]
        );
        assert_eq!(
            split_tag_text("a title=\"x > y\" href=/"),
            vec!["a", "title=\"x > y\"", "href=/"]
        );
    }

    #[test]
    fn test_quote_only_opens_after_equals() {
        assert_eq!(split_tag_text("p it's fine"), vec!["p", "it's", "fine"]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(split_tag_text("p title='a b"), vec!["p", "title='a b"]);
        let attr = parse_attribute("title='a b").unwrap();
        assert_eq!(attr.value, "'a b");
    }

    #[test]
    fn test_parse_attribute_forms() {
        assert_eq!(
            parse_attribute("CLASS=\"a b\""),
            Some(Attribute::new("class".to_string(), "a b".to_string()))
        );
        assert_eq!(
            parse_attribute("disabled"),
            Some(Attribute::new("disabled".to_string(), String::new()))
        );
        assert_eq!(
            parse_attribute("alt=''"),
            Some(Attribute::new("alt".to_string(), String::new()))
        );
        assert_eq!(
            parse_attribute("href=a=b"),
            Some(Attribute::new("href".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_attribute("=oops"), None);
    }

    #[test]
    fn test_attribute_value_entities_decoded() {
        let attr = parse_attribute("title='Tom &amp; Jerry'").unwrap();
        assert_eq!(attr.value, "Tom & Jerry");
    }

    #[test]
    fn test_self_closing_slash() {
        assert_eq!(strip_self_closing_slash("br/"), ("br", true));
        assert_eq!(strip_self_closing_slash("img src=a.png /"), ("img src=a.png ", true));
        assert_eq!(strip_self_closing_slash("a href=/x/"), ("a href=/x/", false));
        assert_eq!(strip_self_closing_slash("p"), ("p", false));
    }
}
