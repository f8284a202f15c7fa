//! HTML tokenizer module.
//!
//! A deliberately small cut of [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
//! the input is split into tag and text events, markup declarations are passed
//! through as comments, and `script`/`style` contents are read as raw text.

/// Character reference decoding and escaping.
pub mod character_reference;
/// Tag-text splitting and attribute helpers.
pub mod helpers;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Token types produced by the tokenizer.
pub mod token;
/// HTML tokenizer state machine implementation.
pub mod core;

pub use self::core::{HTMLTokenizer, RAW_TEXT_ELEMENTS, TokenizerState};
pub use character_reference::{decode_entities, escape_html};
pub use token::{Attribute, Token};
