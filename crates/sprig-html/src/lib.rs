//! HTML tokenizer and tree builder for the sprig renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Tag, text, comment and raw text (`script`/`style`) states
//!   - Quote-aware attribute splitting
//!   - Named and numeric character references, plus escaping for view-source
//!
//! - **HTML Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - A stack of open elements with implicit `html`, `head` and `body`
//!   - Void elements and lenient end tags
//!   - A root that always has exactly `[head, body]`
//!
//! # Not Implemented
//!
//! - Insertion modes beyond the implicit structure rules
//! - Table parsing, foster parenting, the adoption agency algorithm
//! - Foreign content (SVG, MathML)

/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

use sprig_dom::DomTree;

pub use parser::{HTMLParser, ParseIssue, format_tree, print_tree};
pub use tokenizer::{
    Attribute, HTMLTokenizer, RAW_TEXT_ELEMENTS, Token, decode_entities, escape_html,
};

/// Tokenize and parse `html` in one go.
///
/// Never fails: any input, including the empty string, yields an `html` root
/// with `head` and `body` children.
#[must_use]
pub fn parse(html: &str) -> DomTree {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run()
}
