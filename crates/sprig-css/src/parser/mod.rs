//! CSS parser.
//!
//! A recursive-descent parser over a small grammar:
//!
//! ```text
//! stylesheet  := rule*
//! rule        := selector '{' declarations '}'
//! selector    := word (whitespace word)*
//! declarations:= (word ':' word ';')*
//! word        := (alphanumeric | '#' | '-' | '.' | '%')+
//! ```
//!
//! [§ 2.2 Error Handling](https://www.w3.org/TR/css-syntax-3/#error-handling)
//!
//! "When errors occur in CSS, the parser attempts to recover gracefully,
//! throwing away only the minimum amount of content before returning to
//! parsing as normal."
//!
//! Each step returns a [`Result`]; failures are caught at two levels only. A
//! bad declaration skips to the next `;` (or abandons the block at `}`), and a
//! bad rule skips past the next `}`. Public entry points never fail.

use std::collections::BTreeMap;

use serde::Serialize;
use sprig_common::warning::warn_once;
use thiserror::Error;

use crate::selector::Selector;

/// Property name to raw value, for one declaration block.
///
/// A property declared twice in one block keeps the later value.
pub type Declarations = BTreeMap<String, String>;

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A style rule: a selector and the declarations it applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Which elements the rule applies to.
    pub selector: Selector,
    /// Declarations in the rule's block.
    pub declarations: Declarations,
}

impl Rule {
    /// Cascade priority: the number of tag selectors in the chain.
    #[must_use]
    pub fn priority(&self) -> usize {
        self.selector.priority()
    }
}

/// Why a single parse step failed. Never escapes this module.
#[derive(Debug, Error, PartialEq, Eq)]
enum ParseError {
    #[error("expected a word")]
    ExpectedWord,
    #[error("expected '{0}'")]
    ExpectedLiteral(char),
}

/// Parser state: the input and a cursor into it.
pub struct CSSParser {
    input: Vec<char>,
    pos: usize,
}

impl CSSParser {
    /// Create a parser over `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        let mut i = self.pos;
        for c in s.chars() {
            if self.input.get(i) != Some(&c) {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Skip whitespace and `/* ... */` comments.
    fn whitespace(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.pos += 1;
            }
            if !self.starts_with("/*") {
                return;
            }
            self.pos += 2;
            while self.pos < self.input.len() && !self.starts_with("*/") {
                self.pos += 1;
            }
            // Unterminated comments run to the end of input.
            self.pos = (self.pos + 2).min(self.input.len());
        }
    }

    /// Consume one word: a non-empty run of alphanumerics and `#-.%`.
    fn word(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || "#-.%".contains(c))
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(ParseError::ExpectedWord);
        }
        Ok(self.input[start..self.pos].iter().collect())
    }

    /// Consume exactly `expected`.
    fn literal(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() != Some(expected) {
            return Err(ParseError::ExpectedLiteral(expected));
        }
        self.pos += 1;
        Ok(())
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    ///
    /// `property: value`, property lowercased.
    fn pair(&mut self) -> Result<(String, String), ParseError> {
        let property = self.word()?;
        self.whitespace();
        self.literal(':')?;
        self.whitespace();
        let value = self.word()?;
        Ok((property.to_lowercase(), value))
    }

    /// Advance to the next character in `stops` without consuming it.
    ///
    /// Returns the character found, or `None` at end of input.
    fn ignore_until(&mut self, stops: &[char]) -> Option<char> {
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                return Some(c);
            }
            self.pos += 1;
        }
        None
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// Parse declarations up to (not including) a closing `}` or end of input.
    /// A malformed declaration is dropped: parsing resumes after the next `;`,
    /// or the rest of the block is abandoned if `}` comes first.
    pub fn body(&mut self) -> Declarations {
        let mut declarations = Declarations::new();
        while self.peek().is_some_and(|c| c != '}') {
            match self.declaration() {
                Ok((property, value)) => {
                    let _ = declarations.insert(property, value);
                }
                Err(err) => {
                    warn_once("CSS", &format!("dropped malformed declaration: {err}"));
                    if self.ignore_until(&[';', '}']) == Some(';') {
                        self.pos += 1;
                        self.whitespace();
                    } else {
                        break;
                    }
                }
            }
        }
        declarations
    }

    /// One `property: value;` with surrounding whitespace.
    fn declaration(&mut self) -> Result<(String, String), ParseError> {
        let pair = self.pair()?;
        self.whitespace();
        self.literal(';')?;
        self.whitespace();
        Ok(pair)
    }

    /// [§ 3 Selectors Overview](https://www.w3.org/TR/selectors-4/#overview)
    ///
    /// One or more whitespace-separated tag names up to `{`. Each extra name
    /// nests the chain one level deeper: `div p a` means an `a` inside a `p`
    /// inside a `div`.
    fn selector(&mut self) -> Result<Selector, ParseError> {
        let mut selector = Selector::Tag(self.word()?.to_lowercase());
        self.whitespace();
        while self.peek().is_some_and(|c| c != '{') {
            let tag = self.word()?.to_lowercase();
            selector = Selector::Descendant {
                ancestor: Box::new(selector),
                tag,
            };
            self.whitespace();
        }
        Ok(selector)
    }

    /// One complete `selector { declarations }`.
    fn rule(&mut self) -> Result<Rule, ParseError> {
        self.whitespace();
        let selector = self.selector()?;
        self.literal('{')?;
        self.whitespace();
        let declarations = self.body();
        self.literal('}')?;
        Ok(Rule {
            selector,
            declarations,
        })
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// Parse every rule in the input, in source order. A malformed rule is
    /// dropped by skipping past the next `}`; without one, parsing stops.
    pub fn parse(&mut self) -> Vec<Rule> {
        let mut rules = Vec::new();
        loop {
            self.whitespace();
            if self.peek().is_none() {
                break;
            }
            match self.rule() {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    warn_once("CSS", &format!("dropped malformed rule: {err}"));
                    if self.ignore_until(&['}']).is_none() {
                        break;
                    }
                    self.pos += 1;
                }
            }
        }
        rules
    }
}

/// Parse a complete stylesheet into rules, in source order.
#[must_use]
pub fn parse_stylesheet(css: &str) -> Vec<Rule> {
    CSSParser::new(css).parse()
}

/// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
///
/// Parse a bare declaration list, such as an inline `style` attribute.
#[must_use]
pub fn parse_declarations(style: &str) -> Declarations {
    let mut parser = CSSParser::new(style);
    parser.whitespace();
    parser.body()
}
