//! Token types produced by the tokenizer.

use std::fmt;

/// An attribute on a start tag token.
///
/// The name is lowercased; the value has its surrounding quotes stripped and
/// its character references decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Attribute value; empty for bare attributes such as `disabled`.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// The tokenizer emits tokens of these types to the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr=value ...>`
    StartTag {
        /// Lowercased tag name.
        name: String,
        /// Set when the tag text ended in `/`, as in `<br/>`.
        self_closing: bool,
        /// Attributes in source order. Later duplicates win when the element is built.
        attributes: Vec<Attribute>,
    },

    /// `</name>`
    EndTag {
        /// Lowercased tag name.
        name: String,
    },

    /// `<!...>`: doctypes, comments and any other markup declaration.
    ///
    /// The tree builder discards these.
    Comment {
        /// Text between `<!` (or `<!--`) and the closing delimiter.
        data: String,
    },

    /// A run of text between tags, with character references still encoded.
    Text {
        /// Raw text.
        data: String,
    },

    /// End of input.
    EndOfFile,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    if attr.value.is_empty() {
                        write!(f, " {}", attr.name)?;
                    } else {
                        write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                    }
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!{data}>"),
            Self::Text { data } => write!(f, "{data:?}"),
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}
