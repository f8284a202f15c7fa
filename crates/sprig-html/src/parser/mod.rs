//! HTML parser module for tree construction.

/// Tree builder: implicit structure, void elements, lenient end tags.
pub mod core;

pub use self::core::{HEAD_TAGS, HTMLParser, ParseIssue, VOID_ELEMENTS, format_tree, print_tree};
