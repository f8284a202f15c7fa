//! CSS parser, cascade, layout engine and painter for the sprig renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Tag and descendant selectors with `{ property: value; ... }` bodies
//!   - Error recovery that drops only the malformed declaration or rule
//!   - `/* comments */` treated as whitespace
//!
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Tag-count priority with a stable sort, so later rules win ties
//!   - Inline `style` attributes applied after every rule
//!   - Inheritance of `font-size`, `font-style`, `font-weight` and `color`
//!   - Percentage `font-size` resolved against the parent
//!
//! - **Layout Engine** ([CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html))
//!   - Block stacking, line breaking, soft-hyphen hyphenation
//!   - Baseline alignment of mixed font sizes
//!
//! - **Painting** ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Text and background rectangles, plus optional layout outlines
//!
//! # Not Implemented
//!
//! - Class, ID, attribute and pseudo selectors
//! - Cascade origins, `!important`, shorthand properties
//! - Length units other than `px` and `%`
//! - Margins, padding, borders, floats and positioning

/// CSS cascade per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Block and inline layout per [CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Display list and painting per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Selector matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Computed style representation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod style;
/// The default (user agent) stylesheet.
pub mod ua_stylesheet;

use sprig_dom::{DomTree, ElementData, NodeId};

pub use cascade::{compute_styles, sort_rules};
pub use layout::{
    ApproximateFontMetrics, BoxId, BoxKind, Font, FontMetrics, LayoutBox, LayoutTree, Rect,
    layout_document,
};
pub use paint::{DisplayCommand, DisplayList, LayoutOutlines, Painter};
pub use parser::{CSSParser, Declarations, Rule, parse_declarations, parse_stylesheet};
pub use selector::Selector;
pub use style::ComputedStyle;
pub use ua_stylesheet::ua_stylesheet;

/// [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
///
/// The `href` of every stylesheet link in the document, in document order.
///
/// "If the rel attribute's value contains the token stylesheet, then the
/// link is a stylesheet link." Links with a missing or blank `href` are
/// skipped.
#[must_use]
pub fn linked_stylesheets(tree: &DomTree) -> Vec<String> {
    document_order(tree)
        .filter_map(|id| tree.as_element(id))
        .filter(|data| data.tag_name == "link" && is_stylesheet_link(data))
        .filter_map(|data| data.attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

/// [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// Text of every `<style>` element, concatenated in document order.
#[must_use]
pub fn style_element_text(tree: &DomTree) -> String {
    document_order(tree)
        .filter(|&id| tree.tag_name(id) == Some("style"))
        .map(|id| tree.text_content(id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every node, depth first from the root.
fn document_order(tree: &DomTree) -> impl Iterator<Item = NodeId> + '_ {
    tree.descendants(tree.root())
}

/// [§ 2.4.7 Space-separated tokens](https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#space-separated-tokens)
///
/// Token comparison is ASCII case-insensitive.
fn is_stylesheet_link(data: &ElementData) -> bool {
    data.attr("rel").is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
}
