//! CSS Layout Engine
//!
//! This module implements a reduced CSS Visual Formatting Model: blocks stack
//! vertically, inline content is broken into lines of words.
//!
//! # Relevant Specifications
//!
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html)
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//!
//! # Module Structure
//!
//! - [`box_model`] - Rectangles
//! - [`font`] - Font descriptors, metrics and the per-pass font cache
//! - [`layout_box`] - Layout box types and the box tree arena
//! - [`inline`] - Line breaking, hyphenation and baseline alignment
//!
//! Every pass builds a new [`LayoutTree`]. A box's position depends on its
//! parent and on the box before it, and its height on its children, so each
//! box is placed before its children are created and measured after they are
//! all laid out.

pub mod box_model;
pub mod font;
pub mod inline;
pub mod layout_box;

pub use box_model::Rect;
pub use font::{
    ApproximateFontMetrics, CachedFont, Font, FontCache, FontMetrics, FontSlant, FontWeight,
    LineMetrics, PX_TO_PT,
};
pub use inline::{SOFT_HYPHEN, split_at_soft_hyphen};
pub use layout_box::{BoxId, BoxKind, LayoutBox, LayoutTree};

use std::collections::HashMap;

use sprig_dom::{DomTree, NodeId};

use crate::style::ComputedStyle;

/// Horizontal page margin.
pub const HSTEP: f32 = 13.0;
/// Vertical page margin.
pub const VSTEP: f32 = 18.0;
/// Gap after a paragraph: half the vertical margin.
pub const PSTEP: f32 = VSTEP * 0.5;

/// [HTML Living Standard § 4 The elements of HTML](https://html.spec.whatwg.org/multipage/#toc-semantics)
///
/// Elements that force their parent into block layout.
pub const BLOCK_ELEMENTS: [&str; 37] = [
    "html", "body", "article", "section", "nav", "aside", "h1", "h2", "h3", "h4", "h5", "h6",
    "hgroup", "header", "footer", "address", "p", "hr", "pre", "blockquote", "ol", "ul", "menu",
    "li", "dl", "dt", "dd", "figure", "figcaption", "main", "div", "table", "form", "fieldset",
    "legend", "details", "summary",
];

/// How a node's content is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Children stack vertically, one box each.
    Block,
    /// Content flows into lines.
    Inline,
}

/// Decide the layout mode of `node`.
///
/// Text is inline. An element is block if any element child is in
/// [`BLOCK_ELEMENTS`], and inline otherwise. An element without children is
/// block, so empty and void elements stack.
#[must_use]
pub fn layout_mode(dom: &DomTree, node: NodeId) -> LayoutMode {
    if dom.as_text(node).is_some() {
        return LayoutMode::Inline;
    }
    let children = dom.children(node);
    if children.is_empty() {
        return LayoutMode::Block;
    }
    let has_block_child = children
        .iter()
        .filter_map(|&child| dom.tag_name(child))
        .any(|tag| BLOCK_ELEMENTS.contains(&tag));
    if has_block_child {
        LayoutMode::Block
    } else {
        LayoutMode::Inline
    }
}

/// Lay out a styled document for a viewport `viewport_width` pixels wide.
///
/// The `body` element becomes the root block box, inset by [`HSTEP`] and
/// [`VSTEP`]. The document box is as tall as that block plus both vertical
/// margins.
#[must_use]
pub fn layout_document(
    dom: &DomTree,
    styles: &HashMap<NodeId, ComputedStyle>,
    metrics: &dyn FontMetrics,
    viewport_width: f32,
) -> LayoutTree {
    let root_node = dom.body().unwrap_or_else(|| dom.root());
    let mut cx = LayoutContext {
        dom,
        styles,
        fallback_style: ComputedStyle::initial(),
        fonts: FontCache::new(metrics),
        tree: LayoutTree::new(root_node),
    };

    let document = cx.tree.root();
    *cx.tree.rect_mut(document) = Rect {
        x: HSTEP,
        y: VSTEP,
        width: (viewport_width - 2.0 * HSTEP).max(0.0),
        height: 0.0,
    };
    let child = cx.tree.push(BoxKind::Block, root_node, document, None);
    cx.layout_block(child);
    cx.tree.rect_mut(document).height = cx.tree.rect(child).height + 2.0 * VSTEP;

    #[cfg(feature = "layout-trace")]
    eprintln!("[LAYOUT] {} boxes\n{}", cx.tree.len(), cx.tree.dump(dom));

    cx.tree
}

/// State for one layout pass. Dropped when the pass returns its tree.
pub(crate) struct LayoutContext<'a> {
    pub(crate) dom: &'a DomTree,
    styles: &'a HashMap<NodeId, ComputedStyle>,
    fallback_style: ComputedStyle,
    pub(crate) fonts: FontCache<'a>,
    pub(crate) tree: LayoutTree,
}

impl LayoutContext<'_> {
    /// Computed style of `node`, or initial values if it has none.
    pub(crate) fn style(&self, node: NodeId) -> &ComputedStyle {
        self.styles.get(&node).unwrap_or(&self.fallback_style)
    }

    /// Position a block, inline or line box: full width of its parent,
    /// directly below the previous sibling (and its gap), or at the parent's
    /// top if it is the first child.
    pub(crate) fn place(&mut self, id: BoxId) {
        let Some(layout_box) = self.tree.get(id) else {
            return;
        };
        let parent = layout_box
            .parent
            .map(|parent| self.tree.rect(parent))
            .unwrap_or_default();
        let y = match layout_box.previous.and_then(|previous| self.tree.get(previous)) {
            Some(previous) => previous.rect.bottom() + previous.gap(),
            None => parent.y,
        };
        let rect = self.tree.rect_mut(id);
        rect.x = parent.x;
        rect.width = parent.width;
        rect.y = y;
    }

    /// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// "In a block formatting context, boxes are laid out one after the
    /// other, vertically, beginning at the top of a containing block."
    pub(crate) fn layout_block(&mut self, id: BoxId) {
        self.place(id);
        let Some(node) = self.tree.get(id).map(|layout_box| layout_box.node) else {
            return;
        };

        // STEP 1: One child box per child node, chained to its predecessor.
        let dom = self.dom;
        let mut previous = None;
        for &child in dom.children(node) {
            let kind = match layout_mode(dom, child) {
                LayoutMode::Block => BoxKind::Block,
                LayoutMode::Inline => BoxKind::Inline,
            };
            previous = Some(self.tree.push(kind, child, id, previous));
        }

        // STEP 2: Lay out children in order; each one's position depends on
        // the finished height of the one before.
        let children = self.tree.children(id).to_vec();
        for &child in &children {
            let is_block = self
                .tree
                .get(child)
                .is_some_and(|layout_box| layout_box.kind == BoxKind::Block);
            if is_block {
                self.layout_block(child);
            } else {
                self.layout_inline(child);
            }
        }

        // STEP 3: Only now is the block's own height known.
        let height: f32 = children
            .iter()
            .map(|&child| self.tree.rect(child).height)
            .sum();
        self.tree.rect_mut(id).height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_dom::{AttributesMap, ElementData, NodeType};

    fn element(dom: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
        let id = dom.alloc(
            NodeType::Element(ElementData::new(tag, AttributesMap::new())),
            Some(parent),
        );
        dom.append_child(parent, id);
        id
    }

    fn text(dom: &mut DomTree, parent: NodeId, data: &str) -> NodeId {
        let id = dom.alloc(NodeType::Text(data.to_string()), Some(parent));
        dom.append_child(parent, id);
        id
    }

    #[test]
    fn test_layout_mode_rules() {
        let mut dom = DomTree::new();
        let body = element(&mut dom, NodeId::ROOT, "body");
        let div = element(&mut dom, body, "div");
        let p = element(&mut dom, div, "p");
        let words = text(&mut dom, p, "hi");
        let span = element(&mut dom, p, "span");
        let hr = element(&mut dom, body, "hr");

        assert_eq!(layout_mode(&dom, words), LayoutMode::Inline);
        assert_eq!(layout_mode(&dom, div), LayoutMode::Block);
        // Only text and inline children.
        assert_eq!(layout_mode(&dom, p), LayoutMode::Inline);
        // Childless elements stack.
        assert_eq!(layout_mode(&dom, span), LayoutMode::Block);
        assert_eq!(layout_mode(&dom, hr), LayoutMode::Block);
    }

    #[test]
    fn test_empty_body() {
        let mut dom = DomTree::new();
        let _ = element(&mut dom, NodeId::ROOT, "head");
        let _ = element(&mut dom, NodeId::ROOT, "body");
        let tree = layout_document(&dom, &HashMap::new(), &ApproximateFontMetrics, 800.0);
        let document = tree.get(tree.root()).unwrap();
        assert_eq!(
            document.rect,
            Rect {
                x: HSTEP,
                y: VSTEP,
                width: 800.0 - 2.0 * HSTEP,
                height: 2.0 * VSTEP
            }
        );
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_narrow_viewport_clamps_width() {
        let dom = DomTree::new();
        let tree = layout_document(&dom, &HashMap::new(), &ApproximateFontMetrics, 10.0);
        assert!(tree.get(tree.root()).unwrap().rect.width.abs() < f32::EPSILON);
    }
}
