//! Layout box types and the box tree arena.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! Boxes live in a [`LayoutTree`] and refer to each other by [`BoxId`], the
//! same way the document tree uses `NodeId`. Parent and previous-sibling
//! links are plain indices and never imply ownership.

use std::fmt::Write;

use serde::{Serialize, Serializer};
use sprig_dom::{DomTree, NodeId};

use super::box_model::Rect;
use super::font::Font;

/// Index of a box in its [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BoxId(pub usize);

impl BoxId {
    /// The document box is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// What kind of box this is, with any kind-specific data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BoxKind {
    /// The initial containing block. Has exactly one block child.
    Document,
    /// [§ 9.2.1 Block-level elements and block boxes](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    ///
    /// Children stack vertically.
    Block,
    /// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// A run of inline content. Children are line boxes.
    Inline,
    /// "The rectangular area that contains the boxes that form a line is
    /// called a line box."
    Line {
        /// Extra space after this line before the next one starts.
        gap: f32,
    },
    /// One word of text, positioned on a line.
    Word {
        /// Text to draw. Contains no soft hyphens.
        text: String,
        /// Font the text is measured and drawn in.
        font: Font,
        /// The `color` of the text node.
        color: String,
    },
}

/// One box in the tree.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutBox {
    /// Kind and kind-specific data.
    #[serde(flatten)]
    pub kind: BoxKind,
    /// Document node this box was generated for.
    #[serde(serialize_with = "serialize_node_id")]
    pub node: NodeId,
    /// Containing box. `None` only for the document box.
    #[serde(skip)]
    pub parent: Option<BoxId>,
    /// The sibling laid out immediately before this box.
    #[serde(skip)]
    pub previous: Option<BoxId>,
    /// Child boxes in layout order.
    pub children: Vec<BoxId>,
    /// Absolute geometry. Zero until the box has been laid out.
    pub rect: Rect,
}

impl LayoutBox {
    /// Space left below this box before the next sibling: the paragraph gap
    /// of a line box, zero for everything else.
    #[must_use]
    pub fn gap(&self) -> f32 {
        match self.kind {
            BoxKind::Line { gap } => gap,
            _ => 0.0,
        }
    }
}

// serde hands `serialize_with` functions the field by reference.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_node_id<S: Serializer>(node: &NodeId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(node.0 as u64)
}

/// The box tree produced by one layout pass.
///
/// Rebuilt from scratch on every pass; nothing in it outlives the pass that
/// made it except as output.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutTree {
    boxes: Vec<LayoutBox>,
}

impl LayoutTree {
    /// Create a tree holding only a document box for `node`.
    #[must_use]
    pub fn new(node: NodeId) -> Self {
        Self {
            boxes: vec![LayoutBox {
                kind: BoxKind::Document,
                node,
                parent: None,
                previous: None,
                children: Vec::new(),
                rect: Rect::default(),
            }],
        }
    }

    /// The document box.
    #[must_use]
    pub const fn root(&self) -> BoxId {
        BoxId::ROOT
    }

    /// Look up a box.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&LayoutBox> {
        self.boxes.get(id.0)
    }

    /// Child boxes of `id`, empty if `id` is unknown.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.get(id).map_or(&[], |layout_box| &layout_box.children)
    }

    /// Number of boxes, the document box included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Always false: the document box exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// All boxes in pre-order, starting at the document box.
    #[must_use]
    pub fn descendants(&self) -> Vec<BoxId> {
        let mut order = Vec::with_capacity(self.boxes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    /// Add a box as the last child of `parent`.
    pub(crate) fn push(
        &mut self,
        kind: BoxKind,
        node: NodeId,
        parent: BoxId,
        previous: Option<BoxId>,
    ) -> BoxId {
        let id = BoxId(self.boxes.len());
        self.boxes.push(LayoutBox {
            kind,
            node,
            parent: Some(parent),
            previous,
            children: Vec::new(),
            rect: Rect::default(),
        });
        self.boxes[parent.0].children.push(id);
        id
    }

    pub(crate) fn rect(&self, id: BoxId) -> Rect {
        self.boxes[id.0].rect
    }

    pub(crate) fn rect_mut(&mut self, id: BoxId) -> &mut Rect {
        &mut self.boxes[id.0].rect
    }

    pub(crate) fn kind_mut(&mut self, id: BoxId) -> &mut BoxKind {
        &mut self.boxes[id.0].kind
    }

    /// Render the tree as indented text, one box per line.
    #[must_use]
    pub fn dump(&self, dom: &DomTree) -> String {
        let mut out = String::new();
        self.dump_box(dom, self.root(), 0, &mut out);
        out
    }

    fn dump_box(&self, dom: &DomTree, id: BoxId, depth: usize, out: &mut String) {
        let Some(layout_box) = self.get(id) else {
            return;
        };
        let label = match &layout_box.kind {
            BoxKind::Document => "document".to_string(),
            BoxKind::Block => format!("block {}", node_label(dom, layout_box.node)),
            BoxKind::Inline => format!("inline {}", node_label(dom, layout_box.node)),
            BoxKind::Line { gap } if *gap > 0.0 => format!("line gap={gap}"),
            BoxKind::Line { .. } => "line".to_string(),
            BoxKind::Word { text, font, color } => format!("word {text:?} {font} {color}"),
        };
        let r = layout_box.rect;
        let _ = writeln!(
            out,
            "{:indent$}{label} ({:.1}, {:.1}) {:.1}x{:.1}",
            "",
            r.x,
            r.y,
            r.width,
            r.height,
            indent = depth * 2
        );
        for &child in &layout_box.children {
            self.dump_box(dom, child, depth + 1, out);
        }
    }
}

/// `<tag>` for elements, `#text` for text.
fn node_label(dom: &DomTree, node: NodeId) -> String {
    dom.tag_name(node)
        .map_or_else(|| "#text".to_string(), |tag| format!("<{tag}>"))
}
