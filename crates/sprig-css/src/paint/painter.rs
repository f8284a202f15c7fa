//! Painter - generates display list from layout tree
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! The painter walks the layout tree and generates drawing commands in the
//! correct painting order (back to front).

use std::collections::HashMap;

use sprig_dom::NodeId;

use crate::layout::{BoxId, BoxKind, LayoutBox, LayoutTree};
use crate::style::ComputedStyle;

use super::{DisplayCommand, DisplayList};

/// Which kinds of box get a debug outline.
///
/// Outlines are drawn after the box's content, as a border-only rectangle
/// around the box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct LayoutOutlines {
    /// The document box, in purple.
    pub document: bool,
    /// Block boxes, in orange.
    pub block: bool,
    /// Inline boxes, in blue.
    pub inline: bool,
    /// Line boxes, in green.
    pub line: bool,
    /// Word boxes, in red.
    pub word: bool,
}

impl LayoutOutlines {
    /// Outline every kind of box.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            document: true,
            block: true,
            inline: true,
            line: true,
            word: true,
        }
    }

    /// Outline color for `kind`, if outlines are on for it.
    const fn color_for(self, kind: &BoxKind) -> Option<&'static str> {
        match kind {
            BoxKind::Document if self.document => Some("purple"),
            BoxKind::Block if self.block => Some("orange"),
            BoxKind::Inline if self.inline => Some("blue"),
            BoxKind::Line { .. } if self.line => Some("green"),
            BoxKind::Word { .. } if self.word => Some("red"),
            _ => None,
        }
    }
}

/// Painter that generates a display list from a layout tree.
///
/// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
pub struct Painter<'a> {
    /// Computed styles for each node, used for background colors.
    styles: &'a HashMap<NodeId, ComputedStyle>,
    outlines: LayoutOutlines,
}

impl<'a> Painter<'a> {
    /// Create a new painter with access to computed styles.
    #[must_use]
    pub const fn new(styles: &'a HashMap<NodeId, ComputedStyle>, outlines: LayoutOutlines) -> Self {
        Self { styles, outlines }
    }

    /// Paint a layout tree and return the display list.
    ///
    /// This is the main entry point for painting. It walks the layout tree
    /// from the document box and generates all drawing commands in order.
    #[must_use]
    pub fn paint(&self, tree: &LayoutTree) -> DisplayList {
        let mut display_list = DisplayList::new();
        self.paint_box(tree, tree.root(), &mut display_list);
        display_list
    }

    /// Paint a single layout box and its descendants.
    ///
    /// 1. Background color (inline boxes only)
    /// 2. Text (word boxes)
    /// 3. Descendants, in tree order
    /// 4. Outline
    fn paint_box(&self, tree: &LayoutTree, id: BoxId, display_list: &mut DisplayList) {
        let Some(layout_box) = tree.get(id) else {
            return;
        };

        match &layout_box.kind {
            // [CSS 2.1 Appendix E.2 Step 2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
            // "the background color of the element"
            BoxKind::Inline => {
                let background = self
                    .styles
                    .get(&layout_box.node)
                    .map_or("transparent", ComputedStyle::background_color);
                if background != "transparent" {
                    display_list.push(rect_command(layout_box, Some(background), None));
                }
            }
            // [CSS 2.1 Appendix E.2 Step 7](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
            // "the element's text"
            BoxKind::Word { text, font, color } => {
                display_list.push(DisplayCommand::DrawText {
                    x: layout_box.rect.x,
                    y: layout_box.rect.y,
                    text: text.clone(),
                    font: *font,
                    color: color.clone(),
                });
            }
            BoxKind::Document | BoxKind::Block | BoxKind::Line { .. } => {}
        }

        for &child in &layout_box.children {
            self.paint_box(tree, child, display_list);
        }

        if let Some(color) = self.outlines.color_for(&layout_box.kind) {
            display_list.push(rect_command(layout_box, None, Some(color)));
        }
    }
}

/// A rectangle command covering `layout_box`.
fn rect_command(layout_box: &LayoutBox, fill: Option<&str>, border_color: Option<&str>) -> DisplayCommand {
    let rect = layout_box.rect;
    DisplayCommand::DrawRect {
        x1: rect.x,
        y1: rect.y,
        x2: rect.right(),
        y2: rect.bottom(),
        fill: fill.map(str::to_string),
        border_color: border_color.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rect;

    #[test]
    fn test_outline_colors() {
        let outlines = LayoutOutlines::all();
        assert_eq!(outlines.color_for(&BoxKind::Document), Some("purple"));
        assert_eq!(outlines.color_for(&BoxKind::Line { gap: 0.0 }), Some("green"));
        assert_eq!(LayoutOutlines::default().color_for(&BoxKind::Block), None);
    }

    #[test]
    fn test_document_outline_drawn_last() {
        let mut tree = LayoutTree::new(NodeId::ROOT);
        *tree.rect_mut(tree.root()) = Rect {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
        };
        let _ = tree.push(BoxKind::Block, NodeId::ROOT, tree.root(), None);
        let styles = HashMap::new();
        let outlines = LayoutOutlines {
            document: true,
            block: true,
            ..LayoutOutlines::default()
        };
        let list = Painter::new(&styles, outlines).paint(&tree);
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.commands()[1],
            DisplayCommand::DrawRect {
                x1: 1.0,
                y1: 2.0,
                x2: 4.0,
                y2: 6.0,
                fill: None,
                border_color: Some("purple".to_string()),
            }
        );
    }
}
