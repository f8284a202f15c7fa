//! CSS Inline Layout and Line Box Model.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! Words of different sizes on one line share a baseline placed 1.25 × the
//! tallest ascent below the line's top. The line is 1.25 × (tallest ascent +
//! deepest descent) high.

use sprig_dom::NodeId;
use sprig_html::RAW_TEXT_ELEMENTS;

use super::LayoutContext;
use super::PSTEP;
use super::font::Font;
use super::layout_box::{BoxId, BoxKind};

/// U+00AD SOFT HYPHEN: an invisible break opportunity inside a word.
pub const SOFT_HYPHEN: char = '\u{ad}';

/// Line leading factor applied to ascent and descent.
const LEADING: f32 = 1.25;

/// [§ 5.1 Line breaking](https://www.w3.org/TR/css-text-3/#line-breaking)
///
/// Split `word` at a soft hyphen so the first part, with a visible `-`
/// appended, is as long as possible without being `too_long`.
///
/// Returns the prefix (no hyphen appended) and the remainder, which keeps its
/// own soft hyphens for the next attempt. Returns `None` if the word has no
/// soft hyphen, if no prefix fits, or if the split would leave nothing.
pub fn split_at_soft_hyphen(
    word: &str,
    too_long: impl Fn(&str) -> bool,
) -> Option<(String, String)> {
    let mut prefix = String::new();
    let mut rest: Vec<&str> = Vec::new();
    for piece in word.split(SOFT_HYPHEN) {
        if rest.is_empty() && !too_long(&format!("{prefix}{piece}-")) {
            prefix.push_str(piece);
        } else {
            rest.push(piece);
        }
    }
    let rest = rest.join("\u{ad}");
    if prefix.is_empty() || rest.replace(SOFT_HYPHEN, "").is_empty() {
        return None;
    }
    Some((prefix, rest))
}

/// Where the next word goes while one inline box is being filled.
struct InlineCursor {
    /// The inline box being filled.
    inline: BoxId,
    /// Its document node; also the node of every line box.
    node: NodeId,
    /// Left edge of every line.
    left: f32,
    /// Right edge of every line. A word that would end past it wraps.
    right: f32,
    /// Horizontal position for the next word.
    x: f32,
    /// The line currently being filled.
    line: BoxId,
    /// Last word on the current line.
    previous_word: Option<BoxId>,
}

impl LayoutContext<'_> {
    /// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// Fill an inline box with line boxes for its node's subtree, then
    /// position the lines.
    pub(crate) fn layout_inline(&mut self, id: BoxId) {
        self.place(id);
        let Some(node) = self.tree.get(id).map(|layout_box| layout_box.node) else {
            return;
        };
        let rect = self.tree.rect(id);

        // STEP 1: Break the content into lines of words.
        let line = self.tree.push(BoxKind::Line { gap: 0.0 }, node, id, None);
        let mut cursor = InlineCursor {
            inline: id,
            node,
            left: rect.x,
            right: rect.right(),
            x: rect.x,
            line,
            previous_word: None,
        };
        self.recurse(node, &mut cursor);

        // STEP 2: Position the lines top to bottom.
        let lines = self.tree.children(id).to_vec();
        for &line in &lines {
            self.layout_line(line);
        }

        // STEP 3: The box is as tall as its lines and their gaps.
        let height: f32 = lines
            .iter()
            .filter_map(|&line| self.tree.get(line))
            .map(|line| line.rect.height + line.gap())
            .sum();
        self.tree.rect_mut(id).height = height;
    }

    /// Walk `node`'s subtree in document order, adding words to lines.
    fn recurse(&mut self, node: NodeId, cursor: &mut InlineCursor) {
        let dom = self.dom;
        if let Some(text) = dom.as_text(node) {
            let hidden = dom
                .parent(node)
                .and_then(|parent| dom.tag_name(parent))
                .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
            if !hidden {
                self.text(node, text, cursor);
            }
            return;
        }

        let tag = dom.tag_name(node);
        // [§ 4.5.27 The br element](https://html.spec.whatwg.org/multipage/text-level-semantics.html#the-br-element)
        // "The br element represents a line break."
        if tag == Some("br") {
            self.new_line(cursor);
        }
        for &child in dom.children(node) {
            self.recurse(child, cursor);
        }
        if tag == Some("p") {
            if let BoxKind::Line { gap } = self.tree.kind_mut(cursor.line) {
                *gap = PSTEP;
            }
            self.new_line(cursor);
        }
    }

    /// Add every whitespace-separated word of a text node.
    fn text(&mut self, node: NodeId, text: &str, cursor: &mut InlineCursor) {
        let style = self.style(node);
        let font = Font::from_style(style);
        let color = style.color().to_string();
        let space = self.fonts.get(font).space_width;
        for word in text.split_whitespace() {
            self.word(word, node, font, &color, space, cursor);
        }
    }

    /// [§ 5 Line Breaking and Word Boundaries](https://www.w3.org/TR/css-text-3/#line-breaking)
    ///
    /// Place one word, wrapping or hyphenating it when it would overflow.
    ///
    /// When no soft-hyphen prefix fits, the whole word starts a new line
    /// (and overflows it if it is still too wide). Only the remainder of a
    /// word that was already split is hyphenated again.
    fn word(
        &mut self,
        word: &str,
        node: NodeId,
        font: Font,
        color: &str,
        space: f32,
        cursor: &mut InlineCursor,
    ) {
        let mut word = word.to_string();
        loop {
            let visible = word.replace(SOFT_HYPHEN, "");
            if visible.is_empty() {
                return;
            }
            let width = self.fonts.measure(&visible, &font);
            let line_is_empty = cursor.previous_word.is_none();
            if cursor.x + width <= cursor.right {
                self.add_word(visible, node, font, color, cursor);
                cursor.x += width + space;
                return;
            }

            let fonts = &self.fonts;
            let x = cursor.x;
            let right = cursor.right;
            let split = split_at_soft_hyphen(&word, |text| x + fonts.measure(text, &font) > right);
            if let Some((prefix, rest)) = split {
                self.add_word(format!("{prefix}-"), node, font, color, cursor);
                self.new_line(cursor);
                word = rest;
                continue;
            }

            // No break point fits: the whole word moves to a line of its own.
            if !line_is_empty {
                self.new_line(cursor);
            }
            self.add_word(visible, node, font, color, cursor);
            cursor.x = cursor.left + width + space;
            return;
        }
    }

    fn add_word(
        &mut self,
        text: String,
        node: NodeId,
        font: Font,
        color: &str,
        cursor: &mut InlineCursor,
    ) {
        let kind = BoxKind::Word {
            text,
            font,
            color: color.to_string(),
        };
        let id = self
            .tree
            .push(kind, node, cursor.line, cursor.previous_word);
        cursor.previous_word = Some(id);
    }

    /// End the current line and start an empty one below it.
    fn new_line(&mut self, cursor: &mut InlineCursor) {
        cursor.x = cursor.left;
        cursor.previous_word = None;
        cursor.line = self.tree.push(
            BoxKind::Line { gap: 0.0 },
            cursor.node,
            cursor.inline,
            Some(cursor.line),
        );
    }

    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// Position a line and its words. An empty line has zero height.
    fn layout_line(&mut self, id: BoxId) {
        self.place(id);
        let words = self.tree.children(id).to_vec();
        if words.is_empty() {
            self.tree.rect_mut(id).height = 0.0;
            return;
        }

        let mut max_ascent: f32 = 0.0;
        let mut max_descent: f32 = 0.0;
        for &word in &words {
            let Some(font) = self.layout_word(word) else {
                continue;
            };
            let metrics = self.fonts.get(font);
            max_ascent = max_ascent.max(metrics.ascent);
            max_descent = max_descent.max(metrics.descent);
        }

        // "CSS assumes that every font has font metrics that specify a
        // characteristic height above the baseline and a depth below it."
        let baseline = self.tree.rect(id).y + LEADING * max_ascent;
        for &word in &words {
            let Some(font) = self.word_font(word) else {
                continue;
            };
            let ascent = self.fonts.get(font).ascent;
            self.tree.rect_mut(word).y = baseline - ascent;
        }
        self.tree.rect_mut(id).height = LEADING * (max_ascent + max_descent);
    }

    /// Size a word and place it after the previous word on its line.
    /// Returns the word's font.
    fn layout_word(&mut self, id: BoxId) -> Option<Font> {
        let layout_box = self.tree.get(id)?;
        let BoxKind::Word { text, font, .. } = &layout_box.kind else {
            return None;
        };
        let font = *font;
        let width = self.fonts.measure(text, &font);
        let x = match layout_box.previous {
            Some(previous) => {
                let previous_font = self.word_font(previous)?;
                let space = self.fonts.get(previous_font).space_width;
                let previous = self.tree.rect(previous);
                previous.right() + space
            }
            None => layout_box
                .parent
                .map(|line| self.tree.rect(line).x)
                .unwrap_or_default(),
        };
        let metrics = self.fonts.get(font);
        let rect = self.tree.rect_mut(id);
        rect.x = x;
        rect.width = width;
        rect.height = metrics.ascent + metrics.descent;
        Some(font)
    }

    fn word_font(&self, id: BoxId) -> Option<Font> {
        match self.tree.get(id)?.kind {
            BoxKind::Word { font, .. } => Some(font),
            _ => None,
        }
    }
}
