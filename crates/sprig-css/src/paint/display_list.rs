//! Display List - a sequence of drawing commands
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! The display list is the output of the painting phase. It contains all the
//! drawing commands needed to render a page, back to front.

use serde::Serialize;

use crate::layout::Font;

/// A single drawing command.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Commands are added to the display list in painting order (back to front).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DisplayCommand {
    /// Draw text with its top-left corner at a position.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 7: "the element's text"
    DrawText {
        /// X coordinate of the text's left edge.
        x: f32,
        /// Y coordinate of the text's top edge.
        y: f32,
        /// The text content to draw.
        text: String,
        /// Font to draw with.
        font: Font,
        /// Text color, as declared.
        color: String,
    },

    /// Draw a rectangle between two corners.
    ///
    /// Used for backgrounds (fill, no border) and layout outlines (border,
    /// no fill).
    DrawRect {
        /// Left edge.
        x1: f32,
        /// Top edge.
        y1: f32,
        /// Right edge.
        x2: f32,
        /// Bottom edge.
        y2: f32,
        /// Fill color, if filled.
        fill: Option<String>,
        /// Border color, if outlined.
        border_color: Option<String>,
    },
}

/// A list of drawing commands in painting order.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// The display list contains all commands needed to render a page. Commands
/// are stored in back-to-front order, so the renderer can simply iterate
/// and execute each command.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Get the commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text commands only, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DisplayCommand::DrawText { text, .. } => Some(text.as_str()),
            DisplayCommand::DrawRect { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FontSlant, FontWeight};

    #[test]
    fn test_json_shape() {
        let mut list = DisplayList::new();
        list.push(DisplayCommand::DrawText {
            x: 13.0,
            y: 18.0,
            text: "Hi".to_string(),
            font: Font {
                size: 12,
                weight: FontWeight::Bold,
                slant: FontSlant::Roman,
            },
            color: "black".to_string(),
        });
        list.push(DisplayCommand::DrawRect {
            x1: 0.0,
            y1: 1.0,
            x2: 2.0,
            y2: 3.0,
            fill: Some("gray".to_string()),
            border_color: None,
        });
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json[0]["kind"], "draw-text");
        assert_eq!(json[0]["font"]["weight"], "bold");
        assert_eq!(json[1]["kind"], "draw-rect");
        assert_eq!(json[1]["border_color"], serde_json::Value::Null);
        assert_eq!(list.texts().collect::<Vec<_>>(), ["Hi"]);
    }
}
