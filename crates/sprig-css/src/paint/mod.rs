//! CSS Painting
//!
//! [CSS 2.1 Appendix E - Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! This module implements the painting phase, which converts a layout tree into
//! a display list of drawing commands. The display list can then be executed by
//! any renderer.
//!
//! # Architecture
//!
//! ```text
//! Style → Layout → Paint → Render
//!                    ↓
//!              DisplayList
//! ```
//!
//! Every coordinate in the list is in absolute document space. Scrolling and
//! culling against a viewport are the renderer's job.

mod display_list;
mod painter;

pub use display_list::{DisplayCommand, DisplayList};
pub use painter::{LayoutOutlines, Painter};
