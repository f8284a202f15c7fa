//! CSS computed style representation and value resolution
//!
//! - [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/)
//! - [CSS Fonts Level 4](https://www.w3.org/TR/css-fonts-4/)

pub mod computed;
mod values;

pub use computed::{ComputedStyle, INHERITED_PROPERTIES};
pub use values::{DEFAULT_FONT_SIZE_PX, parse_px, resolve_font_size};
