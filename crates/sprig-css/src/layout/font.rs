//! Font descriptors and text measurement.
//!
//! [CSS Fonts Module Level 4](https://www.w3.org/TR/css-fonts-4/)
//!
//! Layout never touches a font file. It asks a [`FontMetrics`] implementation
//! for widths and vertical extents, and remembers the per-font values it
//! needs on every word in a [`FontCache`] that lives for one layout pass.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use strum_macros::Display;

use crate::style::ComputedStyle;

/// CSS pixels to backend points.
pub const PX_TO_PT: f64 = 0.75;

/// [§ 3.2 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    Normal,
    /// Bold weight.
    Bold,
}

/// [§ 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
///
/// `oblique` is drawn as italic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FontSlant {
    /// Upright.
    Roman,
    /// Italic or oblique.
    Italic,
}

/// A resolved font: everything needed to pick and measure a face.
///
/// Also the key of the [`FontCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Font {
    /// Size in backend points, truncated.
    pub size: u32,
    /// Weight.
    pub weight: FontWeight,
    /// Slant.
    pub slant: FontSlant,
}

impl Font {
    /// Resolve the font for a node's computed style.
    #[must_use]
    pub fn from_style(style: &ComputedStyle) -> Self {
        // [§ 3.2](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
        // "bold: Same as 700." Numeric weights of 600 and up use the bold face.
        let weight = match style.font_weight() {
            "bold" | "bolder" => FontWeight::Bold,
            other => match other.parse::<u16>() {
                Ok(numeric) if numeric >= 600 => FontWeight::Bold,
                _ => FontWeight::Normal,
            },
        };
        let slant = match style.font_style() {
            "italic" | "oblique" => FontSlant::Italic,
            _ => FontSlant::Roman,
        };
        Self {
            size: (style.font_size_px() * PX_TO_PT).max(0.0) as u32,
            weight,
            slant,
        }
    }

    /// The size in CSS pixels.
    #[must_use]
    pub fn pixel_size(&self) -> f32 {
        self.size as f32 / PX_TO_PT as f32
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}pt {} {}", self.size, self.weight, self.slant)
    }
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "CSS assumes that every font has font metrics that specify a
/// characteristic height above the baseline and a depth below it."
///
/// Both values are positive distances from the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of the tallest glyph to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the deepest glyph.
    pub descent: f32,
}

/// Font metrics interface for text measurement during layout.
///
/// Implementors provide advance widths and vertical extents for a font.
/// They must be deterministic: the same text and font always give the same
/// numbers.
pub trait FontMetrics {
    /// Measure the total advance width of `text` in `font`.
    fn measure(&self, text: &str, font: &Font) -> f32;

    /// Ascent and descent of `font`.
    fn line_metrics(&self, font: &Font) -> LineMetrics;
}

/// Approximate font metrics using fixed ratios.
///
/// Implementation note: Without access to actual font data, we use fixed
/// ratio approximations. The average advance width of Latin glyphs in a
/// proportional font is approximately 0.6× the font size (typical for
/// Helvetica/Arial body text). Ascent and descent split the em box 80/20.
///
/// This is used as a fallback when no font is available, and in tests.
pub struct ApproximateFontMetrics;

impl FontMetrics for ApproximateFontMetrics {
    fn measure(&self, text: &str, font: &Font) -> f32 {
        const CHAR_WIDTH_RATIO: f32 = 0.6;
        text.chars().count() as f32 * font.pixel_size() * CHAR_WIDTH_RATIO
    }

    fn line_metrics(&self, font: &Font) -> LineMetrics {
        LineMetrics {
            ascent: font.pixel_size() * 0.8,
            descent: font.pixel_size() * 0.2,
        }
    }
}

/// Per-font values layout needs for every word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedFont {
    /// Ascent above the baseline.
    pub ascent: f32,
    /// Descent below the baseline.
    pub descent: f32,
    /// Advance width of a single space.
    pub space_width: f32,
}

/// Font lookups for one layout pass.
///
/// Entries are created on first use and never evicted; the cache is dropped
/// with the pass, so nothing is shared between threads or passes.
pub struct FontCache<'m> {
    metrics: &'m dyn FontMetrics,
    fonts: HashMap<Font, CachedFont>,
}

impl<'m> FontCache<'m> {
    /// Create an empty cache over `metrics`.
    #[must_use]
    pub fn new(metrics: &'m dyn FontMetrics) -> Self {
        Self {
            metrics,
            fonts: HashMap::new(),
        }
    }

    /// Look up `font`, measuring it on a miss.
    pub fn get(&mut self, font: Font) -> CachedFont {
        let metrics = self.metrics;
        *self.fonts.entry(font).or_insert_with(|| {
            let line = metrics.line_metrics(&font);
            CachedFont {
                ascent: line.ascent,
                descent: line.descent,
                space_width: metrics.measure(" ", &font),
            }
        })
    }

    /// Measure `text` in `font`.
    #[must_use]
    pub fn measure(&self, text: &str, font: &Font) -> f32 {
        self.metrics.measure(text, font)
    }

    /// Number of distinct fonts seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// True before the first lookup.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(pairs: &[(&str, &str)]) -> ComputedStyle {
        let mut style = ComputedStyle::initial();
        for (property, value) in pairs {
            style.set(property, value);
        }
        style
    }

    #[test]
    fn test_from_style_defaults() {
        let font = Font::from_style(&ComputedStyle::initial());
        assert_eq!(
            font,
            Font {
                size: 12,
                weight: FontWeight::Normal,
                slant: FontSlant::Roman
            }
        );
        assert!((font.pixel_size() - 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_style_truncates_points() {
        // 18.72px * 0.75 = 14.04pt
        let font = Font::from_style(&style(&[("font-size", "18.72px")]));
        assert_eq!(font.size, 14);
    }

    #[test]
    fn test_weight_and_slant_keywords() {
        let font = Font::from_style(&style(&[("font-weight", "700"), ("font-style", "oblique")]));
        assert_eq!(font.weight, FontWeight::Bold);
        assert_eq!(font.slant, FontSlant::Italic);
        let font = Font::from_style(&style(&[("font-weight", "400"), ("font-style", "normal")]));
        assert_eq!(font.weight, FontWeight::Normal);
        assert_eq!(font.slant, FontSlant::Roman);
        assert_eq!(font.to_string(), "12pt normal roman");
    }

    #[test]
    fn test_cache_populates_once_per_font() {
        let metrics = ApproximateFontMetrics;
        let mut cache = FontCache::new(&metrics);
        assert!(cache.is_empty());
        let font = Font::from_style(&ComputedStyle::initial());
        let first = cache.get(font);
        let second = cache.get(font);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        let _ = cache.get(Font {
            weight: FontWeight::Bold,
            ..font
        });
        assert_eq!(cache.len(), 2);
    }
}
