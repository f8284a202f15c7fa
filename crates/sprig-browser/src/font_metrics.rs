//! Font metrics backed by fontdue for accurate text measurement during layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! System fonts are looked up once per face (regular, bold, italic,
//! bold-italic). A missing face falls back to a near one, and with no font
//! at all every query is answered by [`ApproximateFontMetrics`].

use std::fs;

use fontdue::FontSettings;
use sprig_common::warning::warn_once;
use sprig_css::layout::{FontSlant, FontWeight, LineMetrics};
use sprig_css::{ApproximateFontMetrics, Font, FontMetrics};

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/Library/Fonts/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// System font paths for bold-italic variants.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/Library/Fonts/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// Font metrics implementation backed by fontdue's per-glyph metrics.
///
/// Uses `Font::metrics()` (not `Font::rasterize()`) so no bitmaps are
/// generated when only measurements are needed. Sizes are CSS pixels.
#[derive(Default)]
pub struct FontdueFontMetrics {
    regular: Option<fontdue::Font>,
    bold: Option<fontdue::Font>,
    italic: Option<fontdue::Font>,
    bold_italic: Option<fontdue::Font>,
}

impl FontdueFontMetrics {
    /// Load the system fonts.
    ///
    /// Never fails: if no regular face is found this warns once and every
    /// measurement uses the approximate fallback.
    #[must_use]
    pub fn load() -> Self {
        let metrics = Self {
            regular: load_font_from_paths(FONT_SEARCH_PATHS),
            bold: load_font_from_paths(FONT_BOLD_SEARCH_PATHS),
            italic: load_font_from_paths(FONT_ITALIC_SEARCH_PATHS),
            bold_italic: load_font_from_paths(FONT_BOLD_ITALIC_SEARCH_PATHS),
        };
        if metrics.regular.is_none() {
            warn_once("Font", "no system font found; using approximate metrics");
        }
        metrics
    }

    /// True if at least the regular face was found.
    #[must_use]
    pub const fn has_fonts(&self) -> bool {
        self.regular.is_some()
    }

    /// The face for `font`. Bold-italic falls back to bold, then italic;
    /// every variant falls back to regular.
    fn face(&self, font: &Font) -> Option<&fontdue::Font> {
        let variant = match (font.weight, font.slant) {
            (FontWeight::Bold, FontSlant::Italic) => {
                self.bold_italic.as_ref().or(self.bold.as_ref()).or(self.italic.as_ref())
            }
            (FontWeight::Bold, FontSlant::Roman) => self.bold.as_ref(),
            (FontWeight::Normal, FontSlant::Italic) => self.italic.as_ref(),
            (FontWeight::Normal, FontSlant::Roman) => None,
        };
        variant.or(self.regular.as_ref())
    }
}

impl FontMetrics for FontdueFontMetrics {
    fn measure(&self, text: &str, font: &Font) -> f32 {
        let Some(face) = self.face(font) else {
            return ApproximateFontMetrics.measure(text, font);
        };
        let px = font.pixel_size();
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| face.metrics(ch, px).advance_width)
            .sum()
    }

    fn line_metrics(&self, font: &Font) -> LineMetrics {
        let line = self
            .face(font)
            .and_then(|face| face.horizontal_line_metrics(font.pixel_size()));
        match line {
            // fontdue reports descent as a negative offset from the baseline.
            Some(line) => LineMetrics {
                ascent: line.ascent,
                descent: -line.descent,
            },
            None => ApproximateFontMetrics.line_metrics(font),
        }
    }
}

/// The first font in `paths` that exists and parses.
fn load_font_from_paths(paths: &[&str]) -> Option<fontdue::Font> {
    paths.iter().find_map(|path| {
        let data = fs::read(path).ok()?;
        fontdue::Font::from_bytes(data, FontSettings::default()).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(weight: FontWeight, slant: FontSlant) -> Font {
        Font {
            size: 12,
            weight,
            slant,
        }
    }

    #[test]
    fn test_no_fonts_falls_back_to_approximation() {
        let metrics = FontdueFontMetrics::default();
        let regular = font(FontWeight::Normal, FontSlant::Roman);
        assert!(!metrics.has_fonts());
        assert!(
            (metrics.measure("hello", &regular) - ApproximateFontMetrics.measure("hello", &regular))
                .abs()
                < f32::EPSILON
        );
        assert_eq!(
            metrics.line_metrics(&regular),
            ApproximateFontMetrics.line_metrics(&regular)
        );
    }

    #[test]
    fn test_system_fonts_measure_consistently() {
        let metrics = FontdueFontMetrics::load();
        let regular = font(FontWeight::Normal, FontSlant::Roman);
        let bold = font(FontWeight::Bold, FontSlant::Italic);
        for font in [regular, bold] {
            let one = metrics.measure("a", &font);
            assert!(one > 0.0);
            assert!((metrics.measure("aa", &font) - 2.0 * one).abs() < 1e-3);
            let line = metrics.line_metrics(&font);
            assert!(line.ascent > 0.0);
            assert!(line.descent >= 0.0);
        }
    }
}
