//! CSS value parsing
//!
//! Only `font-size` is resolved to a computed value. Every other property is
//! carried as the declared string.

/// User agent default font size.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
/// "Initial: medium" - we define medium as 16px per common browser convention.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
///
/// Parse a `<number>px` value. Returns `None` for any other unit or a
/// malformed number.
#[must_use]
pub fn parse_px(value: &str) -> Option<f64> {
    value
        .strip_suffix("px")
        .and_then(|number| number.parse::<f64>().ok())
        .filter(|px| px.is_finite())
}

/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
///
/// "Percentages: refer to parent element's font size"
///
/// Resolve a declared `font-size` against the parent's resolved size in
/// pixels. Pixel values are kept as written, percentages become pixels.
/// Returns `None` for anything else, in which case the declaration does not
/// apply.
#[must_use]
pub fn resolve_font_size(value: &str, parent_px: f64) -> Option<String> {
    if parse_px(value).is_some() {
        return Some(value.to_string());
    }
    let percent = value
        .strip_suffix('%')
        .and_then(|number| number.parse::<f64>().ok())
        .filter(|pct| pct.is_finite())?;
    // f64's Display prints whole numbers without a fraction: 8.0 -> "8".
    Some(format!("{}px", parent_px * percent / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("16px"), Some(16.0));
        assert_eq!(parse_px("12.5px"), Some(12.5));
        assert_eq!(parse_px("1em"), None);
        assert_eq!(parse_px("px"), None);
        assert_eq!(parse_px("large"), None);
    }

    #[test]
    fn test_pixels_kept_verbatim() {
        assert_eq!(resolve_font_size("20px", 16.0), Some("20px".to_string()));
    }

    #[test]
    fn test_percentages_use_parent_size() {
        assert_eq!(resolve_font_size("50%", 16.0), Some("8px".to_string()));
        assert_eq!(resolve_font_size("200%", 16.0), Some("32px".to_string()));
        assert_eq!(resolve_font_size("117%", 16.0), Some("18.72px".to_string()));
    }

    #[test]
    fn test_other_units_rejected() {
        assert_eq!(resolve_font_size("2em", 16.0), None);
        assert_eq!(resolve_font_size("larger", 16.0), None);
        assert_eq!(resolve_font_size("%", 16.0), None);
    }
}
