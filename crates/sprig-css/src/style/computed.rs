//! CSS Computed Style
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//! "The computed value is the result of resolving the specified value..."

use std::collections::BTreeMap;

use serde::Serialize;
use sprig_common::warning::warn_once;

use super::values::{DEFAULT_FONT_SIZE_PX, parse_px, resolve_font_size};

/// [§ 7.1 Inherited Properties](https://www.w3.org/TR/css-cascade-4/#inherited-property)
/// "Some properties are inherited from an ancestor element to its descendants."
///
/// The inherited properties and their initial values, used at the root.
pub const INHERITED_PROPERTIES: [(&str, &str); 4] = [
    ("font-size", "16px"),
    ("font-style", "normal"),
    ("font-weight", "normal"),
    ("color", "black"),
];

/// Computed styles for one node: property name to resolved value.
///
/// Values are the declared strings, except `font-size`, which is always
/// resolved to pixels before it is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComputedStyle {
    properties: BTreeMap<String, String>,
}

impl ComputedStyle {
    /// The style of a node without a parent: initial values for every
    /// inherited property.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            properties: INHERITED_PROPERTIES
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect(),
        }
    }

    /// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    ///
    /// Start a child's style: inherited properties copied from `parent`,
    /// everything else unset.
    #[must_use]
    pub fn inherit(parent: &Self) -> Self {
        let mut style = Self::default();
        for (name, initial) in INHERITED_PROPERTIES {
            style.set(name, parent.get(name).unwrap_or(initial));
        }
        style
    }

    /// Look up a property's value.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// Set a property's value without any resolution.
    pub fn set(&mut self, property: &str, value: &str) {
        let _ = self
            .properties
            .insert(property.to_string(), value.to_string());
    }

    /// All properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// [§ 4.3 Cascade](https://www.w3.org/TR/css-cascade-4/#cascading)
    ///
    /// Apply one declared value, overwriting any previous one.
    ///
    /// `font-size` is resolved against `parent_font_size_px`; a value that
    /// cannot be resolved leaves the current value in place.
    pub fn apply_declaration(&mut self, property: &str, value: &str, parent_font_size_px: f64) {
        if property != "font-size" {
            self.set(property, value);
            return;
        }
        match resolve_font_size(value, parent_font_size_px) {
            Some(resolved) => self.set(property, &resolved),
            None => {
                warn_once("CSS", &format!("unsupported font-size value '{value}'"));
            }
        }
    }

    /// Resolved `font-size` in CSS pixels.
    #[must_use]
    pub fn font_size_px(&self) -> f64 {
        self.get("font-size")
            .and_then(parse_px)
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    /// [§ 3.1 'color'](https://www.w3.org/TR/css-color-4/#the-color-property)
    #[must_use]
    pub fn color(&self) -> &str {
        self.get("color").unwrap_or("black")
    }

    /// [§ 3.2 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
    #[must_use]
    pub fn font_weight(&self) -> &str {
        self.get("font-weight").unwrap_or("normal")
    }

    /// [§ 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
    #[must_use]
    pub fn font_style(&self) -> &str {
        self.get("font-style").unwrap_or("normal")
    }

    /// [§ 3.2 'background-color'](https://www.w3.org/TR/css-backgrounds-3/#background-color)
    ///
    /// "Initial: transparent". Not inherited.
    #[must_use]
    pub fn background_color(&self) -> &str {
        self.get("background-color").unwrap_or("transparent")
    }
}
