//! Property Model
//!
//! An attribute is either a style **property** (fill, stroke, opacity,
//! color, font-*, display, ...) or a plain structural **attribute** (x, y,
//! width, id, class, transform, ...). Only names listed in [`Property`] take
//! part in the cascade and in inheritance.

use std::collections::BTreeMap;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A style-relevant property name.
///
/// The kebab-case spelling is both the attribute name and the declaration
/// name (`stroke-dasharray`, `font-size`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum Property {
    AlignmentBaseline,
    BaselineShift,
    ClipPath,
    ClipRule,
    Color,
    Display,
    DominantBaseline,
    Fill,
    FillOpacity,
    FillRule,
    FontFamily,
    FontSize,
    FontStyle,
    FontVariant,
    FontWeight,
    LetterSpacing,
    MarkerEnd,
    MarkerMid,
    MarkerStart,
    Opacity,
    Overflow,
    StopColor,
    StopOpacity,
    Stroke,
    StrokeDasharray,
    StrokeLinecap,
    StrokeLinejoin,
    StrokeOpacity,
    StrokeWidth,
    TextAnchor,
    TextDecoration,
    Visibility,
}

impl Property {
    /// Look up a property by attribute or declaration name.
    ///
    /// Returns `None` for names that are plain attributes.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Whether a node without its own value takes its parent's computed value.
    #[must_use]
    pub const fn inherited(self) -> bool {
        !matches!(
            self,
            Self::AlignmentBaseline
                | Self::BaselineShift
                | Self::ClipPath
                | Self::Display
                | Self::DominantBaseline
                | Self::Opacity
                | Self::Overflow
                | Self::StopColor
                | Self::StopOpacity
                | Self::TextDecoration
        )
    }

    /// The value used at the root, and for non-inherited properties a node
    /// does not set.
    #[must_use]
    pub const fn initial_value(self) -> &'static str {
        match self {
            Self::AlignmentBaseline | Self::DominantBaseline => "auto",
            Self::BaselineShift => "baseline",
            Self::ClipPath
            | Self::MarkerEnd
            | Self::MarkerMid
            | Self::MarkerStart
            | Self::Stroke
            | Self::StrokeDasharray
            | Self::TextDecoration => "none",
            Self::ClipRule | Self::FillRule => "nonzero",
            Self::Color | Self::Fill | Self::StopColor => "black",
            Self::Display => "inline",
            Self::FillOpacity | Self::Opacity | Self::StopOpacity | Self::StrokeOpacity | Self::StrokeWidth => "1",
            Self::FontFamily => "sans-serif",
            Self::FontSize => "16",
            Self::FontStyle | Self::FontVariant | Self::FontWeight | Self::LetterSpacing => "normal",
            Self::Overflow | Self::Visibility => "visible",
            Self::StrokeLinecap => "butt",
            Self::StrokeLinejoin => "miter",
            Self::TextAnchor => "start",
        }
    }
}

/// A node's property bag: raw declared values, before inheritance.
///
/// Values may be literals or the sentinels `inherit`, `none` and
/// `currentColor`; nothing here is resolved yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Properties {
    values: BTreeMap<Property, String>,
}

impl Properties {
    /// Create an empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Set a value by name.
    ///
    /// Returns `false`, leaving the bag untouched, if `name` is not a
    /// recognised property.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        match Property::from_name(name) {
            Some(property) => {
                self.set_property(property, value);
                true
            }
            None => false,
        }
    }

    /// Set (overwrite) a known property.
    pub fn set_property(&mut self, property: Property, value: &str) {
        let _ = self.values.insert(property, value.trim().to_string());
    }

    /// Declared value, if any.
    #[must_use]
    pub fn get(&self, property: Property) -> Option<&str> {
        self.values.get(&property).map(String::as_str)
    }

    /// Number of declared properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Declared values in property order.
    pub fn iter(&self) -> impl Iterator<Item = (Property, &str)> {
        self.values.iter().map(|(p, v)| (*p, v.as_str()))
    }
}
