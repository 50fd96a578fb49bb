//! Computed properties
//!
//! A node's computed properties are its parent's computed snapshot with the
//! node's own property bag folded in. After folding, every property has a
//! value and no inheritance sentinel (`inherit`) remains.

use std::collections::BTreeMap;

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::property::{Properties, Property};

/// Font size keywords in px, `medium` being the initial 16px.
const FONT_SIZE_KEYWORDS: &[(&str, f64)] = &[
    ("xx-small", 9.0),
    ("x-small", 10.0),
    ("small", 13.0),
    ("medium", 16.0),
    ("large", 18.0),
    ("x-large", 24.0),
    ("xx-large", 32.0),
];

/// Inheritance-resolved values for every property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedProperties {
    values: BTreeMap<Property, String>,
}

impl Default for ComputedProperties {
    /// Every property at its initial value: the snapshot above the root.
    fn default() -> Self {
        Self {
            values: Property::iter()
                .map(|p| (p, p.initial_value().to_string()))
                .collect(),
        }
    }
}

impl ComputedProperties {
    /// Fold a node's property bag into this snapshot (which starts as a copy
    /// of the parent's).
    ///
    /// For each property:
    /// - a declared literal replaces the value
    /// - `inherit` keeps the parent's value
    /// - no declaration keeps the parent's value for inherited properties and
    ///   resets non-inherited ones to their initial value
    /// - `color: currentColor` behaves like `inherit`; `currentColor`
    ///   elsewhere is kept as a keyword and resolved at paint time
    pub fn compute(&mut self, bag: &Properties) {
        for property in Property::iter() {
            match bag.get(property) {
                None if !property.inherited() => {
                    self.set(property, property.initial_value());
                }
                None | Some("inherit") => {}
                Some("currentColor") if property == Property::Color => {}
                Some(value) if property == Property::FontSize => {
                    if let Some(size) = self.resolve_font_size(value) {
                        self.set(property, &format_number(size));
                    }
                }
                Some(value) => self.set(property, value),
            }
        }
    }

    /// Overwrite one computed value for the rest of this node's processing.
    pub fn set(&mut self, property: Property, value: &str) {
        let _ = self.values.insert(property, value.to_string());
    }

    /// Computed value of `property`.
    #[must_use]
    pub fn get(&self, property: Property) -> &str {
        self.values
            .get(&property)
            .map_or_else(|| property.initial_value(), String::as_str)
    }

    /// Computed `display`.
    #[must_use]
    pub fn display(&self) -> &str {
        self.get(Property::Display)
    }

    /// Computed `color`, the value `currentColor` stands for.
    #[must_use]
    pub fn color(&self) -> &str {
        self.get(Property::Color)
    }

    /// Computed `font-size` in px.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.get(Property::FontSize).parse().unwrap_or(16.0)
    }

    /// `em`, `%`, `px`, bare numbers and keywords, relative ones against the
    /// inherited size. Unparseable values leave the inherited size alone.
    fn resolve_font_size(&self, value: &str) -> Option<f64> {
        let value = value.trim();
        let parent = self.font_size();
        if let Some((_, px)) = FONT_SIZE_KEYWORDS.iter().find(|(k, _)| *k == value) {
            return Some(*px);
        }
        match value {
            "larger" => return Some(parent * 1.2),
            "smaller" => return Some(parent / 1.2),
            _ => {}
        }
        if let Some(em) = value.strip_suffix("em") {
            return em.trim().parse::<f64>().ok().map(|v| v * parent);
        }
        if let Some(pct) = value.strip_suffix('%') {
            return pct.trim().parse::<f64>().ok().map(|v| v * parent / 100.0);
        }
        if let Some(pt) = value.strip_suffix("pt") {
            return pt.trim().parse::<f64>().ok().map(|v| v * 1.25);
        }
        value
            .strip_suffix("px")
            .unwrap_or(value)
            .trim()
            .parse::<f64>()
            .ok()
    }
}

fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{rounded}")
}
