//! `<linearGradient>` and `<radialGradient>`: definitions only, never drawn.

use vellum_css::{ColorValue, ComputedProperties, Property, resolve_style};
use vellum_dom::NodeId;

use super::{Element, ElementHandler};
use crate::attributes::transform::parse_transform;
use crate::document::Document;
use crate::error::{ElementError, ElementResult};
use crate::geometry::Matrix;
use crate::gradient::{Gradient, GradientShape, GradientStop, GradientUnits, SpreadMethod};
use crate::length::{Axis, parse_number};
use crate::paint::url_reference;

/// Handler that registers a gradient definition and then skips quietly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GradientElement {
    radial: bool,
}

impl GradientElement {
    pub(crate) const fn linear() -> Self {
        Self { radial: false }
    }

    pub(crate) const fn radial() -> Self {
        Self { radial: true }
    }

    /// The definition this one inherits from through `href`, if any.
    fn base(element: &Element, doc: &Document<'_>) -> Option<Gradient> {
        let href = element
            .attribute("href")
            .or_else(|| element.attribute("xlink:href"))?;
        let id = href.strip_prefix('#').or_else(|| url_reference(href))?;
        doc.gradient(id).cloned()
    }
}

/// A coordinate value: a fraction of the box in bounding-box units, a
/// length otherwise.
fn coordinate(element: &Element, value: &str, axis: Axis, units: GradientUnits) -> ElementResult<f64> {
    let resolved = match units {
        GradientUnits::ObjectBoundingBox => match value.trim().strip_suffix('%') {
            Some(percent) => parse_number(percent).map(|p| p / 100.0),
            None => parse_number(value),
        },
        GradientUnits::UserSpaceOnUse => element.state().distance(value, axis),
    };
    resolved.ok_or_else(|| element.invalid_attributes())
}

/// Geometry from the element's own attributes, then the inherited
/// definition, then the defaults.
fn resolve_shape(
    element: &Element,
    radial: bool,
    inherited: Option<GradientShape>,
    units: GradientUnits,
) -> ElementResult<GradientShape> {
    let get = |name: &str, axis: Axis, inherited: Option<f64>, default: &str| {
        match (element.attribute(name), inherited) {
            (Some(value), _) => coordinate(element, value, axis, units),
            (None, Some(value)) => Ok(value),
            (None, None) => coordinate(element, default, axis, units),
        }
    };

    if !radial {
        let (x1, y1, x2, y2) = match inherited {
            Some(GradientShape::Linear { x1, y1, x2, y2 }) => (Some(x1), Some(y1), Some(x2), Some(y2)),
            _ => (None, None, None, None),
        };
        return Ok(GradientShape::Linear {
            x1: get("x1", Axis::X, x1, "0%")?,
            y1: get("y1", Axis::Y, y1, "0%")?,
            x2: get("x2", Axis::X, x2, "100%")?,
            y2: get("y2", Axis::Y, y2, "0%")?,
        });
    }

    let (cx, cy, r, fx, fy) = match inherited {
        Some(GradientShape::Radial { cx, cy, r, fx, fy }) => (Some(cx), Some(cy), Some(r), Some(fx), Some(fy)),
        _ => (None, None, None, None, None),
    };
    let cx = get("cx", Axis::X, cx, "50%")?;
    let cy = get("cy", Axis::Y, cy, "50%")?;
    let r = get("r", Axis::Diagonal, r, "50%")?;
    // The focus defaults to the center.
    let fx = match (element.attribute("fx"), fx) {
        (Some(value), _) => coordinate(element, value, Axis::X, units)?,
        (None, Some(fx)) => fx,
        (None, None) => cx,
    };
    let fy = match (element.attribute("fy"), fy) {
        (Some(value), _) => coordinate(element, value, Axis::Y, units)?,
        (None, Some(fy)) => fy,
        (None, None) => cy,
    };
    Ok(GradientShape::Radial { cx, cy, r, fx, fy })
}

/// Offset of a `<stop>`: a number or percentage, clamped to `0..=1`.
fn stop_offset(value: Option<&str>) -> f64 {
    let value = value.unwrap_or("0").trim();
    let offset = match value.strip_suffix('%') {
        Some(percent) => parse_number(percent).map(|p| p / 100.0),
        None => parse_number(value),
    };
    offset.unwrap_or(0.0).clamp(0.0, 1.0)
}

/// The `<stop>` children of `node`, colors resolved through the cascade.
fn collect_stops(element: &Element, doc: &Document<'_>, node: NodeId) -> Vec<GradientStop> {
    let tree = doc.tree();
    let mut stops: Vec<GradientStop> = Vec::new();
    for child in tree.element_children(node) {
        let Some(data) = tree.as_element(child) else {
            continue;
        };
        if data.tag_name != "stop" {
            continue;
        }
        let resolved = resolve_style(data, doc.styles());
        let mut computed: ComputedProperties = element.state().computed().clone();
        computed.compute(&resolved.properties);

        let color_value = match computed.get(Property::StopColor) {
            "currentColor" => computed.color(),
            other => other,
        };
        let opacity = parse_number(computed.get(Property::StopOpacity)).unwrap_or(1.0);
        let color = ColorValue::parse(color_value)
            .unwrap_or(ColorValue::BLACK)
            .with_opacity(opacity);

        let floor = stops.last().map_or(0.0, |s| s.offset);
        let offset = stop_offset(resolved.attributes.get("offset")).max(floor);
        stops.push(GradientStop { offset, color });
    }
    stops
}

impl ElementHandler for GradientElement {
    fn parse(&mut self, element: &mut Element, doc: &mut Document<'_>) -> ElementResult {
        let base = Self::base(element, doc);
        let inherited_shape = base.as_ref().map(|b| b.shape).filter(|shape| {
            matches!(shape, GradientShape::Radial { .. }) == self.radial
        });

        let units = match element.attribute("gradientUnits") {
            Some(value) => value.parse().map_err(|_| element.invalid_attributes())?,
            None => base.as_ref().map_or_else(GradientUnits::default, |b| b.units),
        };
        let spread = match element.attribute("spreadMethod") {
            Some(value) => value.parse().map_err(|_| element.invalid_attributes())?,
            None => base.as_ref().map_or_else(SpreadMethod::default, |b| b.spread),
        };
        let transform = match element.attribute("gradientTransform") {
            Some(value) => parse_transform(value).ok_or_else(|| element.invalid_attributes())?,
            None => base.as_ref().map_or(Matrix::IDENTITY, |b| b.transform),
        };
        let shape = resolve_shape(element, self.radial, inherited_shape, units)?;

        let mut stops = collect_stops(element, doc, element.source());
        if stops.is_empty() {
            stops = base.map(|b| b.stops).unwrap_or_default();
        }
        if stops.is_empty() {
            return Err(ElementError::Skip(format!(
                "gradient on tag {} has no stops; skipping tag",
                element.name()
            )));
        }

        if let Some(id) = element.attribute("id") {
            doc.define_gradient(
                id,
                Gradient {
                    shape,
                    units,
                    spread,
                    transform,
                    stops,
                },
            );
        }
        Err(ElementError::SkipQuietly)
    }
}
