//! `opacity`, `fill-opacity` and `stroke-opacity`.

use vellum_css::Property;

use crate::calls::{Argument, Opcode};
use crate::elements::Element;
use crate::length::parse_number;

fn parse_opacity(value: &str) -> Option<f64> {
    let value = value.trim();
    let opacity = match value.strip_suffix('%') {
        Some(percent) => parse_number(percent)? / 100.0,
        None => parse_number(value)?,
    };
    Some(opacity.clamp(0.0, 1.0))
}

impl Element {
    /// Fold declared opacities into the cumulative state and enter a
    /// `transparent(fill, stroke)` scope with the result.
    pub(crate) fn apply_opacity(&mut self) {
        let declared = |property| self.properties().get(property).and_then(parse_opacity);
        let opacity = declared(Property::Opacity);
        let fill = declared(Property::FillOpacity);
        let stroke = declared(Property::StrokeOpacity);
        if opacity.is_none() && fill.is_none() && stroke.is_none() {
            return;
        }

        let opacity = opacity.unwrap_or(1.0);
        let (fill, stroke) = self.state_mut().multiply_opacity(
            opacity * fill.unwrap_or(1.0),
            opacity * stroke.unwrap_or(1.0),
        );
        self.calls_mut().emit_and_enter(
            Opcode::Transparent,
            vec![Argument::Number(fill), Argument::Number(stroke)],
        );
    }
}
