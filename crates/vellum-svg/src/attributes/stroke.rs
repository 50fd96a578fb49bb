//! Stroke parameters: width, caps, joins and dashes.

use vellum_css::Property;

use crate::calls::{Argument, Opcode};
use crate::document::Document;
use crate::elements::Element;
use crate::length::Axis;

fn cap_style(value: &str) -> Option<&'static str> {
    match value {
        "butt" => Some("butt"),
        "round" => Some("round"),
        "square" => Some("projecting_square"),
        _ => None,
    }
}

fn join_style(value: &str) -> Option<&'static str> {
    match value {
        "miter" => Some("miter"),
        "round" => Some("round"),
        "bevel" => Some("bevel"),
        _ => None,
    }
}

/// What a `stroke-dasharray` value asks for.
#[derive(Debug, Clone, PartialEq)]
enum Dashes {
    Solid,
    Pattern(Vec<f64>),
    Negative,
}

impl Element {
    /// Own declared value of `property`, ignoring `inherit`.
    fn declared(&self, property: Property) -> Option<&str> {
        self.properties()
            .get(property)
            .filter(|value| *value != "inherit")
    }

    /// Emit `line_width`, `cap_style`, `join_style` and `dash`/`undash` for
    /// the stroke properties this element declares.
    pub(crate) fn apply_stroke(&mut self, doc: &mut Document<'_>) {
        let mut emitted = Vec::new();
        let mut warnings = Vec::new();

        if let Some(value) = self.declared(Property::StrokeWidth) {
            match self.state().distance(value, Axis::Diagonal) {
                Some(width) if width >= 0.0 => {
                    emitted.push((Opcode::LineWidth, vec![Argument::Number(width)]));
                }
                _ => warnings.push(format!("Invalid stroke-width '{value}'; ignoring")),
            }
        }

        if let Some(value) = self.declared(Property::StrokeLinecap) {
            match cap_style(value) {
                Some(style) => emitted.push((Opcode::CapStyle, vec![Argument::from(style)])),
                None => warnings.push(format!("Unrecognized stroke-linecap '{value}'; ignoring")),
            }
        }

        if let Some(value) = self.declared(Property::StrokeLinejoin) {
            match join_style(value) {
                Some(style) => emitted.push((Opcode::JoinStyle, vec![Argument::from(style)])),
                None => warnings.push(format!("Unrecognized stroke-linejoin '{value}'; ignoring")),
            }
        }

        if let Some(value) = self.declared(Property::StrokeDasharray) {
            match self.dashes(value) {
                Some(Dashes::Solid) => emitted.push((Opcode::Undash, vec![])),
                Some(Dashes::Pattern(lengths)) => {
                    emitted.push((Opcode::Dash, vec![Argument::Numbers(lengths)]));
                }
                Some(Dashes::Negative) => {
                    warnings.push(
                        "stroke-dasharray cannot have negative numbers; treating as 'none'"
                            .to_string(),
                    );
                    emitted.push((Opcode::Undash, vec![]));
                }
                None => warnings.push(format!("Invalid stroke-dasharray '{value}'; ignoring")),
            }
        }

        for message in warnings {
            doc.warn(message);
        }
        let builder = self.calls_mut();
        for (opcode, arguments) in emitted {
            builder.emit(opcode, arguments);
        }
    }

    fn dashes(&self, value: &str) -> Option<Dashes> {
        if value.trim() == "none" {
            return Some(Dashes::Solid);
        }
        let mut lengths = value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| self.state().distance(s, Axis::Diagonal))
            .collect::<Option<Vec<f64>>>()?;
        if lengths.iter().any(|&l| l < 0.0) {
            return Some(Dashes::Negative);
        }
        if lengths.iter().all(|&l| l == 0.0) {
            return Some(Dashes::Solid);
        }
        if lengths.len() % 2 == 1 {
            lengths.extend_from_within(..);
        }
        Some(Dashes::Pattern(lengths))
    }
}
