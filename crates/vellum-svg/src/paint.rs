//! Paint values: `fill` and `stroke`.
//!
//! A paint value is tokenized into an ordered list of candidates. The first
//! candidate the node can actually use wins; a `url(#id)` that does not
//! resolve falls through to the next one.

use strum_macros::Display;
use vellum_css::{ColorValue, Property};

use crate::calls::{Argument, Opcode};
use crate::document::Document;
use crate::elements::Element;
use crate::geometry::BoundingBox;

/// The two paint channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PaintChannel {
    /// Interior paint.
    Fill,
    /// Outline paint.
    Stroke,
}

impl PaintChannel {
    /// Both channels, fill first.
    pub const ALL: [Self; 2] = [Self::Fill, Self::Stroke];

    /// The property holding this channel's paint.
    #[must_use]
    pub const fn property(self) -> Property {
        match self {
            Self::Fill => Property::Fill,
            Self::Stroke => Property::Stroke,
        }
    }

    const fn color_opcode(self) -> Opcode {
        match self {
            Self::Fill => Opcode::FillColor,
            Self::Stroke => Opcode::StrokeColor,
        }
    }

    const fn gradient_opcode(self) -> Opcode {
        match self {
            Self::Fill => Opcode::FillGradient,
            Self::Stroke => Opcode::StrokeGradient,
        }
    }
}

/// One alternative of a paint value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintCandidate {
    /// A solid color.
    Color(ColorValue),
    /// A paint server referenced by id.
    Reference(String),
}

/// Id inside `url(#id)`, quotes allowed.
#[must_use]
pub fn url_reference(value: &str) -> Option<&str> {
    let inner = value
        .trim()
        .strip_prefix("url(")?
        .strip_suffix(')')?
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    inner.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Split a paint value into components, keeping parenthesized groups whole:
/// `url(#g) rgb(1, 2, 3)` gives `["url(#g)", "rgb(1, 2, 3)"]`.
fn components(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for (i, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    parts.push(&value[s..i]);
                }
                continue;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        parts.push(&value[s..]);
    }
    parts
}

/// Candidates of a paint value, in preference order.
///
/// `current_color` is what `currentColor` stands for. Components that are
/// neither a reference nor a color are dropped. When the value contains no
/// reference, black is appended as the final fallback.
#[must_use]
pub fn parse_paint(value: &str, current_color: &str) -> Vec<PaintCandidate> {
    let mut candidates = Vec::new();
    let mut has_reference = false;
    for component in components(value) {
        if let Some(id) = url_reference(component) {
            has_reference = true;
            candidates.push(PaintCandidate::Reference(id.to_string()));
        } else {
            let color = if component.eq_ignore_ascii_case("currentColor") {
                current_color
            } else {
                component
            };
            if let Some(color) = ColorValue::parse(color) {
                candidates.push(PaintCandidate::Color(color));
            }
        }
    }
    if !has_reference {
        candidates.push(PaintCandidate::Color(ColorValue::BLACK));
    }
    candidates
}

impl Element {
    /// Emit paint calls for both channels from this node's own declared
    /// values. A channel whose candidates all fail is forced to `none`.
    pub(crate) fn apply_paint(&mut self, doc: &Document<'_>, bbox: Option<BoundingBox>) {
        for channel in PaintChannel::ALL {
            let Some(value) = self.properties().get(channel.property()) else {
                continue;
            };
            if value == "inherit" || value == "none" {
                continue;
            }
            let candidates = parse_paint(value, self.state().computed().color());
            if !self.emit_first_paint(doc, channel, &candidates, bbox) {
                self.state_mut().set_computed(channel.property(), "none");
            }
        }
    }

    fn emit_first_paint(
        &mut self,
        doc: &Document<'_>,
        channel: PaintChannel,
        candidates: &[PaintCandidate],
        bbox: Option<BoundingBox>,
    ) -> bool {
        for candidate in candidates {
            match candidate {
                PaintCandidate::Color(color) => {
                    self.calls_mut()
                        .emit(channel.color_opcode(), vec![Argument::Color(*color)]);
                    return true;
                }
                PaintCandidate::Reference(id) => {
                    let arguments = doc
                        .gradient(id)
                        .and_then(|gradient| gradient.arguments_for(bbox));
                    if let Some(arguments) = arguments {
                        self.calls_mut()
                            .emit(channel.gradient_opcode(), arguments.into_arguments());
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Open the draw-mode scope for a leaf shape: `fill`, `stroke`,
    /// `fill_and_stroke` or `end_path` when both channels are `none`.
    pub(crate) fn open_draw_mode(&mut self) {
        if self.state().is_drawing_disabled() {
            return;
        }
        let computed = self.state().computed();
        let fill = computed.get(Property::Fill) != "none";
        let stroke = computed.get(Property::Stroke) != "none";
        let opcode = match (fill, stroke) {
            (true, true) => Opcode::FillAndStroke,
            (true, false) => Opcode::Fill,
            (false, true) => Opcode::Stroke,
            (false, false) => Opcode::EndPath,
        };
        self.calls_mut().emit_and_enter(opcode, vec![]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_reference() {
        assert_eq!(url_reference("url(#grad)"), Some("grad"));
        assert_eq!(url_reference(" url( '#grad' ) "), Some("grad"));
        assert_eq!(url_reference("url(other.svg#grad)"), None);
        assert_eq!(url_reference("#grad"), None);
    }

    #[test]
    fn test_components_keep_functions_whole() {
        assert_eq!(
            components("url(#g)  rgb(1, 2, 3)"),
            vec!["url(#g)", "rgb(1, 2, 3)"]
        );
        assert!(components("   ").is_empty());
    }

    #[test]
    fn test_reference_with_fallback_color() {
        let candidates = parse_paint("url(#missing) red", "black");
        assert_eq!(
            candidates,
            vec![
                PaintCandidate::Reference("missing".to_string()),
                PaintCandidate::Color(ColorValue::rgb(255, 0, 0)),
            ]
        );
    }

    #[test]
    fn test_plain_color_gets_black_fallback() {
        let candidates = parse_paint("bogus", "black");
        assert_eq!(candidates, vec![PaintCandidate::Color(ColorValue::BLACK)]);

        let candidates = parse_paint("blue", "black");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], PaintCandidate::Color(ColorValue::rgb(0, 0, 255)));
    }

    #[test]
    fn test_current_color() {
        let candidates = parse_paint("currentColor", "lime");
        assert_eq!(candidates[0], PaintCandidate::Color(ColorValue::rgb(0, 255, 0)));
    }

    #[test]
    fn test_lone_reference_has_no_fallback() {
        assert_eq!(
            parse_paint("url(#g)", "black"),
            vec![PaintCandidate::Reference("g".to_string())]
        );
    }
}
