//! Number and length parsing.
//!
//! Lengths resolve to user units (px). Absolute units use 96 dpi; `em` and
//! `ex` are relative to the computed font size; percentages are relative to
//! the nearest viewport along the requested axis.

/// Viewport dimensions in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Build a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The normalized diagonal used for percentages that are neither
    /// horizontal nor vertical.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        ((self.width * self.width + self.height * self.height) / 2.0).sqrt()
    }
}

/// Which viewport dimension a percentage refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Viewport width.
    X,
    /// Viewport height.
    Y,
    /// Normalized viewport diagonal (radii, stroke widths).
    Diagonal,
}

/// Absolute unit suffixes and their factors to px.
const ABSOLUTE_UNITS: &[(&str, f64)] = &[
    ("px", 1.0),
    ("pt", 1.25),
    ("pc", 15.0),
    ("mm", 96.0 / 25.4),
    ("cm", 96.0 / 2.54),
    ("in", 96.0),
];

/// Parse a plain number. Rejects empty input, trailing garbage and
/// non-finite values.
#[must_use]
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    let number: f64 = value.parse().ok()?;
    number.is_finite().then_some(number)
}

/// Parse a length into user units.
#[must_use]
pub fn parse_length(value: &str, axis: Axis, viewport: Size, font_size: f64) -> Option<f64> {
    let value = value.trim();
    if let Some(percent) = value.strip_suffix('%') {
        let reference = match axis {
            Axis::X => viewport.width,
            Axis::Y => viewport.height,
            Axis::Diagonal => viewport.diagonal(),
        };
        return parse_number(percent).map(|p| p * reference / 100.0);
    }
    if let Some(em) = value.strip_suffix("em") {
        return parse_number(em).map(|v| v * font_size);
    }
    if let Some(ex) = value.strip_suffix("ex") {
        return parse_number(ex).map(|v| v * font_size / 2.0);
    }
    for (unit, factor) in ABSOLUTE_UNITS {
        if let Some(number) = value.strip_suffix(unit) {
            return parse_number(number).map(|v| v * factor);
        }
    }
    parse_number(value)
}

/// Split a comma/whitespace separated list of numbers. `None` if any item
/// is not a number.
#[must_use]
pub fn parse_number_list(value: &str) -> Option<Vec<f64>> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_number)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(200.0, 100.0);

    fn length(value: &str, axis: Axis) -> Option<f64> {
        parse_length(value, axis, VIEWPORT, 16.0)
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_number("12"), Some(12.0));
        assert_eq!(parse_number(" -.5 "), Some(-0.5));
        assert_eq!(parse_number("1e2"), Some(100.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_units() {
        assert_eq!(length("10", Axis::X), Some(10.0));
        assert_eq!(length("10px", Axis::X), Some(10.0));
        assert_eq!(length("8pt", Axis::X), Some(10.0));
        assert_eq!(length("1in", Axis::X), Some(96.0));
        assert_eq!(length("2pc", Axis::X), Some(30.0));
        assert_eq!(length("2em", Axis::X), Some(32.0));
        assert_eq!(length("2ex", Axis::X), Some(16.0));
        assert!((length("25.4mm", Axis::X).unwrap() - 96.0).abs() < 1e-9);
        assert!((length("2.54cm", Axis::X).unwrap() - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_follow_axis() {
        assert_eq!(length("50%", Axis::X), Some(100.0));
        assert_eq!(length("50%", Axis::Y), Some(50.0));
        let diagonal = length("100%", Axis::Diagonal).unwrap();
        assert!((diagonal - VIEWPORT.diagonal()).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_lengths() {
        assert_eq!(length("wide", Axis::X), None);
        assert_eq!(length("px", Axis::X), None);
        assert_eq!(length("10 px", Axis::X), Some(10.0));
    }

    #[test]
    fn test_number_lists() {
        assert_eq!(parse_number_list("1,2 3 ,4"), Some(vec![1.0, 2.0, 3.0, 4.0]));
        assert_eq!(parse_number_list(""), Some(vec![]));
        assert_eq!(parse_number_list("1, x"), None);
    }
}
