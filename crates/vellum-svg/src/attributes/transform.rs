//! The `transform` attribute.

use crate::calls::{Argument, Opcode};
use crate::document::Document;
use crate::elements::Element;
use crate::geometry::Matrix;
use crate::length::parse_number_list;

/// Parse a transform list such as `translate(10 20) rotate(45)` into one
/// matrix. Functions compose left to right. `None` on any malformed or
/// unknown function.
#[must_use]
pub fn parse_transform(value: &str) -> Option<Matrix> {
    let mut matrix = Matrix::IDENTITY;
    let mut rest = value.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    while !rest.is_empty() {
        let open = rest.find('(')?;
        let close = open + rest[open..].find(')')?;
        let name = rest[..open].trim();
        let args = parse_number_list(&rest[open + 1..close])?;
        matrix = matrix.multiply(transform_function(name, &args)?);
        rest = rest[close + 1..].trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    }
    Some(matrix)
}

fn transform_function(name: &str, args: &[f64]) -> Option<Matrix> {
    let m = match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => Matrix::new(a, b, c, d, e, f),
        ("translate", &[tx]) => Matrix::translate(tx, 0.0),
        ("translate", &[tx, ty]) => Matrix::translate(tx, ty),
        ("scale", &[s]) => Matrix::scale(s, s),
        ("scale", &[sx, sy]) => Matrix::scale(sx, sy),
        ("rotate", &[angle]) => Matrix::rotate(angle),
        ("rotate", &[angle, cx, cy]) => Matrix::translate(cx, cy)
            .multiply(Matrix::rotate(angle))
            .multiply(Matrix::translate(-cx, -cy)),
        ("skewX", &[angle]) => Matrix::skew_x(angle),
        ("skewY", &[angle]) => Matrix::skew_y(angle),
        _ => return None,
    };
    Some(m)
}

impl Element {
    /// Enter a `transformation_matrix` scope for the `transform` attribute.
    pub(crate) fn apply_transform(&mut self, doc: &mut Document<'_>) {
        let Some(value) = self.attribute("transform") else {
            return;
        };
        match parse_transform(value) {
            Some(matrix) if matrix.is_identity() => {}
            Some(matrix) => self
                .calls_mut()
                .emit_and_enter(Opcode::TransformationMatrix, vec![Argument::Matrix(matrix)]),
            None => {
                let message = format!("Invalid transform '{value}' on tag {}; ignoring", self.name());
                doc.warn(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_composition_order() {
        let m = parse_transform("translate(10, 0) scale(2)").unwrap();
        assert!(close(m.apply(Point::new(1.0, 1.0)), Point::new(12.0, 2.0)));
    }

    #[test]
    fn test_rotate_about_center() {
        let m = parse_transform("rotate(180 5 5)").unwrap();
        assert!(close(m.apply(Point::new(0.0, 0.0)), Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_matrix_and_separators() {
        let m = parse_transform("matrix(1 0 0 1 3 4),  skewX(0)").unwrap();
        assert_eq!(m.to_array(), [1.0, 0.0, 0.0, 1.0, 3.0, 4.0]);
        assert!(parse_transform("").unwrap().is_identity());
    }

    #[test]
    fn test_malformed() {
        assert!(parse_transform("spin(3)").is_none());
        assert!(parse_transform("scale(1, 2, 3)").is_none());
        assert!(parse_transform("translate(1").is_none());
        assert!(parse_transform("rotate(x)").is_none());
    }
}
