//! Basic shapes: `rect`, `circle`, `ellipse`, `line`, `polyline`, `polygon`.

use super::{Element, ElementHandler};
use crate::calls::{Argument, Opcode};
use crate::document::Document;
use crate::error::{ElementError, ElementResult};
use crate::geometry::{BoundingBox, Point};
use crate::length::{Axis, parse_number_list};

/// `<rect>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    radius: f64,
}

impl ElementHandler for Rect {
    fn parse(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        element.require_attributes(&["width", "height"])?;
        self.x = element.length_or("x", Axis::X, 0.0)?;
        self.y = element.length_or("y", Axis::Y, 0.0)?;
        self.width = element.length_or("width", Axis::X, 0.0)?;
        self.height = element.length_or("height", Axis::Y, 0.0)?;
        element.require_positive(&[self.width, self.height])?;

        let rx = element.length("rx", Axis::X)?;
        let ry = element.length("ry", Axis::Y)?;
        let radius = match (rx, ry) {
            (Some(rx), Some(ry)) => rx.min(ry),
            (Some(r), None) | (None, Some(r)) => r,
            (None, None) => 0.0,
        };
        if radius < 0.0 {
            return Err(element.invalid_attributes());
        }
        self.radius = radius.min(self.width / 2.0).min(self.height / 2.0);
        Ok(())
    }

    fn apply(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        let mut arguments = vec![
            Argument::Point(Point::new(self.x, self.y)),
            Argument::Number(self.width),
            Argument::Number(self.height),
        ];
        let opcode = if self.radius > 0.0 {
            arguments.push(Argument::Number(self.radius));
            Opcode::RoundedRectangle
        } else {
            Opcode::Rectangle
        };
        element.calls_mut().emit(opcode, arguments);
        Ok(())
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(BoundingBox::from_rect(self.x, self.y, self.width, self.height))
    }
}

/// `<circle>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Circle {
    center: Point,
    radius: f64,
}

impl ElementHandler for Circle {
    fn parse(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        element.require_attributes(&["r"])?;
        self.center = Point::new(
            element.length_or("cx", Axis::X, 0.0)?,
            element.length_or("cy", Axis::Y, 0.0)?,
        );
        self.radius = element.length_or("r", Axis::Diagonal, 0.0)?;
        element.require_positive(&[self.radius])
    }

    fn apply(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        element.calls_mut().emit(
            Opcode::Circle,
            vec![Argument::Point(self.center), Argument::Number(self.radius)],
        );
        Ok(())
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        let r = self.radius;
        Some(BoundingBox::from_rect(
            self.center.x - r,
            self.center.y - r,
            2.0 * r,
            2.0 * r,
        ))
    }
}

/// `<ellipse>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Ellipse {
    center: Point,
    rx: f64,
    ry: f64,
}

impl ElementHandler for Ellipse {
    fn parse(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        element.require_attributes(&["rx", "ry"])?;
        self.center = Point::new(
            element.length_or("cx", Axis::X, 0.0)?,
            element.length_or("cy", Axis::Y, 0.0)?,
        );
        self.rx = element.length_or("rx", Axis::X, 0.0)?;
        self.ry = element.length_or("ry", Axis::Y, 0.0)?;
        element.require_positive(&[self.rx, self.ry])
    }

    fn apply(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        element.calls_mut().emit(
            Opcode::Ellipse,
            vec![
                Argument::Point(self.center),
                Argument::Number(self.rx),
                Argument::Number(self.ry),
            ],
        );
        Ok(())
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(BoundingBox::from_rect(
            self.center.x - self.rx,
            self.center.y - self.ry,
            2.0 * self.rx,
            2.0 * self.ry,
        ))
    }
}

/// `<line>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Line {
    from: Point,
    to: Point,
}

impl ElementHandler for Line {
    fn parse(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        self.from = Point::new(
            element.length_or("x1", Axis::X, 0.0)?,
            element.length_or("y1", Axis::Y, 0.0)?,
        );
        self.to = Point::new(
            element.length_or("x2", Axis::X, 0.0)?,
            element.length_or("y2", Axis::Y, 0.0)?,
        );
        Ok(())
    }

    fn apply(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        let calls = element.calls_mut();
        calls.emit(Opcode::MoveTo, vec![Argument::Point(self.from)]);
        calls.emit(Opcode::LineTo, vec![Argument::Point(self.to)]);
        Ok(())
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&[self.from, self.to])
    }

    fn marker_vertices(&self) -> Vec<Point> {
        vec![self.from, self.to]
    }
}

/// `<polyline>` and `<polygon>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Polyline {
    closed: bool,
    points: Vec<Point>,
}

impl Polyline {
    pub(crate) fn open() -> Self {
        Self::default()
    }

    pub(crate) fn closed() -> Self {
        Self {
            closed: true,
            points: Vec::new(),
        }
    }
}

impl ElementHandler for Polyline {
    fn parse(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        element.require_attributes(&["points"])?;
        let coordinates = element
            .attribute("points")
            .and_then(parse_number_list)
            .ok_or_else(|| element.invalid_attributes())?;
        // An odd trailing coordinate is dropped; the rest still renders.
        self.points = coordinates
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();
        if self.points.len() < 2 {
            return Err(ElementError::SkipQuietly);
        }
        Ok(())
    }

    fn apply(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        let calls = element.calls_mut();
        let mut points = self.points.iter();
        if let Some(&first) = points.next() {
            calls.emit(Opcode::MoveTo, vec![Argument::Point(first)]);
        }
        for &point in points {
            calls.emit(Opcode::LineTo, vec![Argument::Point(point)]);
        }
        if self.closed {
            calls.emit(Opcode::ClosePath, vec![]);
        }
        Ok(())
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }

    fn marker_vertices(&self) -> Vec<Point> {
        let mut vertices = self.points.clone();
        if self.closed {
            if let Some(&first) = self.points.first() {
                vertices.push(first);
            }
        }
        vertices
    }
}
