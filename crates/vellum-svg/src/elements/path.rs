//! `<path>` and its path-data mini language.

use super::{Element, ElementHandler};
use crate::calls::{Argument, Opcode};
use crate::document::Document;
use crate::error::{ElementError, ElementResult};
use crate::geometry::{BoundingBox, Point};

/// One absolute path segment. Quadratic curves are raised to cubics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    ClosePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathError {
    /// `A`/`a` commands.
    Arc,
    Malformed,
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    const fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_whitespace() || *b == b',')
        {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn number(&mut self) -> Result<f64, PathError> {
        self.skip_separators();
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut count = self.digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            count += self.digits();
        }
        if count == 0 {
            return Err(PathError::Malformed);
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                self.pos = mark;
            }
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(PathError::Malformed)
    }

    fn point(&mut self, origin: Point) -> Result<Point, PathError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point::new(origin.x + x, origin.y + y))
    }
}

fn reflect(control: Option<Point>, about: Point) -> Point {
    control.map_or(about, |c| Point::new(2.0 * about.x - c.x, 2.0 * about.y - c.y))
}

/// Parse path data into absolute segments.
pub(crate) fn parse_path(data: &str) -> Result<Vec<PathSegment>, PathError> {
    let mut lexer = Lexer::new(data);
    let mut segments = Vec::new();
    let mut command: Option<u8> = None;
    let mut current = Point::default();
    let mut start = Point::default();
    let mut cubic_control: Option<Point> = None;
    let mut quad_control: Option<Point> = None;

    loop {
        lexer.skip_separators();
        let Some(byte) = lexer.peek() else {
            break;
        };
        if byte.is_ascii_alphabetic() {
            lexer.pos += 1;
            command = Some(byte);
        } else if matches!(command, None | Some(b'Z' | b'z')) {
            return Err(PathError::Malformed);
        }
        let Some(cmd) = command else {
            return Err(PathError::Malformed);
        };
        let origin = if cmd.is_ascii_lowercase() {
            current
        } else {
            Point::default()
        };

        let (mut next_cubic, mut next_quad) = (None, None);
        match cmd.to_ascii_uppercase() {
            b'M' => {
                current = lexer.point(origin)?;
                start = current;
                segments.push(PathSegment::MoveTo(current));
                command = Some(if cmd == b'm' { b'l' } else { b'L' });
            }
            b'L' => {
                current = lexer.point(origin)?;
                segments.push(PathSegment::LineTo(current));
            }
            b'H' => {
                current = Point::new(origin.x + lexer.number()?, current.y);
                segments.push(PathSegment::LineTo(current));
            }
            b'V' => {
                current = Point::new(current.x, origin.y + lexer.number()?);
                segments.push(PathSegment::LineTo(current));
            }
            b'C' | b'S' => {
                let c1 = if cmd.eq_ignore_ascii_case(&b'C') {
                    lexer.point(origin)?
                } else {
                    reflect(cubic_control, current)
                };
                let c2 = lexer.point(origin)?;
                current = lexer.point(origin)?;
                segments.push(PathSegment::CurveTo(c1, c2, current));
                next_cubic = Some(c2);
            }
            b'Q' | b'T' => {
                let q = if cmd.eq_ignore_ascii_case(&b'Q') {
                    lexer.point(origin)?
                } else {
                    reflect(quad_control, current)
                };
                let from = current;
                current = lexer.point(origin)?;
                let c1 = Point::new(from.x + 2.0 / 3.0 * (q.x - from.x), from.y + 2.0 / 3.0 * (q.y - from.y));
                let c2 = Point::new(
                    current.x + 2.0 / 3.0 * (q.x - current.x),
                    current.y + 2.0 / 3.0 * (q.y - current.y),
                );
                segments.push(PathSegment::CurveTo(c1, c2, current));
                next_quad = Some(q);
            }
            b'Z' => {
                segments.push(PathSegment::ClosePath);
                current = start;
            }
            b'A' => return Err(PathError::Arc),
            _ => return Err(PathError::Malformed),
        }
        cubic_control = next_cubic;
        quad_control = next_quad;
    }

    match segments.first() {
        None | Some(PathSegment::MoveTo(_)) => Ok(segments),
        Some(_) => Err(PathError::Malformed),
    }
}

/// A `<path>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Path {
    segments: Vec<PathSegment>,
}

impl ElementHandler for Path {
    fn parse(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        element.require_attributes(&["d"])?;
        let data = element.attribute("d").unwrap_or_default();
        self.segments = match parse_path(data) {
            Ok(segments) => segments,
            Err(PathError::Arc) => {
                return Err(ElementError::Skip(
                    "Arc commands in path data are not supported on tag path; skipping tag"
                        .to_string(),
                ));
            }
            Err(PathError::Malformed) => return Err(element.invalid_attributes()),
        };
        if self.segments.is_empty() {
            return Err(ElementError::SkipQuietly);
        }
        Ok(())
    }

    fn apply(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        let calls = element.calls_mut();
        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => calls.emit(Opcode::MoveTo, vec![Argument::Point(p)]),
                PathSegment::LineTo(p) => calls.emit(Opcode::LineTo, vec![Argument::Point(p)]),
                PathSegment::CurveTo(c1, c2, p) => calls.emit(
                    Opcode::CurveTo,
                    vec![Argument::Point(p), Argument::Point(c1), Argument::Point(c2)],
                ),
                PathSegment::ClosePath => calls.emit(Opcode::ClosePath, vec![]),
            }
        }
        Ok(())
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        let points: Vec<Point> = self
            .segments
            .iter()
            .flat_map(|segment| match *segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => vec![p],
                PathSegment::CurveTo(c1, c2, p) => vec![c1, c2, p],
                PathSegment::ClosePath => vec![],
            })
            .collect();
        BoundingBox::from_points(&points)
    }

    fn marker_vertices(&self) -> Vec<Point> {
        let mut vertices = Vec::new();
        let mut start = Point::default();
        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => {
                    start = p;
                    vertices.push(p);
                }
                PathSegment::LineTo(p) | PathSegment::CurveTo(_, _, p) => vertices.push(p),
                PathSegment::ClosePath => vertices.push(start),
            }
        }
        vertices
    }
}
