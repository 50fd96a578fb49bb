//! `<svg>`: the root viewport and nested viewports.

use vellum_css::Property;
use vellum_dom::NodeId;

use super::{Element, ElementHandler};
use crate::calls::{Argument, Opcode};
use crate::document::Document;
use crate::error::{ElementError, ElementResult};
use crate::geometry::{BoundingBox, Matrix, Point};
use crate::length::{Axis, Size, parse_number_list};

/// `viewBox="min-x min-y width height"`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ViewBox {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl ViewBox {
    fn parse(value: &str) -> Option<Self> {
        match parse_number_list(value)?.as_slice() {
            &[x, y, width, height] => Some(Self {
                x,
                y,
                width,
                height,
            }),
            _ => None,
        }
    }
}

/// Alignment of the view box inside the viewport along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Min,
    Mid,
    Max,
}

impl Align {
    fn offset(self, free: f64) -> f64 {
        match self {
            Self::Min => 0.0,
            Self::Mid => free / 2.0,
            Self::Max => free,
        }
    }
}

/// `preserveAspectRatio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AspectRatio {
    /// Stretch each axis independently.
    None,
    /// Uniform scale; `slice` covers the viewport instead of fitting in it.
    Uniform { x: Align, y: Align, slice: bool },
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::Uniform {
            x: Align::Mid,
            y: Align::Mid,
            slice: false,
        }
    }
}

impl AspectRatio {
    fn parse(value: &str) -> Self {
        let mut words = value.split_whitespace();
        let mut align = words.next().unwrap_or("xMidYMid");
        if align == "defer" {
            align = words.next().unwrap_or("xMidYMid");
        }
        if align == "none" {
            return Self::None;
        }
        let axis = |part: &str| match part {
            "Min" => Some(Align::Min),
            "Mid" => Some(Align::Mid),
            "Max" => Some(Align::Max),
            _ => None,
        };
        let parsed = align
            .strip_prefix('x')
            .filter(|rest| rest.len() == 7)
            .and_then(|rest| Some((axis(&rest[..3])?, rest[3..].strip_prefix('Y')?)))
            .and_then(|(x, rest)| Some((x, axis(rest)?)));
        let Some((x, y)) = parsed else {
            return Self::default();
        };
        Self::Uniform {
            x,
            y,
            slice: words.next() == Some("slice"),
        }
    }

    /// Matrix mapping `view_box` onto a `width` x `height` viewport.
    fn transform(self, view_box: ViewBox, width: f64, height: f64) -> Matrix {
        let sx = width / view_box.width;
        let sy = height / view_box.height;
        match self {
            Self::None => Matrix::scale(sx, sy).multiply(Matrix::translate(-view_box.x, -view_box.y)),
            Self::Uniform { x, y, slice } => {
                let scale = if slice { sx.max(sy) } else { sx.min(sy) };
                let tx = x.offset(width - view_box.width * scale);
                let ty = y.offset(height - view_box.height * scale);
                Matrix::translate(tx, ty)
                    .multiply(Matrix::scale(scale, scale))
                    .multiply(Matrix::translate(-view_box.x, -view_box.y))
            }
        }
    }
}

/// An `<svg>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Viewport {
    root: bool,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    transform: Option<Matrix>,
}

impl ElementHandler for Viewport {
    fn parse(&mut self, element: &mut Element, doc: &mut Document<'_>) -> ElementResult {
        self.root = doc.tree().parent(element.source()) == Some(NodeId::ROOT);

        let view_box = match element.attribute("viewBox").map(ViewBox::parse) {
            None => None,
            Some(None) => return Err(element.invalid_attributes()),
            Some(Some(view_box)) if view_box.width <= 0.0 || view_box.height <= 0.0 => {
                return Err(ElementError::SkipQuietly);
            }
            Some(Some(view_box)) => Some(view_box),
        };

        let parent = element.state().viewport();
        let (default_width, default_height) = match view_box {
            Some(view_box) if self.root => (view_box.width, view_box.height),
            _ => (parent.width, parent.height),
        };
        self.width = element.length_or("width", Axis::X, default_width)?;
        self.height = element.length_or("height", Axis::Y, default_height)?;
        element.require_positive(&[self.width, self.height])?;

        if !self.root {
            self.x = element.length_or("x", Axis::X, 0.0)?;
            self.y = element.length_or("y", Axis::Y, 0.0)?;
        }

        let aspect = element
            .attribute("preserveAspectRatio")
            .map(AspectRatio::parse)
            .unwrap_or_default();
        let mut transform = Matrix::translate(self.x, self.y);
        let inner = match view_box {
            Some(view_box) => {
                transform = transform.multiply(aspect.transform(view_box, self.width, self.height));
                Size::new(view_box.width, view_box.height)
            }
            None => Size::new(self.width, self.height),
        };
        self.transform = (!transform.is_identity()).then_some(transform);

        if self.root {
            doc.set_canvas_size(Size::new(self.width, self.height));
        }
        element.state_mut().set_viewport(inner);
        Ok(())
    }

    fn apply(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        // Nested viewports are hidden-overflow unless they say otherwise.
        let overflow = element.properties().get(Property::Overflow);
        let clips = !self.root && !matches!(overflow, Some("visible" | "auto"));
        let calls = element.calls_mut();
        if clips {
            calls.emit(
                Opcode::Rectangle,
                vec![
                    Argument::Point(Point::new(self.x, self.y)),
                    Argument::Number(self.width),
                    Argument::Number(self.height),
                ],
            );
            calls.emit(Opcode::Clip, vec![]);
        }
        if let Some(matrix) = self.transform {
            calls.emit_and_enter(Opcode::TransformationMatrix, vec![Argument::Matrix(matrix)]);
        }
        Ok(())
    }

    fn is_container(&self) -> bool {
        true
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(BoundingBox::from_rect(self.x, self.y, self.width, self.height))
    }
}
