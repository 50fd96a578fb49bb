//! Drawing calls and the per-node call builder.
//!
//! A [`Call`] is one drawing operation for a downstream renderer. Calls that
//! open a scope (a transform, a draw mode, a transparency group) carry the
//! calls they govern as `children`.
//!
//! [`CallBuilder`] records one node's calls. It keeps a path of open scopes;
//! new calls land in the innermost one. A node's finished buffer is spliced
//! into whichever scope its parent currently has open.

use std::fmt;

use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use vellum_css::ColorValue;

use crate::geometry::{Matrix, Point};
use crate::gradient::{GradientCoordinates, GradientStop};

/// Drawing operations, serialized in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    /// Push the graphics state.
    Save,
    /// Pop the graphics state.
    Restore,
    /// Set the fill color.
    FillColor,
    /// Set the stroke color.
    StrokeColor,
    /// Set a gradient as the fill paint.
    FillGradient,
    /// Set a gradient as the stroke paint.
    StrokeGradient,
    /// Scope: discard the children's path without painting.
    EndPath,
    /// Scope: fill the children's path.
    Fill,
    /// Scope: stroke the children's path.
    Stroke,
    /// Scope: fill then stroke the children's path.
    FillAndStroke,
    /// Scope: concatenate a matrix to the current transform.
    TransformationMatrix,
    /// Scope: paint the children with the given fill and stroke opacity.
    Transparent,
    /// Intersect the clip region with the current path.
    Clip,
    /// Set the stroke width.
    LineWidth,
    /// Set the line cap style.
    CapStyle,
    /// Set the line join style.
    JoinStyle,
    /// Set a dash pattern.
    Dash,
    /// Clear the dash pattern.
    Undash,
    /// Append a rectangle to the path.
    Rectangle,
    /// Append a rounded rectangle to the path.
    RoundedRectangle,
    /// Append a circle to the path.
    Circle,
    /// Append an ellipse to the path.
    Ellipse,
    /// Begin a subpath.
    MoveTo,
    /// Straight segment.
    LineTo,
    /// Cubic Bezier segment.
    CurveTo,
    /// Close the current subpath.
    ClosePath,
}

/// One argument of a drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Argument {
    /// A scalar.
    Number(f64),
    /// A point.
    Point(Point),
    /// A list of scalars (dash arrays).
    Numbers(Vec<f64>),
    /// A keyword such as a cap style.
    Keyword(String),
    /// A color.
    Color(ColorValue),
    /// A transform.
    Matrix(Matrix),
    /// Gradient color stops.
    Stops(Vec<GradientStop>),
    /// Gradient geometry.
    Coordinates(GradientCoordinates),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Point(p) => write!(f, "[{}, {}]", p.x, p.y),
            Self::Numbers(values) => write_list(f, values),
            Self::Keyword(keyword) => write!(f, ":{keyword}"),
            Self::Color(color) => write!(f, "{color}"),
            Self::Matrix(m) => write_list(f, &m.to_array()),
            Self::Stops(stops) => {
                let stops: Vec<String> = stops
                    .iter()
                    .map(|s| format!("{} {}", s.offset, s.color))
                    .collect();
                write!(f, "[{}]", stops.join(", "))
            }
            Self::Coordinates(GradientCoordinates::Linear { from, to }) => {
                write!(f, "[{}, {}, {}, {}]", from.x, from.y, to.x, to.y)
            }
            Self::Coordinates(GradientCoordinates::Radial {
                focus,
                center,
                radius,
            }) => write!(
                f,
                "[{}, {}, 0, {}, {}, {radius}]",
                focus.x, focus.y, center.x, center.y
            ),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[f64]) -> fmt::Result {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    write!(f, "[{}]", items.join(", "))
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Point> for Argument {
    fn from(value: Point) -> Self {
        Self::Point(value)
    }
}

impl From<ColorValue> for Argument {
    fn from(value: ColorValue) -> Self {
        Self::Color(value)
    }
}

impl From<Matrix> for Argument {
    fn from(value: Matrix) -> Self {
        Self::Matrix(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::Keyword(value.to_string())
    }
}

/// A drawing call, possibly scoping nested calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    /// The operation.
    pub opcode: Opcode,
    /// Positional arguments.
    pub arguments: Vec<Argument>,
    /// Calls governed by this one; empty unless it opens a scope.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Call>,
}

impl Call {
    /// A call without children.
    #[must_use]
    pub const fn new(opcode: Opcode, arguments: Vec<Argument>) -> Self {
        Self {
            opcode,
            arguments,
            children: Vec::new(),
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let arguments: Vec<String> = self.arguments.iter().map(ToString::to_string).collect();
        writeln!(
            f,
            "{:indent$}{}({})",
            "",
            self.opcode,
            arguments.join(", "),
            indent = depth * 2
        )?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Ordered call buffer with a stack of open scopes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallBuilder {
    calls: Vec<Call>,
    /// Child indices from `calls` down to the innermost open scope.
    open: Vec<usize>,
}

impl CallBuilder {
    /// An empty buffer with no open scopes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            calls: Vec::new(),
            open: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut Vec<Call> {
        let mut target = &mut self.calls;
        for &index in &self.open {
            target = &mut target[index].children;
        }
        target
    }

    /// Append a call to the innermost open scope.
    pub fn emit(&mut self, opcode: Opcode, arguments: Vec<Argument>) {
        self.current().push(Call::new(opcode, arguments));
    }

    /// Append a call and make it the innermost open scope. Scopes are closed
    /// implicitly when the buffer is finished.
    pub fn emit_and_enter(&mut self, opcode: Opcode, arguments: Vec<Argument>) {
        let target = self.current();
        target.push(Call::new(opcode, arguments));
        let index = target.len() - 1;
        self.open.push(index);
    }

    /// Close the innermost open scope. No-op at the outermost level.
    pub fn exit(&mut self) {
        let _ = self.open.pop();
    }

    /// Run `f` with all scopes temporarily closed, so its calls land at the
    /// outermost level, then reopen them.
    pub fn with_root_scope<F: FnOnce(&mut Self)>(&mut self, f: F) {
        let open = std::mem::take(&mut self.open);
        f(self);
        self.open = open;
    }

    /// Append already-built calls to the innermost open scope.
    pub fn extend(&mut self, calls: impl IntoIterator<Item = Call>) {
        self.current().extend(calls);
    }

    /// Append this buffer's outermost calls to `parent`'s innermost open
    /// scope.
    pub fn splice_into(self, parent: &mut Self) {
        parent.extend(self.calls);
    }

    /// Number of open scopes.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.open.len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Outermost calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Finish the buffer.
    #[must_use]
    pub fn into_calls(self) -> Vec<Call> {
        self.calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_and_enter_nests_following_calls() {
        let mut builder = CallBuilder::new();
        builder.emit_and_enter(Opcode::TransformationMatrix, vec![Matrix::scale(2.0, 2.0).into()]);
        builder.emit_and_enter(Opcode::Fill, vec![]);
        builder.emit(Opcode::Rectangle, vec![Point::new(0.0, 0.0).into(), 1.0.into(), 1.0.into()]);

        let calls = builder.into_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].children[0].opcode, Opcode::Fill);
        assert_eq!(calls[0].children[0].children[0].opcode, Opcode::Rectangle);
    }

    #[test]
    fn test_exit_returns_to_enclosing_scope() {
        let mut builder = CallBuilder::new();
        builder.emit_and_enter(Opcode::Fill, vec![]);
        builder.emit(Opcode::MoveTo, vec![Point::new(0.0, 0.0).into()]);
        builder.exit();
        builder.emit(Opcode::Restore, vec![]);
        builder.exit();
        assert_eq!(builder.depth(), 0);

        let calls = builder.into_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].opcode, Opcode::Restore);
    }

    #[test]
    fn test_root_scope_escapes_and_restores() {
        let mut builder = CallBuilder::new();
        builder.emit_and_enter(Opcode::Stroke, vec![]);
        builder.with_root_scope(|root| {
            assert_eq!(root.depth(), 0);
            root.emit(Opcode::Save, vec![]);
        });
        builder.emit(Opcode::LineTo, vec![Point::new(1.0, 1.0).into()]);
        assert_eq!(builder.depth(), 1);

        let calls = builder.into_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].children.len(), 1);
        assert_eq!(calls[1].opcode, Opcode::Save);
    }

    #[test]
    fn test_splice_into_open_scope() {
        let mut parent = CallBuilder::new();
        parent.emit_and_enter(Opcode::Transparent, vec![0.5.into(), 0.5.into()]);

        let mut child = CallBuilder::new();
        child.emit_and_enter(Opcode::Fill, vec![]);
        child.emit(Opcode::Circle, vec![Point::new(1.0, 1.0).into(), 2.0.into()]);
        child.splice_into(&mut parent);

        let calls = parent.into_calls();
        assert_eq!(calls[0].children[0].opcode, Opcode::Fill);
        assert_eq!(calls[0].children[0].children[0].opcode, Opcode::Circle);
    }

    #[test]
    fn test_display_and_serialize() {
        let mut builder = CallBuilder::new();
        builder.emit(Opcode::FillColor, vec![ColorValue::rgb(255, 0, 0).into()]);
        builder.emit(Opcode::CapStyle, vec!["round".into()]);
        let calls = builder.into_calls();

        assert_eq!(calls[0].to_string(), "fill_color(#ff0000)\n");
        assert_eq!(calls[1].to_string(), "cap_style(:round)\n");
        let json = serde_json::to_string(&calls[0]).unwrap();
        assert_eq!(json, r#"{"opcode":"fill_color","arguments":["ff0000"]}"#);
    }
}
