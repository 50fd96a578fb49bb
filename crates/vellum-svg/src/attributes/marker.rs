//! `marker-start`, `marker-mid` and `marker-end`.

use vellum_css::Property;

use crate::calls::{Argument, Call, Opcode};
use crate::document::Document;
use crate::elements::Element;
use crate::error::ConvertError;
use crate::geometry::{Matrix, Point};
use crate::length::{Axis, parse_number};

/// Where one marker instance goes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    point: Point,
    /// Direction of the path at `point`, in degrees.
    angle: f64,
}

/// Bisector of two directions, in degrees.
fn bisect(incoming: f64, outgoing: f64) -> f64 {
    let (a, b) = (incoming.to_radians(), outgoing.to_radians());
    (a.sin() + b.sin()).atan2(a.cos() + b.cos()).to_degrees()
}

/// Placements for the start, the interior vertices and the end.
fn placements(vertices: &[Point]) -> (Vec<Placement>, Vec<Placement>, Vec<Placement>) {
    let n = vertices.len();
    if n == 0 {
        return (Vec::new(), Vec::new(), Vec::new());
    }
    let direction = |i: usize, j: usize| {
        if j < n && i < n && i != j {
            vertices[i].angle_to(vertices[j])
        } else {
            0.0
        }
    };

    let start = Placement {
        point: vertices[0],
        angle: direction(0, 1),
    };
    let end = Placement {
        point: vertices[n - 1],
        angle: if n > 1 { direction(n - 2, n - 1) } else { 0.0 },
    };
    let mids = (1..n.saturating_sub(1))
        .map(|i| Placement {
            point: vertices[i],
            angle: bisect(direction(i - 1, i), direction(i, i + 1)),
        })
        .collect();
    (vec![start], mids, vec![end])
}

/// A resolved `<marker>` definition.
struct MarkerDefinition {
    calls: Vec<Call>,
    ref_x: f64,
    ref_y: f64,
    /// Fixed angle, or `None` for `orient="auto"`.
    orient: Option<f64>,
    scale_by_stroke: bool,
}

impl MarkerDefinition {
    fn resolve(doc: &Document<'_>, value: &str, calls: Vec<Call>) -> Option<Self> {
        let registered = doc.element_by_url(value, "marker")?;
        let data = doc.tree().as_element(registered.node)?;
        let number = |name: &str| data.attrs.get(name).and_then(parse_number);
        let orient = match data.attrs.get("orient") {
            Some("auto") => None,
            Some(angle) => Some(parse_number(angle).unwrap_or(0.0)),
            None => Some(0.0),
        };
        Some(Self {
            calls,
            ref_x: number("refX").unwrap_or(0.0),
            ref_y: number("refY").unwrap_or(0.0),
            orient,
            scale_by_stroke: data.attrs.get("markerUnits") != Some("userSpaceOnUse"),
        })
    }

    fn matrix(&self, placement: Placement, stroke_width: f64) -> Matrix {
        let scale = if self.scale_by_stroke { stroke_width } else { 1.0 };
        Matrix::translate(placement.point.x, placement.point.y)
            .multiply(Matrix::rotate(self.orient.unwrap_or(placement.angle)))
            .multiply(Matrix::scale(scale, scale))
            .multiply(Matrix::translate(-self.ref_x, -self.ref_y))
    }
}

impl Element {
    /// Replay markers at `vertices`, anchored outside the paint scope.
    pub(crate) fn apply_markers(
        &mut self,
        doc: &mut Document<'_>,
        vertices: &[Point],
    ) -> Result<(), ConvertError> {
        if vertices.is_empty() || self.state().is_drawing_disabled() {
            return Ok(());
        }
        let (starts, mids, ends) = placements(vertices);
        let stroke_width = self
            .state()
            .distance(self.state().computed().get(Property::StrokeWidth), Axis::Diagonal)
            .unwrap_or(1.0);

        for (property, positions) in [
            (Property::MarkerStart, starts),
            (Property::MarkerMid, mids),
            (Property::MarkerEnd, ends),
        ] {
            let value = self.state().computed().get(property).to_string();
            if value == "none" {
                continue;
            }
            let Some(calls) = self.definition_calls(doc, &value, "marker")? else {
                continue;
            };
            let Some(marker) = MarkerDefinition::resolve(doc, &value, calls) else {
                continue;
            };
            self.calls_mut().with_root_scope(|calls| {
                for placement in positions {
                    calls.emit(Opcode::Save, vec![]);
                    calls.emit_and_enter(
                        Opcode::TransformationMatrix,
                        vec![Argument::Matrix(marker.matrix(placement, stroke_width))],
                    );
                    calls.extend(marker.calls.iter().cloned());
                    calls.exit();
                    calls.emit(Opcode::Restore, vec![]);
                }
            });
        }
        Ok(())
    }
}
