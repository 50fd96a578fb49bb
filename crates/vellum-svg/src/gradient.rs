//! Gradient definitions and the arguments of gradient paint calls.

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use vellum_css::ColorValue;

use crate::calls::Argument;
use crate::geometry::{BoundingBox, Matrix, Point};

/// Coordinate system of a gradient's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr)]
pub enum GradientUnits {
    /// Fractions of the painted shape's bounding box.
    #[default]
    #[strum(serialize = "objectBoundingBox")]
    ObjectBoundingBox,
    /// User units of the referencing element.
    #[strum(serialize = "userSpaceOnUse")]
    UserSpaceOnUse,
}

/// What happens past the ends of the gradient vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SpreadMethod {
    /// Extend the end colors.
    #[default]
    Pad,
    /// Mirror the gradient.
    Reflect,
    /// Repeat the gradient.
    Repeat,
}

/// One color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    /// Position along the gradient vector, `0..=1`.
    pub offset: f64,
    /// Stop color with `stop-opacity` folded into alpha.
    pub color: ColorValue,
}

/// Gradient geometry in its own unit space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientShape {
    /// Gradient vector from `(x1, y1)` to `(x2, y2)`.
    Linear {
        /// Start x.
        x1: f64,
        /// Start y.
        y1: f64,
        /// End x.
        x2: f64,
        /// End y.
        y2: f64,
    },
    /// Circle `(cx, cy, r)` with focal point `(fx, fy)`.
    Radial {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Radius.
        r: f64,
        /// Focus x.
        fx: f64,
        /// Focus y.
        fy: f64,
    },
}

impl GradientShape {
    /// Defaults for a linear gradient in bounding-box units.
    pub const LINEAR: Self = Self::Linear {
        x1: 0.0,
        y1: 0.0,
        x2: 1.0,
        y2: 0.0,
    };

    /// Defaults for a radial gradient in bounding-box units.
    pub const RADIAL: Self = Self::Radial {
        cx: 0.5,
        cy: 0.5,
        r: 0.5,
        fx: 0.5,
        fy: 0.5,
    };
}

/// A parsed `<linearGradient>` or `<radialGradient>`, `href` inheritance
/// already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    /// Geometry.
    pub shape: GradientShape,
    /// Unit space of `shape`.
    pub units: GradientUnits,
    /// Spread method.
    pub spread: SpreadMethod,
    /// `gradientTransform`.
    pub transform: Matrix,
    /// Color stops, offsets non-decreasing.
    pub stops: Vec<GradientStop>,
}

/// Gradient geometry as handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientCoordinates {
    /// Axis from `from` to `to`.
    Linear {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
    },
    /// Focal point and outer circle.
    Radial {
        /// Focal point.
        focus: Point,
        /// Outer circle center.
        center: Point,
        /// Outer circle radius.
        radius: f64,
    },
}

/// Everything a `fill_gradient` / `stroke_gradient` call carries.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientArguments {
    /// Color stops.
    pub stops: Vec<GradientStop>,
    /// Geometry in gradient space.
    pub coordinates: GradientCoordinates,
    /// Gradient space to user space of the painted node.
    pub transform: Matrix,
    /// Spread method.
    pub spread: SpreadMethod,
}

impl GradientArguments {
    /// Call arguments: stops, coordinates, transform, spread.
    #[must_use]
    pub fn into_arguments(self) -> Vec<Argument> {
        vec![
            Argument::Stops(self.stops),
            Argument::Coordinates(self.coordinates),
            Argument::Matrix(self.transform),
            Argument::from(self.spread.as_ref()),
        ]
    }
}

impl Gradient {
    /// Paint arguments for a node with the given bounding box.
    ///
    /// Returns `None` when the gradient cannot paint that node: bounding-box
    /// units without a box, or a box with no area.
    #[must_use]
    pub fn arguments_for(&self, bbox: Option<BoundingBox>) -> Option<GradientArguments> {
        let transform = match self.units {
            GradientUnits::UserSpaceOnUse => self.transform,
            GradientUnits::ObjectBoundingBox => {
                let bbox = bbox?;
                if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
                    return None;
                }
                bbox.unit_matrix().multiply(self.transform)
            }
        };

        let coordinates = match self.shape {
            GradientShape::Linear { x1, y1, x2, y2 } => GradientCoordinates::Linear {
                from: Point::new(x1, y1),
                to: Point::new(x2, y2),
            },
            GradientShape::Radial { cx, cy, r, fx, fy } => GradientCoordinates::Radial {
                focus: Point::new(fx, fy),
                center: Point::new(cx, cy),
                radius: r,
            },
        };

        Some(GradientArguments {
            stops: self.stops.clone(),
            coordinates,
            transform,
            spread: self.spread,
        })
    }
}
