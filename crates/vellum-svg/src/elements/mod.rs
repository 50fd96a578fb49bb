//! Element handlers and tag dispatch.
//!
//! Every supported tag maps to an [`ElementKind`], which hands out a boxed
//! [`ElementHandler`]. The handler supplies the tag-specific parts of the
//! lifecycle in [`base`]; everything else (cascade, standard attributes,
//! paint, child recursion, error containment) is shared.

mod base;
mod container;
mod gradient;
mod path;
mod shapes;
mod use_element;
mod viewport;

use strum_macros::EnumString;

use crate::document::Document;
use crate::error::{ElementError, ElementResult};
use crate::geometry::{BoundingBox, Point};

pub(crate) use base::{Element, splice_outcome};

/// Supported tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub(crate) enum ElementKind {
    #[strum(serialize = "svg")]
    Viewport,
    #[strum(serialize = "g")]
    Group,
    #[strum(serialize = "defs", serialize = "symbol")]
    Definitions,
    #[strum(serialize = "clipPath")]
    ClipPath,
    #[strum(serialize = "marker")]
    Marker,
    #[strum(serialize = "use")]
    Use,
    #[strum(serialize = "rect")]
    Rect,
    #[strum(serialize = "circle")]
    Circle,
    #[strum(serialize = "ellipse")]
    Ellipse,
    #[strum(serialize = "line")]
    Line,
    #[strum(serialize = "polyline")]
    Polyline,
    #[strum(serialize = "polygon")]
    Polygon,
    #[strum(serialize = "path")]
    Path,
    #[strum(serialize = "linearGradient")]
    LinearGradient,
    #[strum(serialize = "radialGradient")]
    RadialGradient,
    #[strum(
        serialize = "title",
        serialize = "desc",
        serialize = "metadata",
        serialize = "style"
    )]
    Ignored,
}

impl ElementKind {
    /// Kind for a tag name, `None` if the tag is unsupported.
    pub(crate) fn from_tag(tag_name: &str) -> Option<Self> {
        tag_name.parse().ok()
    }

    /// A fresh handler for one element of this kind.
    pub(crate) fn handler(self) -> Box<dyn ElementHandler> {
        match self {
            Self::Viewport => Box::new(viewport::Viewport::default()),
            Self::Group => Box::new(container::Container::group()),
            Self::Definitions | Self::Marker => Box::new(container::Container::hidden()),
            Self::ClipPath => Box::new(container::Container::clip_path()),
            Self::Use => Box::new(use_element::Use::default()),
            Self::Rect => Box::new(shapes::Rect::default()),
            Self::Circle => Box::new(shapes::Circle::default()),
            Self::Ellipse => Box::new(shapes::Ellipse::default()),
            Self::Line => Box::new(shapes::Line::default()),
            Self::Polyline => Box::new(shapes::Polyline::open()),
            Self::Polygon => Box::new(shapes::Polyline::closed()),
            Self::Path => Box::new(path::Path::default()),
            Self::LinearGradient => Box::new(gradient::GradientElement::linear()),
            Self::RadialGradient => Box::new(gradient::GradientElement::radial()),
            Self::Ignored => Box::new(Ignored),
        }
    }
}

/// Tag-specific steps of the element lifecycle.
pub(crate) trait ElementHandler {
    /// Read the tag's own attributes. Runs before any call is emitted.
    fn parse(&mut self, _element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        Ok(())
    }

    /// Emit the tag's own calls, after the standard attributes.
    fn apply(&mut self, _element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        Ok(())
    }

    /// Whether the element recurses into children.
    fn is_container(&self) -> bool {
        false
    }

    /// Process children. Defaults to the element's own element children.
    fn process_children(&mut self, element: &mut Element, doc: &mut Document<'_>) -> ElementResult {
        let children = doc.tree().children(element.source());
        element.process_child_elements(doc, children)
    }

    /// Box used for bounding-box gradients.
    fn bounding_box(&self) -> Option<BoundingBox> {
        None
    }

    /// Vertices where markers are placed, in drawing order.
    fn marker_vertices(&self) -> Vec<Point> {
        Vec::new()
    }
}

/// Elements that never draw anything (`title`, `desc`, `metadata`, `style`).
struct Ignored;

impl ElementHandler for Ignored {
    fn parse(&mut self, _element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        Err(ElementError::SkipQuietly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_table() {
        assert_eq!(ElementKind::from_tag("svg"), Some(ElementKind::Viewport));
        assert_eq!(ElementKind::from_tag("symbol"), Some(ElementKind::Definitions));
        assert_eq!(ElementKind::from_tag("clipPath"), Some(ElementKind::ClipPath));
        assert_eq!(ElementKind::from_tag("metadata"), Some(ElementKind::Ignored));
        assert_eq!(ElementKind::from_tag("clippath"), None);
        assert_eq!(ElementKind::from_tag("text"), None);
    }

    #[test]
    fn test_container_capability() {
        assert!(ElementKind::Group.handler().is_container());
        assert!(ElementKind::Use.handler().is_container());
        assert!(!ElementKind::Rect.handler().is_container());
        assert!(!ElementKind::LinearGradient.handler().is_container());
    }
}
