//! Per-node render state.
//!
//! Each child starts from a copy of its parent's state, so nothing a child
//! does is visible to its siblings or its parent.

use vellum_css::{ComputedProperties, Properties, Property};

use crate::length::{Axis, Size, parse_length};

/// Inherited context a node is processed under.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    computed: ComputedProperties,
    drawing_disabled: bool,
    fill_opacity: f64,
    stroke_opacity: f64,
    viewport: Size,
    depth: usize,
}

impl RenderState {
    /// State above the root element.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            computed: ComputedProperties::default(),
            drawing_disabled: false,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            viewport,
            depth: 0,
        }
    }

    /// Independent copy for a child, one level deeper.
    #[must_use]
    pub fn derive_child(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    /// Fold a node's property bag into the inherited computed values.
    pub fn apply(&mut self, bag: &Properties) {
        self.computed.compute(bag);
    }

    /// Computed properties after [`RenderState::apply`].
    #[must_use]
    pub const fn computed(&self) -> &ComputedProperties {
        &self.computed
    }

    /// Override a computed value for the rest of this node and its subtree.
    pub fn set_computed(&mut self, property: Property, value: &str) {
        self.computed.set(property, value);
    }

    /// Stop emitting paint for this node and every descendant. There is no
    /// way to turn drawing back on.
    pub fn disable_drawing(&mut self) {
        self.drawing_disabled = true;
    }

    /// True inside clip-path definitions.
    #[must_use]
    pub const fn is_drawing_disabled(&self) -> bool {
        self.drawing_disabled
    }

    /// Multiply the cumulative opacities and return the new `(fill, stroke)`.
    pub fn multiply_opacity(&mut self, fill: f64, stroke: f64) -> (f64, f64) {
        self.fill_opacity *= fill;
        self.stroke_opacity *= stroke;
        (self.fill_opacity, self.stroke_opacity)
    }

    /// Cumulative `(fill, stroke)` opacity.
    #[must_use]
    pub const fn opacity(&self) -> (f64, f64) {
        (self.fill_opacity, self.stroke_opacity)
    }

    /// The nearest viewport, for percentages.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Establish a new viewport for this node's descendants.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Nesting depth; the root element is at depth 1.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Resolve a length against this state's viewport and font size.
    #[must_use]
    pub fn distance(&self, value: &str, axis: Axis) -> Option<f64> {
        parse_length(value, axis, self.viewport, self.computed.font_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_copy_is_independent() {
        let mut parent = RenderState::new(Size::new(100.0, 100.0));
        let mut child = parent.derive_child();
        child.disable_drawing();
        let _ = child.multiply_opacity(0.5, 0.25);
        child.set_viewport(Size::new(10.0, 10.0));

        assert!(!parent.is_drawing_disabled());
        assert_eq!(parent.opacity(), (1.0, 1.0));
        assert_eq!(parent.viewport(), Size::new(100.0, 100.0));
        assert_eq!(child.depth(), parent.depth() + 1);

        parent.disable_drawing();
        assert!(parent.derive_child().is_drawing_disabled());
    }

    #[test]
    fn test_opacity_accumulates() {
        let mut state = RenderState::new(Size::new(1.0, 1.0));
        let _ = state.multiply_opacity(0.5, 1.0);
        assert_eq!(state.multiply_opacity(0.5, 0.5), (0.25, 0.5));
    }

    #[test]
    fn test_distance_uses_font_size() {
        let mut state = RenderState::new(Size::new(200.0, 100.0));
        let mut bag = Properties::new();
        assert!(bag.set("font-size", "10px"));
        state.apply(&bag);
        assert_eq!(state.distance("2em", Axis::X), Some(20.0));
        assert_eq!(state.distance("10%", Axis::Y), Some(10.0));
    }
}
