//! SVG to drawing-call conversion.
//!
//! # Scope
//!
//! This crate implements:
//! - **Document context** - id registry, gradient table and warnings for one
//!   conversion
//! - **Render state** - inherited computed properties and propagating flags,
//!   copied per child
//! - **Call tree builder** - ordered, nested drawing calls with open scopes
//! - **Paint resolution** - colors, gradients and their fallbacks
//! - **Element lifecycle** - cascade, standard attributes, tag handlers,
//!   `save`/`restore` bracketing and skip containment
//! - **Element handlers** - `svg`, `g`, `defs`, `symbol`, `clipPath`,
//!   `marker`, `use`, basic shapes, `path` and gradients
//!
//! # Not Implemented
//!
//! - Text, images, patterns, masks and filters (their tags are reported as
//!   unknown)
//! - Arc commands in path data
//! - Selector matching (stylesheet blocks are looked up by exact selector)

/// Standard attributes: transform, opacity, clip-path, stroke and markers.
pub mod attributes;
/// Drawing calls and the call builder.
pub mod calls;
/// Document-wide state shared by every element.
pub mod document;
/// Per-element tag handlers and the lifecycle.
mod elements;
/// Error types.
pub mod error;
/// Points, boxes and matrices.
pub mod geometry;
/// Gradient definitions.
pub mod gradient;
/// Numbers and lengths.
pub mod length;
/// Paint parsing and resolution.
pub mod paint;
/// Per-element inherited state.
pub mod state;

pub use calls::{Argument, Call, CallBuilder, Opcode};
pub use document::{Document, RegisteredElement, collect_stylesheet};
pub use error::{ConvertError, ElementError};
pub use geometry::{BoundingBox, Matrix, Point};
pub use length::Size;
pub use state::RenderState;

use serde::Serialize;
use vellum_common::warning::clear_warnings;
use vellum_css::StyleSource;
use vellum_dom::{DomTree, parse_svg};

use crate::elements::{Element, ElementKind, splice_outcome};

/// Default nesting cap.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Conversion settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertOptions {
    /// Elements nested deeper than this are skipped with a warning.
    pub max_depth: usize,
    /// Viewport width when the root gives no size.
    pub default_width: f64,
    /// Viewport height when the root gives no size.
    pub default_height: f64,
    /// Register every id before processing, so references may point forward
    /// in document order. A `clipPath` or `marker` referenced before it is
    /// reached is processed on demand.
    pub pre_register_ids: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            default_width: 300.0,
            default_height: 150.0,
            pre_register_ids: false,
        }
    }
}

/// The result of a conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendering {
    /// Drawing calls for the root element.
    pub calls: Vec<Call>,
    /// Why parts of the input were dropped, in the order it happened.
    pub warnings: Vec<String>,
    /// Width of the outermost viewport.
    pub width: f64,
    /// Height of the outermost viewport.
    pub height: f64,
}

/// Convert a markup tree, using rules from its `<style>` elements.
///
/// # Errors
///
/// Returns [`ConvertError`] if the document has no `<svg>` root. Problems
/// inside the document become warnings instead.
pub fn convert(tree: &DomTree, options: &ConvertOptions) -> Result<Rendering, ConvertError> {
    clear_warnings();
    let stylesheet = collect_stylesheet(tree, tree.root());
    convert_document(tree, &stylesheet, options)
}

/// Convert a markup tree with rules from `styles`.
///
/// # Errors
///
/// Returns [`ConvertError`] if the document has no `<svg>` root.
pub fn convert_with_styles(
    tree: &DomTree,
    styles: &dyn StyleSource,
    options: &ConvertOptions,
) -> Result<Rendering, ConvertError> {
    clear_warnings();
    convert_document(tree, styles, options)
}

fn convert_document(
    tree: &DomTree,
    styles: &dyn StyleSource,
    options: &ConvertOptions,
) -> Result<Rendering, ConvertError> {
    let root = tree.document_element().ok_or(ConvertError::EmptyDocument)?;
    let root_tag = tree
        .as_element(root)
        .map(|data| data.tag_name.as_str())
        .ok_or(ConvertError::MissingNode(root))?;
    if root_tag != "svg" {
        return Err(ConvertError::NotSvg(root_tag.to_string()));
    }

    let mut doc = Document::new(tree, styles, *options);
    if options.pre_register_ids {
        doc.pre_register_ids(root);
    }

    let state = RenderState::new(Size::new(options.default_width, options.default_height));
    let mut output = CallBuilder::new();
    let element = Element::new(&mut doc, root, state.derive_child())?;
    let mut handler = ElementKind::Viewport.handler();
    let outcome = element.process(&mut doc, handler.as_mut());
    splice_outcome(outcome, &mut doc, &mut output)?;

    let size = doc
        .canvas_size()
        .unwrap_or(Size::new(options.default_width, options.default_height));
    Ok(Rendering {
        calls: output.into_calls(),
        warnings: doc.into_warnings().into_vec(),
        width: size.width,
        height: size.height,
    })
}

/// Read SVG text and convert it.
///
/// # Errors
///
/// Returns [`ConvertError::Markup`] for malformed markup, otherwise as
/// [`convert`].
pub fn convert_str(text: &str, options: &ConvertOptions) -> Result<Rendering, ConvertError> {
    let tree = parse_svg(text)?;
    convert(&tree, options)
}

#[cfg(test)]
mod tests {
    use vellum_common::warning::has_warned;

    use super::*;

    #[test]
    fn test_stylesheet_diagnostics_survive_conversion() {
        let rendering = convert_str(
            "<svg><style>@media print { rect { fill: red } }</style></svg>",
            &ConvertOptions::default(),
        )
        .unwrap();
        assert!(rendering.warnings.is_empty());
        assert!(has_warned("CSS", "ignoring at-rule '@media print'"));
    }
}
