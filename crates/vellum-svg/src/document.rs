//! Document-wide state shared by every element of one conversion.
//!
//! Holds the style source, the id registry, gradient definitions and the
//! warnings list. Elements borrow it mutably while they are processed.

use std::collections::HashMap;

use vellum_common::warning::Warnings;
use vellum_css::{StyleSource, Stylesheet, parse_stylesheet};
use vellum_dom::{DomTree, NodeId};

use crate::ConvertOptions;
use crate::calls::Call;
use crate::gradient::Gradient;
use crate::length::Size;
use crate::paint::url_reference;

/// An element reachable by id.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredElement {
    /// The element's node in the source tree.
    pub node: NodeId,
    /// The element's tag name.
    pub tag_name: String,
    /// Calls the element produced, once it has finished processing. Stays
    /// `None` for elements that were skipped or are still being processed.
    pub calls: Option<Vec<Call>>,
}

/// Shared state of one conversion.
pub struct Document<'a> {
    tree: &'a DomTree,
    styles: &'a dyn StyleSource,
    options: ConvertOptions,
    elements_by_id: HashMap<String, RegisteredElement>,
    gradients: HashMap<String, Gradient>,
    expanding: Vec<NodeId>,
    canvas: Option<Size>,
    warnings: Warnings,
}

impl<'a> Document<'a> {
    /// Start a conversion of `tree` with rules taken from `styles`.
    #[must_use]
    pub fn new(tree: &'a DomTree, styles: &'a dyn StyleSource, options: ConvertOptions) -> Self {
        Self {
            tree,
            styles,
            options,
            elements_by_id: HashMap::new(),
            gradients: HashMap::new(),
            expanding: Vec::new(),
            canvas: None,
            warnings: Warnings::new(),
        }
    }

    /// The source tree.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// The style source used by the cascade.
    #[must_use]
    pub const fn styles(&self) -> &'a dyn StyleSource {
        self.styles
    }

    /// Conversion options.
    #[must_use]
    pub const fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Record `node` under `id`. A later registration of the same id
    /// replaces the earlier one.
    pub fn register_element(&mut self, id: &str, node: NodeId, tag_name: &str) {
        let _ = self.elements_by_id.insert(
            id.to_string(),
            RegisteredElement {
                node,
                tag_name: tag_name.to_string(),
                calls: None,
            },
        );
    }

    /// Attach the finished calls of `node` to its registry entry, unless the
    /// id has since been taken by another element.
    pub fn complete_element(&mut self, id: &str, node: NodeId, calls: Vec<Call>) {
        if let Some(entry) = self.elements_by_id.get_mut(id) {
            if entry.node == node {
                entry.calls = Some(calls);
            }
        }
    }

    /// Register every id in the subtree of `root` before processing starts,
    /// so references may point forward in document order.
    pub fn pre_register_ids(&mut self, root: NodeId) {
        let tree = self.tree;
        for node in tree.descendants(root) {
            if let Some(data) = tree.as_element(node) {
                if let Some(id) = data.id() {
                    self.register_element(id, node, &data.tag_name);
                }
            }
        }
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<&RegisteredElement> {
        self.elements_by_id.get(id)
    }

    /// Resolve a `url(#id)` value to a registered element with the given
    /// tag name.
    #[must_use]
    pub fn element_by_url(&self, value: &str, tag_name: &str) -> Option<&RegisteredElement> {
        url_reference(value)
            .and_then(|id| self.element_by_id(id))
            .filter(|element| element.tag_name == tag_name)
    }

    /// Define (or redefine) the gradient `id`.
    pub fn define_gradient(&mut self, id: &str, gradient: Gradient) {
        let _ = self.gradients.insert(id.to_string(), gradient);
    }

    /// Look up a gradient by id.
    #[must_use]
    pub fn gradient(&self, id: &str) -> Option<&Gradient> {
        self.gradients.get(id)
    }

    /// True while `node` is being expanded.
    #[must_use]
    pub fn is_expanding(&self, node: NodeId) -> bool {
        self.expanding.contains(&node)
    }

    /// Mark `node` as being expanded by a `<use>`. Returns false if it
    /// already is, which means the reference is circular.
    pub fn begin_expansion(&mut self, node: NodeId) -> bool {
        if self.is_expanding(node) {
            return false;
        }
        self.expanding.push(node);
        true
    }

    /// Undo [`Document::begin_expansion`].
    pub fn end_expansion(&mut self, node: NodeId) {
        if let Some(index) = self.expanding.iter().rposition(|&n| n == node) {
            let _ = self.expanding.remove(index);
        }
    }

    /// Record the size of the outermost viewport.
    pub fn set_canvas_size(&mut self, size: Size) {
        if self.canvas.is_none() {
            self.canvas = Some(size);
        }
    }

    /// Size of the outermost viewport, once the root has been parsed.
    #[must_use]
    pub const fn canvas_size(&self) -> Option<Size> {
        self.canvas
    }

    /// Append a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message);
    }

    /// Warnings so far.
    #[must_use]
    pub const fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    /// Finish, returning the warnings.
    #[must_use]
    pub fn into_warnings(self) -> Warnings {
        self.warnings
    }
}

/// Rules from every CSS `<style>` element under `root`, in document order.
#[must_use]
pub fn collect_stylesheet(tree: &DomTree, root: NodeId) -> Stylesheet {
    let mut sheet = Stylesheet::default();
    for node in tree.descendants(root) {
        let Some(data) = tree.as_element(node) else {
            continue;
        };
        if data.tag_name != "style" {
            continue;
        }
        if data.attrs.get("type").is_some_and(|t| t != "text/css") {
            continue;
        }
        sheet.extend(parse_stylesheet(&tree.text_content(node)));
    }
    sheet
}

#[cfg(test)]
mod tests {
    use vellum_css::Property;
    use vellum_dom::parse_svg;

    use super::*;

    #[test]
    fn test_registration_last_write_wins() {
        let tree = parse_svg(r#"<svg><rect id="a"/><circle id="a"/></svg>"#).unwrap();
        let sheet = Stylesheet::default();
        let mut doc = Document::new(&tree, &sheet, ConvertOptions::default());
        let root = tree.document_element().unwrap();
        let children: Vec<NodeId> = tree.element_children(root).collect();

        doc.register_element("a", children[0], "rect");
        doc.register_element("a", children[1], "circle");
        doc.complete_element("a", children[0], vec![]);

        let entry = doc.element_by_id("a").unwrap();
        assert_eq!(entry.tag_name, "circle");
        assert!(entry.calls.is_none());
    }

    #[test]
    fn test_pre_register_and_url_lookup() {
        let tree = parse_svg(r#"<svg><g><clipPath id="c"/></g></svg>"#).unwrap();
        let sheet = Stylesheet::default();
        let mut doc = Document::new(&tree, &sheet, ConvertOptions::default());
        doc.pre_register_ids(tree.root());

        assert!(doc.element_by_url("url(#c)", "clipPath").is_some());
        assert!(doc.element_by_url("url(#c)", "marker").is_none());
        assert!(doc.element_by_url("url(#missing)", "clipPath").is_none());
    }

    #[test]
    fn test_expansion_guard() {
        let tree = DomTree::new();
        let sheet = Stylesheet::default();
        let mut doc = Document::new(&tree, &sheet, ConvertOptions::default());
        assert!(doc.begin_expansion(NodeId(3)));
        assert!(!doc.begin_expansion(NodeId(3)));
        doc.end_expansion(NodeId(3));
        assert!(doc.begin_expansion(NodeId(3)));
    }

    #[test]
    fn test_collect_stylesheet_skips_other_languages() {
        let tree = parse_svg(
            r#"<svg><style>rect { fill: red }</style><style type="text/x-other">circle { fill: blue }</style></svg>"#,
        )
        .unwrap();
        let sheet = collect_stylesheet(&tree, tree.root());
        let blocks = sheet.find_by_selector("rect");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].get(Property::Fill.as_ref()), Some("red"));
        assert!(sheet.find_by_selector("circle").is_empty());
    }
}
