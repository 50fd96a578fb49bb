//! Markup tree for the vellum converter.
//!
//! This crate provides the input side of a conversion: an arena-based tree
//! of tag names, ordered attributes and ordered children, plus a reader that
//! builds that tree from SVG text.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. A
//! `NodeId` doubles as a stable identity for a markup node, which the
//! converter's id registry stores instead of references.

mod attributes;
pub mod reader;

pub use attributes::AttributesMap;
pub use reader::{MAX_NESTING, ReadError, parse_svg};

/// A type-safe index into the markup tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A node in the tree: its payload plus parent/child links.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is.
    pub node_type: NodeType,
    /// Parent node, `None` for the document and for detached nodes.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The document itself; owns the document element.
    Document,
    /// A tagged element.
    Element(ElementData),
    /// Character data. Only `<style>` contents are consulted by the converter.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Local tag name, case preserved (`linearGradient`, `clipPath`).
    pub tag_name: String,
    /// Attributes in source order.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data from a tag name and attribute pairs.
    #[must_use]
    pub fn new<K, V>(tag_name: &str, attrs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tag_name: tag_name.to_string(),
            attrs: attrs.into_iter().collect(),
        }
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }

    /// Returns the class names from the class attribute, in listed order.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        self.attrs
            .get("class")
            .map(|list| list.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Arena-based markup tree with O(1) node access and traversal.
///
/// All nodes live in a contiguous vector and refer to each other by index.
/// The Document node is always at index 0 ([`NodeId::ROOT`]).
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either id was not allocated by this tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Allocate an element and append it to `parent` in one step.
    pub fn append_element(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let id = self.alloc(NodeType::Element(data));
        self.append_child(parent, id);
        id
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Children of `id` that are elements, in document order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.as_element(child).is_some())
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of the direct text children of `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .filter_map(|&child| self.as_text(child))
            .collect()
    }

    /// The element whose parent is the document, if it exists.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(NodeId::ROOT).next()
    }

    /// Iterate over `id` and all its descendants in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
