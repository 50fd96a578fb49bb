//! Tests for markup tree construction and traversal.

use vellum_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: Default::default(),
    }))
}

#[test]
fn test_append_child_sets_parent() {
    let mut tree = DomTree::new();
    let svg = alloc_element(&mut tree, "svg");
    tree.append_child(NodeId::ROOT, svg);

    let rect = alloc_element(&mut tree, "rect");
    tree.append_child(svg, rect);

    assert_eq!(tree.parent(rect), Some(svg));
    assert_eq!(tree.children(svg), &[rect]);
    assert_eq!(tree.document_element(), Some(svg));
}

#[test]
fn test_element_children_skip_text() {
    let mut tree = DomTree::new();
    let svg = alloc_element(&mut tree, "svg");
    tree.append_child(NodeId::ROOT, svg);

    let text = tree.alloc(NodeType::Text("\n  ".to_string()));
    tree.append_child(svg, text);
    let g = alloc_element(&mut tree, "g");
    tree.append_child(svg, g);

    assert_eq!(tree.children(svg).len(), 2);
    assert_eq!(tree.element_children(svg).collect::<Vec<_>>(), vec![g]);
}

#[test]
fn test_descendants_in_document_order() {
    let mut tree = DomTree::new();
    let svg = tree.append_element(NodeId::ROOT, ElementData::new::<&str, &str>("svg", []));
    let g = tree.append_element(svg, ElementData::new::<&str, &str>("g", []));
    let a = tree.append_element(g, ElementData::new::<&str, &str>("rect", []));
    let b = tree.append_element(svg, ElementData::new::<&str, &str>("circle", []));

    let order: Vec<_> = tree.descendants(svg).collect();
    assert_eq!(order, vec![svg, g, a, b]);
}

#[test]
fn test_classes_keep_listed_order() {
    let data = ElementData::new("rect", [("class", "  beta alpha\tgamma ")]);
    assert_eq!(data.classes(), vec!["beta", "alpha", "gamma"]);
    assert_eq!(data.id(), None);
}

#[test]
fn test_missing_node_has_no_children() {
    let tree = DomTree::new();
    assert!(tree.children(NodeId(42)).is_empty());
    assert!(tree.as_element(NodeId(42)).is_none());
}
