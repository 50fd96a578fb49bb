//! SVG markup reader.
//!
//! Turns SVG text into a [`DomTree`]. Parsing is delegated to `roxmltree`;
//! this module only maps its nodes onto the arena: elements keep their local
//! tag name, attributes keep source order, and namespaced attributes from the
//! `xlink`/`xml` namespaces get their conventional prefix back
//! (`xlink:href`, `xml:space`).

use thiserror::Error;

use crate::{DomTree, ElementData, NodeId, NodeType};

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Deepest element nesting the reader accepts.
pub const MAX_NESTING: usize = 512;

/// Failure while reading markup.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The text is not well-formed XML.
    #[error("malformed markup: {0}")]
    Malformed(#[from] roxmltree::Error),
    /// Elements are nested deeper than [`MAX_NESTING`].
    #[error("element nesting deeper than {0} levels")]
    TooDeep(usize),
}

/// Parse SVG text into a markup tree.
///
/// Text nodes are kept (stylesheets live in them); comments and processing
/// instructions are dropped.
///
/// # Errors
///
/// Returns [`ReadError::TooDeep`] if elements nest deeper than
/// [`MAX_NESTING`], and [`ReadError::Malformed`] if the input is not
/// well-formed XML.
pub fn parse_svg(text: &str) -> Result<DomTree, ReadError> {
    check_nesting(text)?;
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let document = roxmltree::Document::parse_with_options(text, options)?;

    let mut tree = DomTree::new();
    let mut stack = vec![(document.root_element(), NodeId::ROOT)];

    while let Some((node, parent)) = stack.pop() {
        if node.is_element() {
            let attrs = node.attributes().map(|attr| {
                let name = match attr.namespace() {
                    Some(XLINK_NS) => format!("xlink:{}", attr.name()),
                    Some(XML_NS) => format!("xml:{}", attr.name()),
                    _ => attr.name().to_string(),
                };
                (name, attr.value().to_string())
            });
            let id = tree.append_element(parent, ElementData::new(node.tag_name().name(), attrs));
            stack.extend(node.children().rev().map(|child| (child, id)));
        } else if node.is_text() {
            let text = node.text().unwrap_or_default();
            let id = tree.alloc(NodeType::Text(text.to_string()));
            tree.append_child(parent, id);
        }
    }

    Ok(tree)
}

/// Reject deep nesting before the text reaches the XML parser.
///
/// Only tags are counted; comments, CDATA, processing instructions and
/// declarations are skipped whole. Well-formedness is left to `roxmltree`.
fn check_nesting(text: &str) -> Result<(), ReadError> {
    let mut depth = 0usize;
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        rest = &rest[start..];
        if rest.starts_with("<!--") {
            rest = skip_past(&rest[4..], "-->");
        } else if rest.starts_with("<![CDATA[") {
            rest = skip_past(rest, "]]>");
        } else if rest.starts_with("<?") {
            rest = skip_past(rest, "?>");
        } else if rest.starts_with("</") || rest.starts_with("<!") {
            if rest.starts_with("</") {
                depth = depth.saturating_sub(1);
            }
            rest = skip_past(rest, ">");
        } else {
            let end = tag_end(rest);
            let self_closing = rest[..end].ends_with('/');
            rest = &rest[(end + 1).min(rest.len())..];
            if !self_closing {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ReadError::TooDeep(MAX_NESTING));
                }
            }
        }
    }
    Ok(())
}

/// The text after the first `marker`, or nothing if there is none.
fn skip_past<'a>(text: &'a str, marker: &str) -> &'a str {
    text.find(marker).map_or("", |at| &text[at + marker.len()..])
}

/// Offset of the `>` that closes the tag opening `text`. Quoted attribute
/// values may contain `>`.
fn tag_end(text: &str) -> usize {
    let mut quote = None;
    for (i, c) in text.char_indices().skip(1) {
        match quote {
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return i,
            Some(open) if c == open => quote = None,
            _ => {}
        }
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_nested_elements_in_order() {
        let tree = parse_svg(r#"<svg><g id="a"><rect/><circle/></g><line/></svg>"#).unwrap();
        let svg = tree.document_element().unwrap();
        assert_eq!(tree.as_element(svg).unwrap().tag_name, "svg");

        let children: Vec<_> = tree
            .element_children(svg)
            .map(|id| tree.as_element(id).unwrap().tag_name.clone())
            .collect();
        assert_eq!(children, vec!["g", "line"]);

        let g = tree.element_children(svg).next().unwrap();
        let grandchildren: Vec<_> = tree
            .element_children(g)
            .map(|id| tree.as_element(id).unwrap().tag_name.clone())
            .collect();
        assert_eq!(grandchildren, vec!["rect", "circle"]);
    }

    #[test]
    fn test_xlink_prefix_is_restored() {
        let tree = parse_svg(
            r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a"/></svg>"##,
        )
        .unwrap();
        let svg = tree.document_element().unwrap();
        let use_el = tree.element_children(svg).next().unwrap();
        assert_eq!(tree.as_element(use_el).unwrap().attrs.get("xlink:href"), Some("#a"));
    }

    #[test]
    fn test_style_text_is_kept() {
        let tree = parse_svg("<svg><style>rect { fill: red }</style></svg>").unwrap();
        let svg = tree.document_element().unwrap();
        let style = tree.element_children(svg).next().unwrap();
        assert_eq!(tree.text_content(style), "rect { fill: red }");
    }

    #[test]
    fn test_malformed_markup_is_an_error() {
        assert!(matches!(parse_svg("<svg><g></svg>"), Err(ReadError::Malformed(_))));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let text = format!("<svg>{}{}</svg>", "<g>".repeat(5000), "</g>".repeat(5000));
        assert!(matches!(parse_svg(&text), Err(ReadError::TooDeep(MAX_NESTING))));
    }

    #[test]
    fn test_nesting_count_ignores_comments_and_empty_tags() {
        let text = format!(
            "<svg><!-- {} -->{}<g title=\"a > b\">{}</g></svg>",
            "<g>".repeat(1000),
            "<g/>".repeat(1000),
            "<g><rect/>".repeat(100) + &"</g>".repeat(100),
        );
        let tree = parse_svg(&text).unwrap();
        let svg = tree.document_element().unwrap();
        assert_eq!(tree.element_children(svg).count(), 1001);
    }
}
