//! Style sources
//!
//! The cascade asks a [`StyleSource`] for the declaration blocks attached to
//! one selector string at a time (`rect`, `.warning`, `#logo`). Which
//! selectors apply to a node is decided by the caller; no matching happens
//! here.

use vellum_common::warning::warn_once;

use crate::declaration::{DeclarationBlock, parse_declarations, strip_comments};

/// Something that can hand out declaration blocks by selector text.
pub trait StyleSource {
    /// Blocks registered under exactly `selector`, in source order.
    fn find_by_selector(&self, selector: &str) -> Vec<&DeclarationBlock>;
}

/// A style rule: a selector list and the block it applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Each comma-separated selector, whitespace-normalised.
    pub selectors: Vec<String>,
    /// The rule's declarations.
    pub declarations: DeclarationBlock,
}

/// The rules from every `<style>` element of a document, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Rules in source order.
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Append the rules of another sheet after this sheet's rules.
    pub fn extend(&mut self, other: Self) {
        self.rules.extend(other.rules);
    }
}

impl StyleSource for Stylesheet {
    fn find_by_selector(&self, selector: &str) -> Vec<&DeclarationBlock> {
        let selector = normalize_selector(selector);
        self.rules
            .iter()
            .filter(|rule| rule.selectors.contains(&selector))
            .map(|rule| &rule.declarations)
            .collect()
    }
}

fn normalize_selector(selector: &str) -> String {
    selector.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Index of the `}` closing the `{` at `open`, honouring nesting.
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse stylesheet text into rules.
///
/// At-rules (`@media`, `@import`, ...) are skipped with a diagnostic. An
/// unterminated block ends parsing; everything before it is kept.
#[must_use]
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let css = strip_comments(css);
    let mut rules = Vec::new();
    let mut rest = css.as_str();

    while let Some(open) = rest.find('{') {
        let Some(close) = matching_brace(rest, open) else {
            warn_once("CSS", "unterminated rule block; ignoring the rest of the stylesheet");
            break;
        };

        // Statement at-rules end with ';' and sit in front of the prelude.
        let mut prelude = rest[..open].trim();
        if let Some((statements, tail)) = prelude.rsplit_once(';') {
            for statement in statements.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                warn_once("CSS", &format!("ignoring at-rule '{statement}'"));
            }
            prelude = tail.trim();
        }

        let body = &rest[open + 1..close];
        if prelude.starts_with('@') {
            warn_once("CSS", &format!("ignoring at-rule '{prelude}'"));
        } else if !prelude.is_empty() {
            let selectors = prelude
                .split(',')
                .map(normalize_selector)
                .filter(|s| !s.is_empty())
                .collect();
            rules.push(StyleRule {
                selectors,
                declarations: parse_declarations(body),
            });
        }

        rest = &rest[close + 1..];
    }

    Stylesheet { rules }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_exact_selector() {
        let sheet = parse_stylesheet("rect { fill: red } .a, #b { stroke: blue } rect { opacity: 0.5 }");
        assert_eq!(sheet.rules.len(), 3);

        let rect = sheet.find_by_selector("rect");
        assert_eq!(rect.len(), 2);
        assert_eq!(rect[0].get("fill"), Some("red"));
        assert_eq!(rect[1].get("opacity"), Some("0.5"));

        assert_eq!(sheet.find_by_selector(".a")[0].get("stroke"), Some("blue"));
        assert_eq!(sheet.find_by_selector("#b")[0].get("stroke"), Some("blue"));
        assert!(sheet.find_by_selector("circle").is_empty());
    }

    #[test]
    fn test_selector_whitespace_is_normalised() {
        let sheet = parse_stylesheet("g   rect\n{ fill: red }");
        assert_eq!(sheet.find_by_selector("g rect").len(), 1);
    }

    #[test]
    fn test_at_rules_are_skipped() {
        let sheet = parse_stylesheet(
            "@import url(a.css); rect { fill: red } @media print { rect { fill: blue } } circle { fill: green }",
        );
        let selectors: Vec<_> = sheet.rules.iter().map(|r| r.selectors.join(",")).collect();
        assert_eq!(selectors, vec!["rect", "circle"]);
    }

    #[test]
    fn test_unterminated_block_keeps_earlier_rules() {
        let sheet = parse_stylesheet("rect { fill: red } circle { fill: blue");
        assert_eq!(sheet.rules.len(), 1);
    }
}
