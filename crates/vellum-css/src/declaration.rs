//! Declaration blocks
//!
//! A block is the text between braces in a stylesheet, or the value of a
//! `style` attribute: `name: value` pairs separated by `;`.

use serde::Serialize;

/// One `name: value` pair. The name is lower-cased, both sides are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Lower-cased property name.
    pub name: String,
    /// Trimmed value text.
    pub value: String,
}

impl Declaration {
    /// Build a declaration, normalising the name.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.trim().to_ascii_lowercase(),
            value: value.trim().to_string(),
        }
    }
}

/// An ordered list of declarations in which each name appears once.
///
/// Pushing a name that is already present replaces the earlier value in
/// place, so a later pair in the same block wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeclarationBlock {
    declarations: Vec<Declaration>,
}

impl DeclarationBlock {
    /// Create an empty block.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// Add a declaration; a repeated name overrides the earlier value.
    pub fn push(&mut self, declaration: Declaration) {
        if let Some(existing) = self
            .declarations
            .iter_mut()
            .find(|d| d.name == declaration.name)
        {
            existing.value = declaration.value;
        } else {
            self.declarations.push(declaration);
        }
    }

    /// Value declared for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    /// Declarations in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Number of distinct names.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.declarations.len()
    }

    /// True if the block declares nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl FromIterator<Declaration> for DeclarationBlock {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        let mut block = Self::new();
        for declaration in iter {
            block.push(declaration);
        }
        block
    }
}

/// Remove `/* ... */` comments. An unterminated comment runs to the end.
#[must_use]
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Parse a declaration block.
///
/// Segments are split on `;`; each must look like `name : value` or it is
/// ignored. A trailing `!important` is dropped from the value.
#[must_use]
pub fn parse_declarations(text: &str) -> DeclarationBlock {
    strip_comments(text)
        .split(';')
        .filter_map(|segment| {
            let (name, value) = segment.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            let value = value
                .strip_suffix("!important")
                .map_or(value, str::trim_end);
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some(Declaration::new(name, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_block() {
        let block = parse_declarations("fill: red; Stroke : #00f ;");
        assert_eq!(block.len(), 2);
        assert_eq!(block.get("fill"), Some("red"));
        assert_eq!(block.get("stroke"), Some("#00f"));
    }

    #[test]
    fn test_later_pair_overrides_earlier() {
        let block = parse_declarations("fill: red; stroke: blue; fill: green");
        assert_eq!(block.get("fill"), Some("green"));
        let names: Vec<_> = block.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["fill", "stroke"]);
    }

    #[test]
    fn test_malformed_segments_are_ignored() {
        let block = parse_declarations("fill; : red; stroke:; opacity: 0.5");
        assert_eq!(block.len(), 1);
        assert_eq!(block.get("opacity"), Some("0.5"));
    }

    #[test]
    fn test_value_keeps_inner_colons_and_drops_important() {
        let block = parse_declarations("fill: url(#a) !important; font-family: 'a:b'");
        assert_eq!(block.get("fill"), Some("url(#a)"));
        assert_eq!(block.get("font-family"), Some("'a:b'"));
    }

    #[test]
    fn test_comments_are_stripped() {
        assert_eq!(strip_comments("a /* b */ c /* d"), "a  c ");
        let block = parse_declarations("/* lead */ fill: red /* tail */;");
        assert_eq!(block.get("fill"), Some("red"));
    }
}
