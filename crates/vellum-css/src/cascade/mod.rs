//! Cascade Resolver
//!
//! Merges the ordered style sources of one element into its property bag.
//! Precedence, lowest to highest:
//!
//! 1. presentation attributes (`fill="red"`)
//! 2. the tag-name selector block (`rect { ... }`)
//! 3. each class selector block, in class-list order (`.a { ... }`)
//! 4. the id selector block (`#logo { ... }`)
//! 5. the inline `style` attribute
//!
//! A higher source overwrites a same-named entry entirely; shorthand values
//! are never merged.

use vellum_dom::{AttributesMap, ElementData};

use crate::declaration::{DeclarationBlock, parse_declarations};
use crate::property::Properties;
use crate::stylesheet::StyleSource;

/// The result of running the cascade over one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    /// Structural attributes (x, y, width, id, class, transform, ...).
    pub attributes: AttributesMap,
    /// Style properties after the merge, still unresolved.
    pub properties: Properties,
}

/// Split an element's attributes and merge every style source into its
/// property bag.
#[must_use]
pub fn resolve_style(element: &ElementData, source: &dyn StyleSource) -> ResolvedStyle {
    let mut resolved = ResolvedStyle::default();

    for (name, value) in element.attrs.iter() {
        if !resolved.properties.set(name, value) {
            let _ = resolved.attributes.insert(name, value);
        }
    }

    for block in selector_blocks(element, source) {
        load_block(&mut resolved.properties, block);
    }

    if let Some(style) = element.attrs.get("style") {
        load_block(&mut resolved.properties, &parse_declarations(style));
    }

    resolved
}

/// Blocks from the style source in ascending precedence: tag, classes, id.
fn selector_blocks<'s>(element: &ElementData, source: &'s dyn StyleSource) -> Vec<&'s DeclarationBlock> {
    let mut blocks = source.find_by_selector(&element.tag_name);
    for class in element.classes() {
        blocks.extend(source.find_by_selector(&format!(".{class}")));
    }
    if let Some(id) = element.id() {
        blocks.extend(source.find_by_selector(&format!("#{id}")));
    }
    blocks
}

/// Unknown declaration names are dropped; they never become attributes.
fn load_block(properties: &mut Properties, block: &DeclarationBlock) {
    for declaration in block.iter() {
        let _ = properties.set(&declaration.name, &declaration.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property;
    use crate::stylesheet::{Stylesheet, parse_stylesheet};

    #[test]
    fn test_attributes_partition() {
        let element = ElementData::new(
            "rect",
            [("x", "1"), ("fill", "red"), ("transform", "scale(2)"), ("stroke-width", "3")],
        );
        let resolved = resolve_style(&element, &Stylesheet::default());

        assert_eq!(resolved.attributes.keys().collect::<Vec<_>>(), vec!["x", "transform"]);
        assert_eq!(resolved.properties.get(Property::Fill), Some("red"));
        assert_eq!(resolved.properties.get(Property::StrokeWidth), Some("3"));
    }

    #[test]
    fn test_presentation_attribute_is_lowest_precedence() {
        let sheet = parse_stylesheet("rect { fill: blue }");
        let element = ElementData::new("rect", [("fill", "red")]);
        let resolved = resolve_style(&element, &sheet);
        assert_eq!(resolved.properties.get(Property::Fill), Some("blue"));
    }

    #[test]
    fn test_classes_apply_in_listed_order() {
        let sheet = parse_stylesheet(".a { fill: red } .b { fill: blue }");

        let ab = ElementData::new("rect", [("class", "a b")]);
        assert_eq!(resolve_style(&ab, &sheet).properties.get(Property::Fill), Some("blue"));

        let ba = ElementData::new("rect", [("class", "b a")]);
        assert_eq!(resolve_style(&ba, &sheet).properties.get(Property::Fill), Some("red"));
    }

    #[test]
    fn test_unknown_declarations_are_dropped() {
        let element = ElementData::new("rect", [("style", "width: 10px; fill: red")]);
        let resolved = resolve_style(&element, &Stylesheet::default());
        assert!(!resolved.attributes.contains_key("width"));
        assert_eq!(resolved.properties.len(), 1);
    }
}
