//! Integration tests for the cascade and computed properties.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use vellum_css::{ComputedProperties, Property, Stylesheet, parse_stylesheet, resolve_style};
use vellum_dom::{AttributesMap, ElementData};

/// Helper to create element data
fn make_element(tag: &str, id: Option<&str>, classes: &[&str], style: Option<&str>) -> ElementData {
    let mut attrs = AttributesMap::new();
    if let Some(id_val) = id {
        let _ = attrs.insert("id", id_val);
    }
    if !classes.is_empty() {
        let _ = attrs.insert("class", classes.join(" "));
    }
    if let Some(style) = style {
        let _ = attrs.insert("style", style);
    }
    ElementData {
        tag_name: tag.to_string(),
        attrs,
    }
}

fn hex(value: u32) -> String {
    format!("#{:06x}", value & 0x00ff_ffff)
}

#[test]
fn test_full_precedence_chain() {
    let sheet = parse_stylesheet(
        "#logo { fill: #444444 } rect { fill: #111111; stroke: #111111; opacity: 0.1 } \
         .a { fill: #222222; stroke: #222222 } .b { fill: #333333 }",
    );
    let mut element = make_element("rect", Some("logo"), &["a", "b"], Some("fill: #555555"));
    let _ = element.attrs.insert("fill", "#000000");
    let _ = element.attrs.insert("stroke-width", "4");

    let resolved = resolve_style(&element, &sheet);
    assert_eq!(resolved.properties.get(Property::Fill), Some("#555555"));
    assert_eq!(resolved.properties.get(Property::Stroke), Some("#222222"));
    assert_eq!(resolved.properties.get(Property::Opacity), Some("0.1"));
    assert_eq!(resolved.properties.get(Property::StrokeWidth), Some("4"));
}

#[test]
fn test_id_beats_class() {
    let sheet = parse_stylesheet("#x { stroke: red } .c { stroke: blue }");
    let element = make_element("circle", Some("x"), &["c"], None);
    let resolved = resolve_style(&element, &sheet);
    assert_eq!(resolved.properties.get(Property::Stroke), Some("red"));
}

#[test]
fn test_computed_inheritance_through_cascade() {
    let sheet = parse_stylesheet("g { fill: red; opacity: 0.5 }");
    let group = make_element("g", None, &[], None);
    let rect = make_element("rect", None, &[], None);

    let mut group_computed = ComputedProperties::default();
    group_computed.compute(&resolve_style(&group, &sheet).properties);

    let mut rect_computed = group_computed.clone();
    rect_computed.compute(&resolve_style(&rect, &sheet).properties);

    // fill inherits, opacity does not
    assert_eq!(rect_computed.get(Property::Fill), "red");
    assert_eq!(rect_computed.get(Property::Opacity), "1");
}

#[test]
fn test_empty_stylesheet_keeps_attributes() {
    let element = make_element("rect", None, &[], None);
    let resolved = resolve_style(&element, &Stylesheet::default());
    assert!(resolved.properties.is_empty());
}

#[quickcheck]
fn prop_inline_style_wins_over_tag_and_class(a: u32, b: u32, c: u32) -> TestResult {
    let (a, b, c) = (hex(a), hex(b), hex(c));
    if a == b || b == c || a == c {
        return TestResult::discard();
    }

    let sheet = parse_stylesheet(&format!("rect {{ fill: {a} }} .k {{ fill: {b} }}"));
    let element = make_element("rect", None, &["k"], Some(format!("fill: {c}").as_str()));

    let mut computed = ComputedProperties::default();
    computed.compute(&resolve_style(&element, &sheet).properties);
    TestResult::from_bool(computed.get(Property::Fill) == c)
}

#[quickcheck]
fn prop_class_wins_over_tag(a: u32, b: u32) -> TestResult {
    let (a, b) = (hex(a), hex(b));
    if a == b {
        return TestResult::discard();
    }

    let sheet = parse_stylesheet(&format!(".k {{ stroke: {b} }} rect {{ stroke: {a} }}"));
    let element = make_element("rect", None, &["k"], None);
    let resolved = resolve_style(&element, &sheet);
    TestResult::from_bool(resolved.properties.get(Property::Stroke) == Some(b.as_str()))
}
