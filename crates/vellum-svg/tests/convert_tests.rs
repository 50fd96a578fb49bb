//! Integration tests for whole-document conversion.

use vellum_svg::{ConvertError, ConvertOptions, Opcode, Rendering, convert_str};

fn convert(svg: &str) -> Rendering {
    convert_str(svg, &ConvertOptions::default()).unwrap()
}

/// The call tree as indented text, one call per line.
fn text(rendering: &Rendering) -> String {
    rendering.calls.iter().map(ToString::to_string).collect()
}

fn count(rendering: &Rendering, opcode: Opcode) -> usize {
    rendering.calls.iter().filter(|c| c.opcode == opcode).count()
}

#[test]
fn test_single_rect() {
    let rendering = convert(r#"<svg width="100" height="50"><rect width="10" height="10"/></svg>"#);
    assert_eq!(
        text(&rendering),
        "save()\nfill()\n  rectangle([0, 0], 10, 10)\nrestore()\n"
    );
    assert!(rendering.warnings.is_empty());
    assert_eq!((rendering.width, rendering.height), (100.0, 50.0));
}

#[test]
fn test_canvas_size_defaults() {
    let rendering = convert(r#"<svg viewBox="0 0 40 20"/>"#);
    assert_eq!((rendering.width, rendering.height), (40.0, 20.0));

    let rendering = convert("<svg/>");
    assert_eq!((rendering.width, rendering.height), (300.0, 150.0));
}

#[test]
fn test_every_child_is_bracketed() {
    let rendering = convert(
        r#"<svg>
            <rect width="1" height="1"/>
            <rect width="1"/>
            <circle r="0"/>
            <g/>
        </svg>"#,
    );
    assert_eq!(count(&rendering, Opcode::Save), 4);
    assert_eq!(count(&rendering, Opcode::Restore), 4);
}

#[test]
fn test_recoverable_skip_leaves_one_warning() {
    let rendering = convert(r#"<svg><rect width="10"/></svg>"#);
    assert_eq!(text(&rendering), "save()\nrestore()\n");
    assert_eq!(
        rendering.warnings,
        vec!["Must have attributes width, height on tag rect; skipping tag"]
    );
}

#[test]
fn test_quiet_skip_has_no_warning() {
    let rendering = convert(r#"<svg><rect width="0" height="10"/><title>x</title></svg>"#);
    assert_eq!(text(&rendering), "save()\nrestore()\nsave()\nrestore()\n");
    assert!(rendering.warnings.is_empty());
}

#[test]
fn test_unknown_tag() {
    let rendering = convert(
        r#"<svg><circle r="1"/><text>hi</text><rect width="1" height="1"/></svg>"#,
    );
    assert_eq!(rendering.warnings, vec!["Unknown tag 'text'; ignoring"]);
    assert_eq!(
        text(&rendering),
        "save()\nfill()\n  circle([0, 0], 1)\nrestore()\nsave()\nfill()\n  rectangle([0, 0], 1, 1)\nrestore()\n"
    );
}

#[test]
fn test_skipped_subtree_is_discarded_whole() {
    let rendering = convert(
        r#"<svg>
            <svg width="oops"><rect width="1" height="1"/></svg>
            <path d="M0 0 A1 1 0 0 1 2 2"/>
        </svg>"#,
    );
    assert_eq!(text(&rendering), "save()\nrestore()\nsave()\nrestore()\n");
    assert_eq!(
        rendering.warnings,
        vec![
            "Invalid attributes on tag svg; skipping tag",
            "Arc commands in path data are not supported on tag path; skipping tag",
        ]
    );
}

#[test]
fn test_display_none_still_defines() {
    let rendering = convert(
        r#"<svg>
            <g style="display: none">
                <linearGradient id="g"><stop offset="0" stop-color="red"/></linearGradient>
                <rect width="5" height="5"/>
            </g>
            <rect width="10" height="10" fill="url(#g)"/>
        </svg>"#,
    );
    let output = text(&rendering);
    assert!(output.starts_with("save()\nrestore()\nsave()\nfill_gradient("));
    assert!(!output.contains("rectangle([0, 0], 5, 5)"));
    assert!(rendering.warnings.is_empty());
}

#[test]
fn test_unresolved_paint_turns_channel_off() {
    let rendering = convert(r#"<svg><rect width="10" height="10" fill="url(#missing)"/></svg>"#);
    assert_eq!(
        text(&rendering),
        "save()\nend_path()\n  rectangle([0, 0], 10, 10)\nrestore()\n"
    );
}

#[test]
fn test_paint_fallback_color() {
    let rendering =
        convert(r#"<svg><rect width="10" height="10" fill="url(#missing) red"/></svg>"#);
    assert!(text(&rendering).contains("fill_color(#ff0000)\nfill()\n"));
}

#[test]
fn test_stroke_gradient_with_one_stop() {
    let rendering = convert(
        r#"<svg>
            <defs><radialGradient id="g"><stop offset="1" stop-color="blue"/></radialGradient></defs>
            <rect width="10" height="10" fill="none" stroke="url(#g)"/>
        </svg>"#,
    );
    let output = text(&rendering);
    assert!(output.contains("stroke_gradient("));
    assert!(output.contains("stroke()\n  rectangle"));
    assert!(!output.contains("fill_color"));
}

#[test]
fn test_gradient_needs_box_in_bounding_box_units() {
    let rendering = convert(
        r#"<svg>
            <linearGradient id="g"><stop offset="0" stop-color="red"/></linearGradient>
            <g fill="url(#g)"><rect width="10" height="10"/></g>
        </svg>"#,
    );
    let output = text(&rendering);
    assert!(!output.contains("fill_gradient"));
    assert!(output.contains("end_path()\n  rectangle"));
}

#[test]
fn test_skipped_sibling_does_not_affect_others() {
    let rendering = convert(
        r#"<svg><g><rect width="1" height="1"/><path d="M0 0 A1 1 0 0 1 2 2"/></g></svg>"#,
    );
    assert_eq!(
        text(&rendering),
        "save()\nsave()\nfill()\n  rectangle([0, 0], 1, 1)\nrestore()\nsave()\nrestore()\nrestore()\n"
    );
}

#[test]
fn test_stylesheet_rules() {
    let rendering = convert(
        r#"<svg>
            <style>rect { fill: red } .blue { fill: blue }</style>
            <rect width="1" height="1"/>
            <rect class="blue" width="1" height="1" style="stroke: lime"/>
        </svg>"#,
    );
    let output = text(&rendering);
    assert!(output.contains("fill_color(#ff0000)"));
    assert!(output.contains("fill_color(#0000ff)\nstroke_color(#00ff00)\nfill_and_stroke()"));
}

#[test]
fn test_stroke_parameters() {
    let rendering = convert(
        r#"<svg><rect width="10" height="10" stroke="red" stroke-width="2"
            stroke-linecap="square" stroke-linejoin="bevel" stroke-dasharray="3"/></svg>"#,
    );
    assert!(text(&rendering).contains(
        "line_width(2)\ncap_style(:projecting_square)\njoin_style(:bevel)\ndash([3, 3])\nstroke_color(#ff0000)\nfill_and_stroke()"
    ));
}

#[test]
fn test_negative_dash_array() {
    let rendering = convert(
        r#"<svg><line x2="5" stroke="black" stroke-dasharray="2 -1"/></svg>"#,
    );
    assert!(text(&rendering).contains("undash()"));
    assert_eq!(
        rendering.warnings,
        vec!["stroke-dasharray cannot have negative numbers; treating as 'none'"]
    );
}

#[test]
fn test_opacity_accumulates() {
    let rendering = convert(
        r#"<svg><g opacity="0.5"><rect width="1" height="1" fill-opacity="0.5"/></g></svg>"#,
    );
    assert_eq!(
        text(&rendering),
        "save()\ntransparent(0.5, 0.5)\n  save()\n  transparent(0.25, 0.5)\n    fill()\n      rectangle([0, 0], 1, 1)\n  restore()\nrestore()\n"
    );
}

#[test]
fn test_transform() {
    let rendering = convert(
        r#"<svg><g transform="translate(5 6)"><circle r="2"/></g><g transform="spin(3)"/></svg>"#,
    );
    assert!(text(&rendering).starts_with("save()\ntransformation_matrix([1, 0, 0, 1, 5, 6])\n  save()\n  fill()\n    circle([0, 0], 2)\n"));
    assert_eq!(rendering.warnings, vec!["Invalid transform 'spin(3)' on tag g; ignoring"]);
}

#[test]
fn test_clip_path() {
    let rendering = convert(
        r#"<svg>
            <clipPath id="c"><rect width="5" height="5" fill="red"/></clipPath>
            <rect width="10" height="10" clip-path="url(#c)"/>
        </svg>"#,
    );
    assert_eq!(
        text(&rendering),
        "save()\nrestore()\nsave()\nsave()\nfill_color(#ff0000)\nrectangle([0, 0], 5, 5)\nrestore()\nclip()\nfill()\n  rectangle([0, 0], 10, 10)\nrestore()\n"
    );
}

#[test]
fn test_unresolved_clip_path_keeps_drawing() {
    let rendering = convert(r#"<svg><rect width="1" height="1" clip-path="url(#nope)"/></svg>"#);
    assert!(text(&rendering).contains("rectangle"));
    assert_eq!(
        rendering.warnings,
        vec!["Could not resolve clip-path URI to a clipPath element"]
    );
}

#[test]
fn test_use_translates_target() {
    let rendering = convert(
        r##"<svg><defs><circle id="dot" r="2"/></defs><use href="#dot" x="5" y="6"/></svg>"##,
    );
    assert_eq!(
        text(&rendering),
        "save()\nrestore()\nsave()\ntransformation_matrix([1, 0, 0, 1, 5, 6])\n  save()\n  fill()\n    circle([0, 0], 2)\n  restore()\nrestore()\n"
    );
}

#[test]
fn test_use_of_symbol_takes_children() {
    let rendering = convert(
        r##"<svg><symbol id="s"><rect width="1" height="1"/></symbol><use xlink:href="#s" xmlns:xlink="http://www.w3.org/1999/xlink"/></svg>"##,
    );
    assert!(text(&rendering).ends_with("save()\nsave()\nfill()\n  rectangle([0, 0], 1, 1)\nrestore()\nrestore()\n"));
}

#[test]
fn test_use_cycle_is_cut() {
    let rendering = convert(r##"<svg><g id="a"><use href="#a"/></g></svg>"##);
    assert_eq!(
        rendering.warnings,
        vec!["use tag references itself through its target; skipping tag"]
    );
}

#[test]
fn test_use_cycle_reports_only_the_cycle() {
    let rendering = convert(
        r##"<svg><g id="a"><use href="#a" transform="spin(1)" clip-path="url(#nope)"/></g></svg>"##,
    );
    // The first two come from the outer expansion of the same <use>.
    assert_eq!(
        rendering.warnings,
        vec![
            "Invalid transform 'spin(1)' on tag use; ignoring",
            "Could not resolve clip-path URI to a clipPath element",
            "use tag references itself through its target; skipping tag",
        ]
    );
}

fn pre_registered() -> ConvertOptions {
    ConvertOptions {
        pre_register_ids: true,
        ..ConvertOptions::default()
    }
}

#[test]
fn test_forward_clip_path_with_pre_pass() {
    let svg = r#"<svg>
        <rect width="10" height="10" clip-path="url(#c)"/>
        <clipPath id="c"><rect width="5" height="5"/></clipPath>
    </svg>"#;

    let rendering = convert(svg);
    assert_eq!(
        rendering.warnings,
        vec!["Could not resolve clip-path URI to a clipPath element"]
    );

    let rendering = convert_str(svg, &pre_registered()).unwrap();
    assert!(rendering.warnings.is_empty());
    assert_eq!(
        text(&rendering),
        "save()\nsave()\nrectangle([0, 0], 5, 5)\nrestore()\nclip()\nfill()\n  rectangle([0, 0], 10, 10)\nrestore()\nsave()\nrestore()\n"
    );
}

#[test]
fn test_forward_marker_with_pre_pass() {
    let svg = r#"<svg>
        <line x2="10" marker-end="url(#m)"/>
        <marker id="m"><rect width="1" height="1"/></marker>
    </svg>"#;
    let replayed = "transformation_matrix([1, 0, 0, 1, 10, 0])\n  save()\n  fill()\n    rectangle([0, 0], 1, 1)\n";

    assert!(!text(&convert(svg)).contains(replayed));

    let rendering = convert_str(svg, &pre_registered()).unwrap();
    assert!(text(&rendering).contains(replayed));
    assert!(rendering.warnings.is_empty());
}

#[test]
fn test_forward_reference_needs_pre_pass() {
    let svg = r##"<svg><use href="#later"/><rect id="later" width="1" height="1"/></svg>"##;

    let rendering = convert(svg);
    assert_eq!(
        rendering.warnings,
        vec!["no tag with ID 'later' was found, referenced by use tag"]
    );
    assert_eq!(count(&rendering, Opcode::Save), 2);

    let options = ConvertOptions {
        pre_register_ids: true,
        ..ConvertOptions::default()
    };
    let rendering = convert_str(svg, &options).unwrap();
    assert!(rendering.warnings.is_empty());
    assert_eq!(rendering.calls[1].opcode, Opcode::Save);
    assert_eq!(rendering.calls[2].opcode, Opcode::Fill);
}

#[test]
fn test_marker_end() {
    let rendering = convert(
        r##"<svg>
            <marker id="m"><rect width="1" height="1"/></marker>
            <line x2="10" marker-end="url(#m)"/>
        </svg>"##,
    );
    assert!(text(&rendering).contains(
        "fill()\n  move_to([0, 0])\n  line_to([10, 0])\nsave()\ntransformation_matrix([1, 0, 0, 1, 10, 0])\n  save()\n  fill()\n    rectangle([0, 0], 1, 1)\n  restore()\nrestore()\n"
    ));
}

#[test]
fn test_nested_viewport_clips() {
    let rendering = convert(
        r#"<svg width="100" height="100"><svg x="10" y="10" width="20" height="20"/></svg>"#,
    );
    assert_eq!(
        text(&rendering),
        "save()\nrectangle([10, 10], 20, 20)\nclip()\ntransformation_matrix([1, 0, 0, 1, 10, 10])\nrestore()\n"
    );
}

#[test]
fn test_depth_limit() {
    let options = ConvertOptions {
        max_depth: 2,
        ..ConvertOptions::default()
    };
    let rendering = convert_str(r#"<svg><g><g><rect width="1" height="1"/></g></g></svg>"#, &options)
        .unwrap();
    assert_eq!(
        rendering.warnings,
        vec!["Maximum nesting depth exceeded on tag g; skipping tag"]
    );
}

#[test]
fn test_root_must_be_svg() {
    let error = convert_str("<html/>", &ConvertOptions::default()).unwrap_err();
    assert!(matches!(error, ConvertError::NotSvg(ref tag) if tag == "html"));

    let error = convert_str("<svg", &ConvertOptions::default()).unwrap_err();
    assert!(matches!(error, ConvertError::Markup(_)));
}

#[test]
fn test_json_shape() {
    let rendering = convert(r#"<svg><rect width="2" height="3" fill="red"/></svg>"#);
    let json = serde_json::to_value(&rendering).unwrap();
    assert_eq!(json["calls"][0]["opcode"], "save");
    assert_eq!(json["calls"][1]["opcode"], "fill_color");
    assert_eq!(json["calls"][1]["arguments"][0], "ff0000");
    assert_eq!(json["calls"][2]["children"][0]["arguments"][0][0], 0.0);
    assert!(json["calls"][0].get("children").is_none());
    assert_eq!(json["warnings"], serde_json::json!([]));
}
