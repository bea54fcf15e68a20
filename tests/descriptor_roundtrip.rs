//! Descriptor parse/serialize integration tests

mod helper;

use rstest::rstest;

use godotkit::descriptor::{self, ParseError, ParseErrorReason, TypedValue};
use helper::{GODOT_3_PROJECT, GODOT_4_PROJECT};

#[rstest]
#[case::godot_4(GODOT_4_PROJECT)]
#[case::godot_3_crlf(GODOT_3_PROJECT)]
#[case::empty("")]
#[case::only_comments("; comment\n\n# another\n")]
fn serialize_reproduces_parsed_text(#[case] text: &str) {
    let document = descriptor::parse(text).unwrap();

    assert_eq!(descriptor::serialize(&document), text);
}

#[test]
fn parse_exposes_godot_4_settings() {
    let document = descriptor::parse(GODOT_4_PROJECT).unwrap();

    assert_eq!(
        document.section_names().collect::<Vec<_>>(),
        vec!["application", "display", "input", "rendering"]
    );
    assert_eq!(
        document.get("", "config_version").and_then(TypedValue::as_i64),
        Some(5)
    );
    assert_eq!(
        document
            .get("display", "window/size/viewport_height")
            .and_then(TypedValue::as_i64),
        Some(720)
    );

    let move_left = document
        .get("input", "move_left")
        .and_then(TypedValue::as_mapping)
        .unwrap();
    assert_eq!(move_left.get("deadzone").and_then(TypedValue::as_f64), Some(0.5));
    let events = move_left.get("events").and_then(TypedValue::as_array).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events.get(1).and_then(TypedValue::as_literal).map(|l| l.name()),
        Some("Object")
    );

    let color = document
        .get("rendering", "environment/defaults/default_clear_color")
        .and_then(TypedValue::as_literal)
        .unwrap();
    assert_eq!(color.name(), "Color");
    assert_eq!(color.args().collect::<Vec<_>>(), vec!["0.301961", "0.301961", "0.301961", "1"]);
}

#[test]
fn set_changes_only_the_target_line() {
    let mut document = descriptor::parse(GODOT_4_PROJECT).unwrap();

    document.set("display", "window/size/viewport_width", TypedValue::integer(640));

    assert_eq!(
        descriptor::serialize(&document),
        GODOT_4_PROJECT.replace("viewport_width=480", "viewport_width=640")
    );
}

#[test]
fn set_on_crlf_document_keeps_line_endings_of_other_lines() {
    let mut document = descriptor::parse(GODOT_3_PROJECT).unwrap();

    document.set("application", "config/name", TypedValue::string("Renamed"));

    assert_eq!(
        descriptor::serialize(&document),
        GODOT_3_PROJECT.replace("\"Legacy\"", "\"Renamed\"")
    );
}

#[test]
fn parse_reports_unterminated_string_position() {
    let result = descriptor::parse("[section\nkey = \"unterminated");

    assert_eq!(
        result,
        Err(ParseError {
            line: 2,
            column: 7,
            reason: ParseErrorReason::UnterminatedString,
        })
    );
}

#[test]
fn parse_rejects_duplicate_sections() {
    let text = "[application]\nconfig/name=\"a\"\n\n[application]\n";

    let error = descriptor::parse(text).unwrap_err();

    assert_eq!(error.line, 4);
    assert_eq!(
        error.reason,
        ParseErrorReason::DuplicateSection("application".to_string())
    );
}
