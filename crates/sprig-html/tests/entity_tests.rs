//! Integration tests for character reference lookup, decoding and escaping.

use quickcheck_macros::quickcheck;
use sprig_html::tokenizer::named_character_references::{any_entity_has_prefix, lookup_entity};
use sprig_html::{decode_entities, escape_html, parse};

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("lt;"), Some("<"));
    assert_eq!(lookup_entity("gt;"), Some(">"));
    assert_eq!(lookup_entity("quot;"), Some("\""));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
    assert_eq!(lookup_entity("shy;"), Some("\u{00AD}"));
}

#[test]
fn test_lookup_legacy_and_unknown() {
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("lt"), Some("<"));
    assert_eq!(lookup_entity("shy"), None);
    assert_eq!(lookup_entity("notarealentity;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_prefix_matching() {
    assert!(any_entity_has_prefix("s")); // shy, sect, sigma
    assert!(any_entity_has_prefix("amp"));
    assert!(!any_entity_has_prefix("zzz"));
}

#[test]
fn test_text_nodes_are_decoded() {
    let tree = parse("<p>Fish &amp; Chips &lt;3</p>");
    assert_eq!(tree.text_content(tree.root()), "Fish & Chips <3");
}

#[test]
fn test_view_source_style_round_trip() {
    let source = "<p class=\"x\">a < b && c > d</p>";
    let escaped = escape_html(source);
    assert!(!escaped.contains('<'));
    assert!(!escaped.contains('>'));

    // Escaped markup parses as plain text equal to the source.
    let tree = parse(&format!("<body>{escaped}</body>"));
    assert_eq!(tree.text_content(tree.root()), source);
}

#[quickcheck]
fn prop_escape_then_decode_is_identity(text: String) -> bool {
    decode_entities(&escape_html(&text)) == text
}

#[quickcheck]
fn prop_escaped_text_has_no_markup(text: String) -> bool {
    let escaped = escape_html(&text);
    !escaped.contains('<') && !escaped.contains('>') && !escaped.contains('"')
}
