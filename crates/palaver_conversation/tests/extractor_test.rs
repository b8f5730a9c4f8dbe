//! Tests for embedded metadata extraction.

use palaver_conversation::extract_metadata;
use serde_json::{Value, json};

#[test]
fn test_metadata_before_text() {
    let extracted = extract_metadata("<metadata>{\"k\":1}</metadata>Hello");

    assert_eq!(extracted.content, "Hello");
    assert_eq!(extracted.metadata.map(Value::Object), Some(json!({ "k": 1 })));
}

#[test]
fn test_text_without_tag_is_trimmed() {
    let extracted = extract_metadata("  Just text \n");

    assert_eq!(extracted.content, "Just text");
    assert!(extracted.metadata.is_none());
}

#[test]
fn test_tag_in_the_middle_spanning_lines() {
    let raw = "Before\n<metadata>\n{\"mood\": \"happy\",\n \"score\": 3}\n</metadata>\nAfter";

    let extracted = extract_metadata(raw);

    assert_eq!(extracted.content, "Before\n\nAfter");
    assert_eq!(
        extracted.metadata.map(Value::Object),
        Some(json!({ "mood": "happy", "score": 3 }))
    );
}

#[test]
fn test_invalid_json_still_strips_tag() {
    let extracted = extract_metadata("<metadata>{not json}</metadata> Visible");

    assert_eq!(extracted.content, "Visible");
    assert!(extracted.metadata.is_none());
}

#[test]
fn test_non_object_json_is_dropped() {
    let extracted = extract_metadata("<metadata>[1, 2]</metadata>Visible");

    assert_eq!(extracted.content, "Visible");
    assert!(extracted.metadata.is_none());
}

#[test]
fn test_only_first_tag_is_consumed() {
    let extracted =
        extract_metadata("<metadata>{\"a\":1}</metadata>text<metadata>{\"b\":2}</metadata>");

    assert_eq!(extracted.content, "text<metadata>{\"b\":2}</metadata>");
    assert_eq!(extracted.metadata.map(Value::Object), Some(json!({ "a": 1 })));
}
