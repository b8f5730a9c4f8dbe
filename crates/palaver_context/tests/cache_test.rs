//! Tests for the context cache and instruction resolution.

use palaver_context::{ContextCache, Variable, resolve_instructions};
use palaver_error::PalaverErrorKind;
use std::sync::Arc;

const DOCUMENT: &str = r#"<context>
  <stage key="A" blocks="a"/>
  <stage key="B" blocks="b"/>
  <block key="a">Welcome {{username}}</block>
  <block key="b">Goodbye {{username}}</block>
</context>"#;

#[test]
fn test_cache_starts_empty_and_dedupes_by_content() {
    let cache = ContextCache::new();
    assert!(cache.is_empty());

    let first = cache.get_or_parse(DOCUMENT).expect("valid");
    let again = cache.get_or_parse(DOCUMENT).expect("valid");
    assert!(Arc::ptr_eq(&first, &again));

    let other = cache
        .get_or_parse(r#"<context><stage key="Z"/></context>"#)
        .expect("valid");
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_cache_clones_share_entries() {
    let cache = ContextCache::new();
    let shared = cache.clone();

    cache.get_or_parse(DOCUMENT).expect("valid");
    assert_eq!(shared.len(), 1);

    shared.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_parse_failures_are_not_cached() {
    let cache = ContextCache::new();
    assert!(cache.get_or_parse("<context><stage/></context>").is_err());
    assert!(cache.is_empty());
}

#[test]
fn test_resolve_compiles_documents() {
    let cache = ContextCache::new();
    let vars = [Variable::string("username", "Ana")];

    let text = resolve_instructions(DOCUMENT, Some("B"), &vars, &cache).expect("stage B");
    assert_eq!(text, "Goodbye Ana");

    let text = resolve_instructions(DOCUMENT, None, &vars, &cache).expect("first stage");
    assert_eq!(text, "Welcome Ana");
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_resolve_passes_plain_text_through() {
    let cache = ContextCache::new();
    let text = resolve_instructions("Be brief, {{username}}.", Some("A"), &[], &cache)
        .expect("plain text");

    assert_eq!(text, "Be brief, {{username}}.");
    assert!(cache.is_empty());
}

#[test]
fn test_resolve_reports_missing_stage_as_not_found() {
    let cache = ContextCache::new();
    let err = resolve_instructions(DOCUMENT, Some("Q"), &[], &cache).unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err.kind(), PalaverErrorKind::Compile(_)));
}

#[test]
fn test_resolve_reports_parse_errors() {
    let cache = ContextCache::new();
    let err = resolve_instructions("<context><oops></context>", None, &[], &cache).unwrap_err();

    assert!(matches!(err.kind(), PalaverErrorKind::Context(_)));
    assert!(!err.is_not_found());
}
