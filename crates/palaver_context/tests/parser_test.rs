//! Tests for context document parsing.

use palaver_context::{Context, VariableType, VariableValue, parse_context};
use palaver_error::ContextErrorKind;

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- onboarding flow -->
<context>
  <info>
    <version>2.1</version>
    <date>2024-05-01</date>
    <description>Onboarding &amp; triage</description>
  </info>
  <variable name="username" type="string" value="friend"/>
  <variable name="attempts" type="number" value="3"/>
  <variable name="strict" type="boolean" value="true"/>
  <stage key="greet" description="Say hello" blocks="persona, greeting"/>
  <stage key="triage" description="Sort the problem" blocks=" persona ,, triage " enabled="no"/>
  <stage key="wrap"/>
  <block key="persona">
    You are a patient guide.
  </block>
  <block key="greeting"><![CDATA[Hello <b>{{username}}</b>]]></block>
  <block key="triage">Ask at most {{attempts}} questions.</block>
</context>"#;

#[test]
fn test_parse_full_document() {
    let context = parse_context(DOCUMENT).expect("valid document");

    assert_eq!(context.version, "2.1");
    assert_eq!(context.date, "2024-05-01");
    assert_eq!(context.description, "Onboarding & triage");

    let keys: Vec<_> = context.stages.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["greet", "triage", "wrap"]);

    let triage = context.stage("triage").expect("triage stage");
    assert_eq!(triage.block_keys, vec!["persona", "triage"]);
    assert!(!triage.enabled);

    let wrap = context.stage("wrap").expect("wrap stage");
    assert!(wrap.description.is_empty());
    assert!(wrap.block_keys.is_empty());
    assert!(wrap.enabled);

    assert_eq!(
        context.block("persona").map(|b| b.content.as_str()),
        Some("You are a patient guide.")
    );
    assert_eq!(
        context.block("greeting").map(|b| b.content.as_str()),
        Some("Hello <b>{{username}}</b>")
    );
}

#[test]
fn test_variable_coercion() {
    let context = parse_context(DOCUMENT).expect("valid document");

    let values: Vec<_> = context
        .variables
        .iter()
        .map(|v| (v.name.as_str(), v.value.clone()))
        .collect();
    assert_eq!(
        values,
        vec![
            ("username", VariableValue::String("friend".to_string())),
            ("attempts", VariableValue::Number(3.0)),
            ("strict", VariableValue::Boolean(true)),
        ]
    );
}

#[test]
fn test_single_and_repeated_elements_normalize_to_lists() {
    let single = parse_context(r#"<context><stage key="only"/></context>"#).expect("valid");
    assert_eq!(single.stages.len(), 1);

    let many = parse_context(
        r#"<context><stage key="a"/><block key="x"/><stage key="b"/><stage key="c"/></context>"#,
    )
    .expect("valid");
    let keys: Vec<_> = many.stages.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_eq!(many.blocks.len(), 1);
    assert!(many.blocks[0].content.is_empty());
}

#[test]
fn test_bad_number_is_nan_not_an_error() {
    let context = parse_context(
        r#"<context>
             <variable name="n" type="number" value="lots"/>
             <variable name="missing" type="number"/>
             <variable name="flag" type="boolean" value="TRUE"/>
           </context>"#,
    )
    .expect("valid");

    assert!(matches!(context.variables[0].value, VariableValue::Number(n) if n.is_nan()));
    assert!(matches!(context.variables[1].value, VariableValue::Number(n) if n.is_nan()));
    assert_eq!(context.variables[2].value, VariableValue::Boolean(false));
    assert_eq!(context.variables[2].var_type(), VariableType::Boolean);
}

#[test]
fn test_missing_info_is_tolerated() {
    let context = parse_context(r#"<context><stage key="A"/></context>"#).expect("valid");
    assert!(context.version.is_empty());
    assert!(context.date.is_empty());
    assert!(context.description.is_empty());
}

#[test]
fn test_unknown_root_is_rejected() {
    let err = parse_context("<narrative><stage key=\"A\"/></narrative>").unwrap_err();
    assert_eq!(err.kind, ContextErrorKind::MissingRoot("narrative".to_string()));
}

#[test]
fn test_malformed_markup_is_rejected() {
    let err = parse_context("<context><stage key=\"A\"></context>").unwrap_err();
    assert!(matches!(err.kind, ContextErrorKind::Xml(_)), "got {:?}", err.kind);
}

#[test]
fn test_missing_required_attributes() {
    let err = parse_context(r#"<context><stage description="x"/></context>"#).unwrap_err();
    assert_eq!(
        err.kind,
        ContextErrorKind::MissingAttribute {
            element: "stage".to_string(),
            attribute: "key".to_string(),
        }
    );

    let err = parse_context(r#"<context><variable name="v"/></context>"#).unwrap_err();
    assert_eq!(
        err.kind,
        ContextErrorKind::MissingAttribute {
            element: "variable".to_string(),
            attribute: "type".to_string(),
        }
    );
}

#[test]
fn test_unknown_variable_type() {
    let err =
        parse_context(r#"<context><variable name="when" type="date" value="x"/></context>"#)
            .unwrap_err();
    assert_eq!(
        err.kind,
        ContextErrorKind::UnknownVariableType {
            name: "when".to_string(),
            declared: "date".to_string(),
        }
    );
}

#[test]
fn test_duplicate_keys_are_rejected() {
    let err = parse_context(r#"<context><stage key="A"/><stage key="A"/></context>"#).unwrap_err();
    assert_eq!(err.kind, ContextErrorKind::DuplicateStage("A".to_string()));

    let err =
        parse_context(r#"<context><block key="b">1</block><block key="b">2</block></context>"#)
            .unwrap_err();
    assert_eq!(err.kind, ContextErrorKind::DuplicateBlock("b".to_string()));
}

#[test]
fn test_round_trip_preserves_structure() {
    let original = parse_context(DOCUMENT).expect("valid document");
    let markup = original.to_markup().expect("writable");
    let reparsed: Context = markup.parse().expect("reparse");

    assert_eq!(original, reparsed);
}

#[test]
fn test_round_trip_escapes_markup_in_content() {
    let original = parse_context(
        r#"<context>
             <stage key="A" description="a &lt; b &amp; &quot;c&quot;" blocks="x"/>
             <block key="x"><![CDATA[tricky ]]]]><![CDATA[> end]]></block>
           </context>"#,
    )
    .expect("valid");
    assert_eq!(original.blocks[0].content, "tricky ]]> end");

    let reparsed = parse_context(&original.to_markup().expect("writable")).expect("reparse");
    assert_eq!(original, reparsed);
    assert_eq!(reparsed.stages[0].description, "a < b & \"c\"");
}

#[test]
fn test_context_serializes_typed_variables() {
    let context = parse_context(DOCUMENT).expect("valid document");
    let json = serde_json::to_value(&context.variables[1]).expect("serializable");
    assert_eq!(
        json,
        serde_json::json!({"name": "attempts", "type": "number", "value": 3.0})
    );
}
