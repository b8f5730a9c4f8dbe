//! Tests for context document checks.

use palaver_context::{CheckIssueKind, Context, check_document};

fn context(markup: &str) -> Context {
    markup.parse().expect("valid document")
}

#[test]
fn test_clean_document() {
    let ctx = context(
        r#"<context>
             <variable name="topic" type="string" value="billing"/>
             <stage key="A" description="Ask" blocks="ask"/>
             <stage key="B" description="Answer" blocks="answer"/>
             <block key="ask">Hi {{username}}, about {{topic}}? {{stage-A}}</block>
             <block key="answer">{{stages}} ({{STAGES-RANGE}})</block>
           </context>"#,
    );

    let report = check_document(&ctx);
    assert!(report.is_valid(), "errors: {}", report.format_errors());
    assert!(
        report.warnings.is_empty(),
        "warnings: {}",
        report.format_warnings()
    );
}

#[test]
fn test_no_stages_is_an_error() {
    let report = check_document(&context("<context/>"));

    assert!(!report.is_valid());
    assert_eq!(report.errors[0].kind, CheckIssueKind::NoStages);
    assert!(report.errors[0].suggestion.is_some());
    assert!(report.format_errors().starts_with("Error 1: "));
}

#[test]
fn test_undefined_block_warning_lists_defined_blocks() {
    let ctx = context(
        r#"<context>
             <stage key="A" blocks="intro, missing"/>
             <block key="intro">x</block>
           </context>"#,
    );

    let report = check_document(&ctx);
    assert!(report.is_valid());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, CheckIssueKind::UndefinedBlock);
    assert!(report.warnings[0].message.contains("'missing'"));
    assert_eq!(
        report.warnings[0].suggestion.as_deref(),
        Some("Defined blocks: intro")
    );
}

#[test]
fn test_unused_block_warning() {
    let ctx = context(
        r#"<context>
             <stage key="A" blocks="used"/>
             <block key="used">x</block>
             <block key="orphan">y</block>
           </context>"#,
    );

    let report = check_document(&ctx);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, CheckIssueKind::UnusedBlock);
    assert!(report.warnings[0].message.contains("orphan"));
}

#[test]
fn test_unknown_placeholder_reported_once_per_block() {
    let ctx = context(
        r#"<context>
             <stage key="A" blocks="a"/>
             <block key="a">{{nope}} {{nope}} {{stage-Q}}</block>
           </context>"#,
    );

    let report = check_document(&ctx);
    let unknown: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.kind == CheckIssueKind::UnknownPlaceholder)
        .map(|w| w.message.as_str())
        .collect();
    assert_eq!(unknown.len(), 2, "got {:?}", unknown);
    assert!(unknown[0].contains("{{nope}}"));
    assert!(unknown[1].contains("{{stage-Q}}"));
}

#[test]
fn test_stage_listing_missing_description() {
    let ctx = context(
        r#"<context>
             <stage key="A" description="Listed" blocks="list"/>
             <stage key="B"/>
             <stage key="C" enabled="false"/>
             <block key="list">{{stages}}</block>
           </context>"#,
    );

    let report = check_document(&ctx);
    let missing: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.kind == CheckIssueKind::MissingStageDescription)
        .collect();
    assert_eq!(missing.len(), 1);
    assert!(missing[0].message.contains("'B'"));
}

#[test]
fn test_format_warnings_numbers_each_entry() {
    let ctx = context(
        r#"<context>
             <stage key="A" blocks="ghost"/>
             <block key="orphan">y</block>
           </context>"#,
    );

    let text = check_document(&ctx).format_warnings();
    assert!(text.contains("Warning 1: Stage 'A' references block 'ghost'"));
    assert!(text.contains("Suggestion: Defined blocks: orphan"));
    assert!(text.contains("Warning 2: Block 'orphan' is not used"));
}
