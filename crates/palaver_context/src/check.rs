//! Context document checks with actionable messages.
//!
//! Parsing accepts documents that compile to surprising text: a stage pointing
//! at a block that does not exist, a misspelled placeholder that is left in the
//! output verbatim. [`check_document`] reports those before a conversation
//! ever sees them.

use crate::Context;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Explicit variables supplied by the turn generator rather than the document.
const EXPLICIT_VARIABLES: &[&str] = &["username"];

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid placeholder pattern"));

/// Result of checking a context document.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Problems that make the document unusable
    pub errors: Vec<CheckIssue>,
    /// Problems that compile, but probably not as intended
    pub warnings: Vec<CheckIssue>,
}

impl CheckReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the report has no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Formats errors as numbered, human readable text.
    pub fn format_errors(&self) -> String {
        format_issues("Error", &self.errors)
    }

    /// Formats warnings as numbered, human readable text.
    pub fn format_warnings(&self) -> String {
        format_issues("Warning", &self.warnings)
    }
}

fn format_issues(label: &str, issues: &[CheckIssue]) -> String {
    let mut output = String::new();

    for (i, issue) in issues.iter().enumerate() {
        if i > 0 {
            output.push_str("\n\n");
        }
        output.push_str(&format!("{} {}: {}", label, i + 1, issue.message));

        if let Some(suggestion) = &issue.suggestion {
            output.push_str(&format!("\n\n  Suggestion: {}", suggestion));
        }
    }

    output
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIssue {
    /// What was found
    pub kind: CheckIssueKind,
    /// Human readable message
    pub message: String,
    /// How to fix it, when there is an obvious fix
    pub suggestion: Option<String>,
}

/// Kinds of findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckIssueKind {
    /// The document declares no stages
    NoStages,
    /// A stage lists a block key no block declares
    UndefinedBlock,
    /// A block no stage references
    UnusedBlock,
    /// A placeholder naming nothing the compiler substitutes
    UnknownPlaceholder,
    /// An enabled stage missing from `{{stages}}` because it has no description
    MissingStageDescription,
}

/// Checks a parsed document for broken references.
///
/// # Examples
///
/// ```
/// use palaver_context::{CheckIssueKind, Context, check_document};
///
/// let context: Context = r#"<context>
///   <stage key="A" blocks="intro, outro"/>
///   <block key="intro">Hello {{usrname}}</block>
/// </context>"#
///     .parse()
///     .expect("valid document");
///
/// let report = check_document(&context);
/// assert!(report.is_valid());
/// let kinds: Vec<_> = report.warnings.iter().map(|w| w.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![CheckIssueKind::UndefinedBlock, CheckIssueKind::UnknownPlaceholder]
/// );
/// ```
#[tracing::instrument(skip_all)]
pub fn check_document(context: &Context) -> CheckReport {
    let mut report = CheckReport::new();

    if context.stages.is_empty() {
        report.errors.push(CheckIssue {
            kind: CheckIssueKind::NoStages,
            message: "Context declares no stages".to_string(),
            suggestion: Some(
                "Add a stage, e.g. <stage key=\"intro\" description=\"...\" blocks=\"...\"/>"
                    .to_string(),
            ),
        });
    }

    let block_keys: HashSet<&str> = context.blocks.iter().map(|b| b.key.as_str()).collect();
    let mut referenced = HashSet::new();

    for stage in &context.stages {
        for key in &stage.block_keys {
            referenced.insert(key.as_str());
            if !block_keys.contains(key.as_str()) {
                let available = context
                    .blocks
                    .iter()
                    .map(|b| b.key.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                report.warnings.push(CheckIssue {
                    kind: CheckIssueKind::UndefinedBlock,
                    message: format!(
                        "Stage '{}' references block '{}' which is not defined",
                        stage.key, key
                    ),
                    suggestion: Some(format!("Defined blocks: {}", available)),
                });
            }
        }
    }

    for block in &context.blocks {
        if !referenced.contains(block.key.as_str()) {
            report.warnings.push(CheckIssue {
                kind: CheckIssueKind::UnusedBlock,
                message: format!("Block '{}' is not used by any stage", block.key),
                suggestion: None,
            });
        }
    }

    let variables: HashSet<&str> = context.variables.iter().map(|v| v.name.as_str()).collect();
    let stage_keys: HashSet<&str> = context.stages.iter().map(|s| s.key.as_str()).collect();
    let mut lists_stages = false;

    for block in &context.blocks {
        let mut reported = HashSet::new();
        for capture in PLACEHOLDER.captures_iter(&block.content) {
            let name = &capture[1];
            if name == "stages" {
                lists_stages = true;
                continue;
            }
            let known = name == "STAGES-RANGE"
                || variables.contains(name)
                || EXPLICIT_VARIABLES.contains(&name)
                || name
                    .strip_prefix("stage-")
                    .is_some_and(|key| stage_keys.contains(key));
            if !known && reported.insert(name.to_string()) {
                report.warnings.push(CheckIssue {
                    kind: CheckIssueKind::UnknownPlaceholder,
                    message: format!(
                        "Block '{}' uses placeholder '{{{{{}}}}}' which nothing substitutes",
                        block.key, name
                    ),
                    suggestion: Some(format!(
                        "Declare <variable name=\"{}\" type=\"string\" value=\"...\"/> or fix the spelling",
                        name
                    )),
                });
            }
        }
    }

    if lists_stages {
        for stage in context
            .stages
            .iter()
            .filter(|s| s.enabled && s.description.is_empty())
        {
            report.warnings.push(CheckIssue {
                kind: CheckIssueKind::MissingStageDescription,
                message: format!(
                    "Stage '{}' is enabled but has no description, so {{{{stages}}}} leaves it out",
                    stage.key
                ),
                suggestion: Some("Add a description attribute".to_string()),
            });
        }
    }

    tracing::debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "Checked context document"
    );
    report
}
