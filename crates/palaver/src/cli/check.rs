//! Check command handler.

use super::{OutputFormat, load_document};
use palaver_context::{CheckIssue, CheckReport, check_document};
use serde_json::json;
use std::path::Path;

/// Handles the check command.
///
/// Exits with status 1 when the document parses but has errors.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn handle_check_command(path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let (_, context) = load_document(path)?;
    let report = check_document(&context);
    tracing::info!(
        stages = context.stages.len(),
        blocks = context.blocks.len(),
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "Checked document"
    );

    match format {
        OutputFormat::Human => output_human(path, &report),
        OutputFormat::Json => output_json(path, &report)?,
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}

fn output_human(path: &Path, report: &CheckReport) {
    let status_icon = if !report.is_valid() {
        "❌"
    } else if !report.warnings.is_empty() {
        "⚠️"
    } else {
        "✅"
    };

    println!("\n{} {}", status_icon, path.display());
    println!("{}", "─".repeat(80));

    if !report.errors.is_empty() {
        println!("\n{}", report.format_errors());
    }
    if !report.warnings.is_empty() {
        println!("\n{}", report.format_warnings());
    }
    if report.is_valid() && report.warnings.is_empty() {
        println!("\n  No issues found");
    }
}

fn issue_json(issue: &CheckIssue) -> serde_json::Value {
    json!({
        "kind": format!("{:?}", issue.kind),
        "message": issue.message,
        "suggestion": issue.suggestion,
    })
}

fn output_json(path: &Path, report: &CheckReport) -> anyhow::Result<()> {
    let output = json!({
        "file": path.display().to_string(),
        "valid": report.is_valid(),
        "errors": report.errors.iter().map(issue_json).collect::<Vec<_>>(),
        "warnings": report.warnings.iter().map(issue_json).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
