//! Compile command handler.

use super::load_document;
use anyhow::anyhow;
use palaver_context::{Variable, compile};
use std::path::Path;

/// Handles the compile command.
#[tracing::instrument(skip_all, fields(path = %path.display(), stage = ?stage))]
pub fn handle_compile_command(
    path: &Path,
    stage: Option<&str>,
    vars: &[String],
) -> anyhow::Result<()> {
    let (_, context) = load_document(path)?;
    let variables = vars
        .iter()
        .map(|raw| parse_variable(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let text = compile(&context, stage, &variables)?;
    println!("{}", text);
    Ok(())
}

/// Splits `name=value` at the first `=`.
fn parse_variable(raw: &str) -> anyhow::Result<Variable> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Variable '{}' must look like name=value", raw))?;
    if name.trim().is_empty() {
        return Err(anyhow!("Variable '{}' has an empty name", raw));
    }
    Ok(Variable::string(name.trim(), value))
}
