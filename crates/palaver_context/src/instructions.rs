//! Instruction text resolution.

use crate::{ContextCache, Variable, compile};
use palaver_error::PalaverResult;

/// Returns true if the instruction text is a context document rather than plain text.
///
/// ```
/// use palaver_context::is_context_document;
///
/// assert!(is_context_document("  <context><stage key=\"A\"/></context>"));
/// assert!(is_context_document("<?xml version=\"1.0\"?><context/>"));
/// assert!(!is_context_document("You are a helpful assistant."));
/// ```
pub fn is_context_document(raw: &str) -> bool {
    let trimmed = raw.trim_start();
    trimmed.starts_with("<context") || trimmed.starts_with("<?xml")
}

/// Resolves stored instructions into the text sent to the model.
///
/// Context documents are parsed through `cache` and compiled for `stage`.
/// Plain text is returned unchanged.
pub fn resolve_instructions(
    raw: &str,
    stage: Option<&str>,
    variables: &[Variable],
    cache: &ContextCache,
) -> PalaverResult<String> {
    if !is_context_document(raw) {
        return Ok(raw.to_string());
    }

    let context = cache.get_or_parse(raw)?;
    Ok(compile(&context, stage, variables)?)
}
