//! Stage instruction compilation.

use crate::{Context, Stage, Variable};
use palaver_error::{CompileError, CompileErrorKind};

const STAGES_DIRECTIVE: &str = "{{stages}}";
const STAGES_RANGE_DIRECTIVE: &str = "{{STAGES-RANGE}}";

/// Compiles the instruction text for one stage.
///
/// The stage defaults to the first stage in document order. Its blocks are
/// joined with newlines, then placeholders are substituted in a fixed order:
///
/// 1. `explicit` variables supplied by the caller
/// 2. variables declared by the document
/// 3. `{{stages}}`, `{{stage-<key>}}` and `{{STAGES-RANGE}}` directives
///
/// Placeholders that match none of these are left as written.
///
/// # Errors
///
/// Returns a not-found class [`CompileError`] when the document has no stages
/// or `stage_key` names none of them.
///
/// # Examples
///
/// ```
/// use palaver_context::{Context, Variable, compile};
///
/// let context: Context = r#"<context>
///   <stage key="A" description="first" blocks="intro"/>
///   <stage key="B" description="second" blocks="intro"/>
///   <block key="intro">Hi {{username}}, stages {{STAGES-RANGE}}</block>
/// </context>"#
///     .parse()
///     .expect("valid document");
///
/// let text = compile(&context, Some("A"), &[Variable::string("username", "Ana")])
///     .expect("stage exists");
/// assert_eq!(text, "Hi Ana, stages A-B");
/// assert!(compile(&context, Some("C"), &[]).unwrap_err().is_not_found());
/// ```
#[tracing::instrument(skip(context, explicit), fields(explicit = explicit.len()))]
pub fn compile(
    context: &Context,
    stage_key: Option<&str>,
    explicit: &[Variable],
) -> Result<String, CompileError> {
    let stage = resolve_stage(context, stage_key)?;

    let body = stage
        .block_keys
        .iter()
        .map(|key| {
            context
                .block(key)
                .map(|block| block.content.as_str())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join("\n");

    let text = substitute_variables(&body, explicit);
    let text = substitute_variables(&text, &context.variables);
    let text = apply_directives(&text, context, stage);

    tracing::debug!(stage = %stage.key, len = text.len(), "Compiled stage instructions");
    Ok(text)
}

impl Context {
    /// Compiles instructions for a stage, see [`compile`].
    pub fn compile(
        &self,
        stage_key: Option<&str>,
        explicit: &[Variable],
    ) -> Result<String, CompileError> {
        compile(self, stage_key, explicit)
    }
}

fn resolve_stage<'a>(
    context: &'a Context,
    stage_key: Option<&str>,
) -> Result<&'a Stage, CompileError> {
    let Some(first) = context.first_stage() else {
        return Err(CompileError::new(CompileErrorKind::NoStages));
    };

    match stage_key.filter(|key| !key.is_empty()) {
        None => Ok(first),
        Some(key) => context
            .stage(key)
            .ok_or_else(|| CompileError::new(CompileErrorKind::StageNotFound(key.to_string()))),
    }
}

/// Replaces every `{{name}}` occurrence for each variable, in slice order.
///
/// Each variable is applied to the text produced by the previous one.
/// Substituted values are not rescanned for the same variable.
///
/// ```
/// use palaver_context::{Variable, VariableValue, substitute_variables};
///
/// let vars = [
///     Variable::string("name", "Ana"),
///     Variable::new("ok", VariableValue::Boolean(true)),
/// ];
/// assert_eq!(
///     substitute_variables("{{name}} {{name}} {{ok}} {{other}}", &vars),
///     "Ana Ana true {{other}}"
/// );
/// ```
pub fn substitute_variables(text: &str, variables: &[Variable]) -> String {
    variables
        .iter()
        .fold(text.to_string(), |acc, variable| {
            acc.replace(&variable.placeholder(), &variable.value.render())
        })
}

fn apply_directives(text: &str, context: &Context, current: &Stage) -> String {
    let mut text = text.to_string();

    if text.contains(STAGES_DIRECTIVE) {
        let listing = context
            .stages
            .iter()
            .filter(|stage| stage.enabled && !stage.description.is_empty())
            .map(|stage| format!("{}: {}", stage.key, stage.description))
            .collect::<Vec<_>>()
            .join("\n");
        text = text.replace(STAGES_DIRECTIVE, &listing);
    }

    for stage in &context.stages {
        let placeholder = format!("{{{{stage-{}}}}}", stage.key);
        if !text.contains(&placeholder) {
            continue;
        }
        let replacement = if stage.key == current.key {
            format!("\n\n{}", stage.description)
        } else {
            String::new()
        };
        text = text.replace(&placeholder, &replacement);
    }

    if let (Some(first), Some(last)) = (context.first_stage(), context.last_stage()) {
        text = text.replace(
            STAGES_RANGE_DIRECTIVE,
            &format!("{}-{}", first.key, last.key),
        );
    }

    text
}
