//! Event-driven parser for context document markup.
//!
//! Elements that may appear once or many times are collected straight into
//! ordered lists, so consumers never branch on how often an element occurred.

use crate::{Block, Context, Stage, Variable, VariableType, VariableValue};
use palaver_error::{ContextError, ContextErrorKind};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

const ROOT: &str = "context";

/// Parses context document markup.
///
/// # Errors
///
/// Fails on malformed markup, a root other than `<context>`, a missing required
/// attribute, an unknown variable type, or a repeated stage or block key.
#[tracing::instrument(skip_all, fields(len = markup.len()))]
pub fn parse_context(markup: &str) -> Result<Context, ContextError> {
    let mut reader = Reader::from_str(markup);
    let mut state = ParseState::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            ContextError::new(ContextErrorKind::Xml(format!(
                "{} at byte {}",
                e,
                reader.error_position()
            )))
        })?;

        match event {
            Event::Start(element) => state.open(&element, false)?,
            Event::Empty(element) => state.open(&element, true)?,
            Event::End(_) => state.close(),
            Event::Text(text) => {
                let raw = String::from_utf8_lossy(&text);
                let unescaped = unescape(&raw).map_err(|e| {
                    ContextError::new(ContextErrorKind::Xml(e.to_string()))
                })?;
                state.text(&unescaped);
            }
            Event::CData(data) => state.text(&String::from_utf8_lossy(&data)),
            Event::Eof => break,
            _ => {}
        }
    }

    let context = state.finish()?;
    tracing::debug!(
        stages = context.stages.len(),
        blocks = context.blocks.len(),
        variables = context.variables.len(),
        "Parsed context document"
    );
    Ok(context)
}

impl FromStr for Context {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_context(s)
    }
}

/// Where captured text goes when the enclosing element closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Version,
    Date,
    Description,
    Block,
}

#[derive(Debug, Default)]
struct ParseState {
    /// Open element names, outermost first
    path: Vec<String>,
    seen_root: bool,
    /// Capture target and the depth of the element that opened it
    capture: Option<(Capture, usize)>,
    buffer: String,
    block_key: Option<String>,
    context: Context,
}

impl ParseState {
    fn open(&mut self, element: &BytesStart<'_>, empty: bool) -> Result<(), ContextError> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();

        if !self.seen_root {
            if name != ROOT {
                return Err(ContextError::new(ContextErrorKind::MissingRoot(name)));
            }
            self.seen_root = true;
            if !empty {
                self.path.push(name);
            }
            return Ok(());
        }

        // Elements nested inside a captured body contribute only their text.
        if self.capture.is_none() {
            let parent = self.path.last().cloned();
            match (parent.as_deref(), name.as_str()) {
                (Some(ROOT), "variable") => {
                    let variable = parse_variable(&attributes(element)?)?;
                    self.context.variables.push(variable);
                }
                (Some(ROOT), "stage") => {
                    let stage = parse_stage(&attributes(element)?)?;
                    self.context.stages.push(stage);
                }
                (Some(ROOT), "block") => {
                    let attrs = attributes(element)?;
                    let key = required(&attrs, "block", "key")?;
                    if empty {
                        self.context.blocks.push(Block {
                            key,
                            content: String::new(),
                        });
                    } else {
                        self.block_key = Some(key);
                        self.begin(Capture::Block);
                    }
                }
                (Some("info"), "version") if !empty => self.begin(Capture::Version),
                (Some("info"), "date") if !empty => self.begin(Capture::Date),
                (Some("info"), "description") if !empty => self.begin(Capture::Description),
                _ => {}
            }
        }

        if !empty {
            self.path.push(name);
        }
        Ok(())
    }

    fn begin(&mut self, capture: Capture) {
        self.buffer.clear();
        self.capture = Some((capture, self.path.len() + 1));
    }

    fn text(&mut self, text: &str) {
        if self.capture.is_some() {
            self.buffer.push_str(text);
        }
    }

    fn close(&mut self) {
        let depth = self.path.len();
        self.path.pop();

        let Some((capture, opened_at)) = self.capture else {
            return;
        };
        if depth != opened_at {
            return;
        }

        self.capture = None;
        let text = self.buffer.trim().to_string();
        self.buffer.clear();
        match capture {
            Capture::Version => self.context.version = text,
            Capture::Date => self.context.date = text,
            Capture::Description => self.context.description = text,
            Capture::Block => {
                if let Some(key) = self.block_key.take() {
                    self.context.blocks.push(Block { key, content: text });
                }
            }
        }
    }

    fn finish(self) -> Result<Context, ContextError> {
        if !self.seen_root {
            return Err(ContextError::new(ContextErrorKind::MissingRoot(
                "nothing".to_string(),
            )));
        }

        let mut stage_keys = HashSet::new();
        for stage in &self.context.stages {
            if !stage_keys.insert(stage.key.as_str()) {
                return Err(ContextError::new(ContextErrorKind::DuplicateStage(
                    stage.key.clone(),
                )));
            }
        }

        let mut block_keys = HashSet::new();
        for block in &self.context.blocks {
            if !block_keys.insert(block.key.as_str()) {
                return Err(ContextError::new(ContextErrorKind::DuplicateBlock(
                    block.key.clone(),
                )));
            }
        }

        Ok(self.context)
    }
}

fn attributes(element: &BytesStart<'_>) -> Result<HashMap<String, String>, ContextError> {
    let mut attrs = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ContextError::new(ContextErrorKind::Xml(e.to_string())))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw)
            .map_err(|e| ContextError::new(ContextErrorKind::Xml(e.to_string())))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn required(
    attrs: &HashMap<String, String>,
    element: &str,
    attribute: &str,
) -> Result<String, ContextError> {
    attrs.get(attribute).cloned().ok_or_else(|| {
        ContextError::new(ContextErrorKind::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        })
    })
}

fn parse_variable(attrs: &HashMap<String, String>) -> Result<Variable, ContextError> {
    let name = required(attrs, "variable", "name")?;
    let declared = required(attrs, "variable", "type")?;
    let var_type = VariableType::from_str(declared.trim()).map_err(|_| {
        ContextError::new(ContextErrorKind::UnknownVariableType {
            name: name.clone(),
            declared: declared.clone(),
        })
    })?;
    let raw = attrs.get("value").map(String::as_str).unwrap_or_default();
    Ok(Variable::new(name, VariableValue::coerce(var_type, raw)))
}

fn parse_stage(attrs: &HashMap<String, String>) -> Result<Stage, ContextError> {
    let key = required(attrs, "stage", "key")?;
    let block_keys = attrs
        .get("blocks")
        .map(|blocks| {
            blocks
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Stage {
        key,
        description: attrs.get("description").cloned().unwrap_or_default(),
        block_keys,
        enabled: parse_enabled(attrs.get("enabled").map(String::as_str)),
    })
}

/// Reads a stage's `enabled` attribute. Unrecognized or absent values mean enabled.
pub(crate) fn parse_enabled(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        Some("false" | "no" | "0") => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_enabled;

    #[test]
    fn enabled_values() {
        for value in ["true", "yes", "1", " yes ", "maybe", ""] {
            assert!(parse_enabled(Some(value)), "{value:?} should be enabled");
        }
        for value in ["false", "no", "0", " 0\n"] {
            assert!(!parse_enabled(Some(value)), "{value:?} should be disabled");
        }
        assert!(parse_enabled(None));
    }
}
