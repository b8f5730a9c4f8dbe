//! Parsed context document types.

use serde::{Deserialize, Serialize};

/// A parsed context document.
///
/// Stages, blocks and variables keep document order. Stage keys and block keys
/// are unique; the parser rejects documents that repeat either.
///
/// # Examples
///
/// ```
/// use palaver_context::Context;
///
/// let markup = r#"
/// <context>
///   <info><version>1</version></info>
///   <stage key="A" description="first" blocks="intro"/>
///   <block key="intro">Hello</block>
/// </context>"#;
///
/// let context: Context = markup.parse().expect("valid document");
/// assert_eq!(context.version, "1");
/// assert_eq!(context.first_stage().map(|s| s.key.as_str()), Some("A"));
/// assert_eq!(context.block("intro").map(|b| b.content.as_str()), Some("Hello"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Document version from `<info>`
    pub version: String,
    /// Document date from `<info>`
    pub date: String,
    /// Free text description from `<info>`
    pub description: String,
    /// Stages in document order
    pub stages: Vec<Stage>,
    /// Instruction blocks in document order
    pub blocks: Vec<Block>,
    /// Declared variables in document order
    pub variables: Vec<Variable>,
}

impl Context {
    /// Looks up a stage by key.
    pub fn stage(&self, key: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.key == key)
    }

    /// Looks up a block by key.
    pub fn block(&self, key: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.key == key)
    }

    /// First stage in document order.
    pub fn first_stage(&self) -> Option<&Stage> {
        self.stages.first()
    }

    /// Last stage in document order.
    pub fn last_stage(&self) -> Option<&Stage> {
        self.stages.last()
    }
}

/// A named phase of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Unique stage key
    pub key: String,
    /// Human readable description, listed by `{{stages}}`
    pub description: String,
    /// Ordered block references; unknown keys are skipped during compilation
    pub block_keys: Vec<String>,
    /// Disabled stages are left out of `{{stages}}`
    pub enabled: bool,
}

/// A reusable instruction fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Unique block key
    pub key: String,
    /// Text with zero or more placeholders
    pub content: String,
}

/// Declared type of a variable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VariableType {
    /// Text, passed through unchanged
    String,
    /// Floating point number
    Number,
    /// `true` or `false`
    Boolean,
}

/// A variable value, typed by its declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum VariableValue {
    /// String value
    String(String),
    /// Number value; NaN when the declared text was not a number
    Number(f64),
    /// Boolean value
    Boolean(bool),
}

impl VariableValue {
    /// Coerces raw attribute text to the declared type.
    ///
    /// Numbers that fail to parse become NaN. Booleans are true only for the
    /// literal text `true`.
    ///
    /// ```
    /// use palaver_context::{VariableType, VariableValue};
    ///
    /// assert_eq!(VariableValue::coerce(VariableType::Number, "2.5"), VariableValue::Number(2.5));
    /// assert_eq!(VariableValue::coerce(VariableType::Boolean, "yes"), VariableValue::Boolean(false));
    /// assert!(matches!(
    ///     VariableValue::coerce(VariableType::Number, "many"),
    ///     VariableValue::Number(n) if n.is_nan()
    /// ));
    /// ```
    pub fn coerce(var_type: VariableType, raw: &str) -> Self {
        match var_type {
            VariableType::String => Self::String(raw.to_string()),
            VariableType::Number => Self::Number(raw.trim().parse().unwrap_or(f64::NAN)),
            VariableType::Boolean => Self::Boolean(raw == "true"),
        }
    }

    /// The declared type of this value.
    pub fn var_type(&self) -> VariableType {
        match self {
            Self::String(_) => VariableType::String,
            Self::Number(_) => VariableType::Number,
            Self::Boolean(_) => VariableType::Boolean,
        }
    }

    /// Text substituted for the variable's placeholder.
    ///
    /// NaN renders as an empty string. Other numbers use the shortest
    /// round-trip digits, switching to exponent form at `1e21` and below
    /// `1e-6` the way documents written for JavaScript tooling expect.
    ///
    /// ```
    /// use palaver_context::VariableValue;
    ///
    /// assert_eq!(VariableValue::Number(42.0).render(), "42");
    /// assert_eq!(VariableValue::Number(0.5).render(), "0.5");
    /// assert_eq!(VariableValue::Number(f64::NAN).render(), "");
    /// assert_eq!(VariableValue::Number(f64::INFINITY).render(), "Infinity");
    /// assert_eq!(VariableValue::Number(1e21).render(), "1e+21");
    /// assert_eq!(VariableValue::Boolean(false).render(), "false");
    /// ```
    pub fn render(&self) -> String {
        match self {
            Self::String(text) => text.clone(),
            Self::Number(n) => render_number(*n),
            Self::Boolean(b) => b.to_string(),
        }
    }

    /// Text written back to a `value` attribute so that coercion restores this value.
    pub(crate) fn raw(&self) -> String {
        match self {
            Self::Number(n) if n.is_nan() => String::new(),
            other => other.render(),
        }
    }
}

fn render_number(n: f64) -> String {
    if n.is_nan() {
        return String::new();
    }
    if n.is_infinite() {
        return String::from(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        // `{:e}` gives `1.5e-7` or `1e21`; positive exponents carry a sign.
        let exponent = format!("{:e}", n);
        return match exponent.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => exponent,
        };
    }
    n.to_string()
}

/// A typed, named value substituted into block text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Placeholder name, used as `{{name}}`
    pub name: String,
    /// Typed value
    #[serde(flatten)]
    pub value: VariableValue,
}

impl Variable {
    /// Creates a variable from a name and value.
    pub fn new(name: impl Into<String>, value: VariableValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Creates a string variable.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, VariableValue::String(value.into()))
    }

    /// Declared type of the variable.
    pub fn var_type(&self) -> VariableType {
        self.value.var_type()
    }

    /// The `{{name}}` placeholder this variable replaces.
    pub fn placeholder(&self) -> String {
        format!("{{{{{}}}}}", self.name)
    }
}
