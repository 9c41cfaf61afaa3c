use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A metadata value attached to a reference.
///
/// The key=value grammar infers `true`/`false` as booleans and digit runs as
/// integers; everything else stays a string. Floats only enter through the
/// JSON metadata form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl MetaValue {
    /// Infer a value from key=value text.
    pub fn infer(text: &str) -> MetaValue {
        match text {
            "true" => return MetaValue::Bool(true),
            "false" => return MetaValue::Bool(false),
            _ => {}
        }
        if let Ok(n) = text.parse::<i64>() {
            // `parse` accepts a leading '+', which the grammar does not.
            if !text.starts_with('+') {
                return MetaValue::Int(n);
            }
        }
        MetaValue::Str(text.to_string())
    }

    /// Canonical text rendering, used both for key=value emission and as the
    /// value half of metadata index keys.
    pub fn render(&self) -> String {
        match self {
            MetaValue::Bool(b) => b.to_string(),
            MetaValue::Int(n) => n.to_string(),
            MetaValue::Float(x) => x.to_string(),
            MetaValue::Str(s) => s.clone(),
        }
    }

    /// Whether emitting this value in key=value form re-parses to the same
    /// value. Floats and strings that collide with the inference rules (or
    /// contain grammar delimiters) must take the JSON form instead.
    pub(crate) fn kv_representable(&self) -> bool {
        match self {
            MetaValue::Bool(_) | MetaValue::Int(_) => true,
            MetaValue::Float(_) => false,
            MetaValue::Str(s) => {
                !s.contains(['=', ',', '{', '}'])
                    && !s.chars().any(char::is_control)
                    && s.trim() == s
                    && MetaValue::infer(s) == MetaValue::Str(s.clone())
            }
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<serde_json::Value> for MetaValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => MetaValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => MetaValue::Int(i),
                None => MetaValue::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => MetaValue::Str(s),
            other => MetaValue::Str(other.to_string()),
        }
    }
}
