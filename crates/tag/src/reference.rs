use crate::kind::ElementKind;
use crate::meta::MetaValue;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed form of a reference tag.
///
/// Produced by [`crate::parse`] and consumed by [`crate::generate`]; the two
/// are exact inverses for canonical tag text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Reference {
    #[serde(rename = "type")]
    pub kind: ElementKind,

    /// Forward-slash path with no file extension.
    pub path: String,

    /// Element name within the path (function, class, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// 1-based line number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Metadata pairs in insertion order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, MetaValue>,
}

impl Reference {
    pub fn new(kind: ElementKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            name: None,
            line: None,
            metadata: IndexMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: MetaValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Canonical identity key, `Kind:path#name:line`. This is the graph-node
    /// form of a reference; metadata is not part of identity.
    pub fn identity(&self) -> String {
        let mut key = format!("{}:{}", self.kind.code(), self.path);
        if let Some(name) = &self.name {
            key.push('#');
            key.push_str(name);
        }
        if let Some(line) = self.line {
            key.push(':');
            key.push_str(&line.to_string());
        }
        key
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::generate(self))
    }
}
