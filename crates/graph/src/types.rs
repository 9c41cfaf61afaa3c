use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of relationship between elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// A imports B (import statement)
    Imports,

    /// A calls B (function call)
    Calls,

    /// A exports B (re-export / public surface)
    Exports,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EdgeKind::Imports => "imports",
            EdgeKind::Calls => "calls",
            EdgeKind::Exports => "exports",
        };
        f.write_str(text)
    }
}

/// A directed edge fact between two element identities
/// (`Kind:path#name:line` keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFact {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl EdgeFact {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// An unresolved edge fact as produced by external scanners: endpoints are
/// `file#name` pairs instead of identity keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdgeFact {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// One element reached by impact traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactedNode {
    pub identity: String,

    /// BFS distance from the origin (1 = direct consumer).
    pub distance: usize,
}

/// Non-fatal findings attached to a graph build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphWarning {
    /// An edge fact referenced an identity missing from the index. The fact
    /// is kept (see [`crate::DependencyGraph::dangling`]) but excluded from
    /// traversal.
    DanglingEdge { source: String, target: String },
}
