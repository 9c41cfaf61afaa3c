//! # CodeRef Graph
//!
//! Directed dependency graph over an element index.
//!
//! ## Architecture
//!
//! ```text
//! ElementIndex + edge facts
//!     │
//!     ├──> Graph Builder
//!     │      ├─ One node per identity key
//!     │      ├─ Resolved facts become edges (imports / calls / exports)
//!     │      └─ Facts with a missing endpoint are retained as dangling
//!     │
//!     └──> Dependency Graph (petgraph)
//!            ├─ consumers / dependencies (direct neighbors)
//!            └─ transitive impact (depth-limited, cycle-safe BFS)
//! ```
//!
//! Dangling edges never enter the petgraph structure, so traversals exclude
//! them by construction; they stay available for diagnostics.

mod builder;
mod error;
mod graph;
mod types;

pub use builder::{resolve_raw_facts, GraphBuild};
pub use error::{GraphError, Result};
pub use graph::{DependencyGraph, DEFAULT_IMPACT_DEPTH};
pub use types::{EdgeFact, EdgeKind, GraphWarning, ImpactedNode, RawEdgeFact};
