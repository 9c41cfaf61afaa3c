use crate::error::{GraphError, Result};
use crate::types::{EdgeFact, EdgeKind, ImpactedNode};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

/// Default traversal depth for impact analysis.
pub const DEFAULT_IMPACT_DEPTH: usize = 3;

/// Immutable dependency graph over one index snapshot.
#[derive(Debug)]
pub struct DependencyGraph {
    /// Directed graph (identity -> identity with edge kinds)
    graph: DiGraph<String, EdgeKind>,

    /// Identity key -> NodeIndex mapping for fast lookup
    node_index: HashMap<String, NodeIndex>,

    /// Edge facts whose endpoints did not resolve; excluded from traversal
    dangling: Vec<EdgeFact>,
}

impl DependencyGraph {
    pub(crate) fn from_parts(
        graph: DiGraph<String, EdgeKind>,
        node_index: HashMap<String, NodeIndex>,
        dangling: Vec<EdgeFact>,
    ) -> Self {
        Self {
            graph,
            node_index,
            dangling,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.node_index.contains_key(identity)
    }

    /// Retained facts that reference identities missing from the index.
    pub fn dangling(&self) -> &[EdgeFact] {
        &self.dangling
    }

    /// O(1) adjacency presence check (any edge in either direction).
    pub fn has_edges(&self, identity: &str) -> bool {
        self.node_index.get(identity).is_some_and(|&node| {
            self.graph
                .edges_directed(node, Direction::Incoming)
                .next()
                .is_some()
                || self
                    .graph
                    .edges_directed(node, Direction::Outgoing)
                    .next()
                    .is_some()
        })
    }

    /// Direct consumers: incoming `calls`/`imports` edges, in edge insertion
    /// order.
    pub fn consumers_of(&self, identity: &str) -> Vec<&str> {
        self.direct_neighbors(identity, Direction::Incoming)
    }

    /// Direct dependencies: outgoing `calls`/`imports` edges, in edge
    /// insertion order.
    pub fn dependencies_of(&self, identity: &str) -> Vec<&str> {
        self.direct_neighbors(identity, Direction::Outgoing)
    }

    fn direct_neighbors(&self, identity: &str, direction: Direction) -> Vec<&str> {
        let Some(&node) = self.node_index.get(identity) else {
            return Vec::new();
        };
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(node, direction)
            .filter(|edge| matches!(edge.weight(), EdgeKind::Calls | EdgeKind::Imports))
            .map(|edge| {
                let neighbor = match direction {
                    Direction::Incoming => edge.source(),
                    Direction::Outgoing => edge.target(),
                };
                (edge.id(), neighbor)
            })
            .collect();
        edges.sort_unstable_by_key(|&(id, _)| id);
        edges
            .into_iter()
            .map(|(_, neighbor)| self.graph[neighbor].as_str())
            .collect()
    }

    /// Transitive consumers of `identity`, breadth-first over incoming edges
    /// of every kind, limited to `max_depth` (default
    /// [`DEFAULT_IMPACT_DEPTH`]).
    ///
    /// A visited set guarantees termination on cycles and single emission
    /// per node. Neighbor order is fixed: edge insertion order, then
    /// lexicographic identity.
    pub fn transitive_impact(
        &self,
        identity: &str,
        max_depth: Option<usize>,
    ) -> Result<Vec<ImpactedNode>> {
        let max_depth = max_depth.unwrap_or(DEFAULT_IMPACT_DEPTH);
        let &start = self
            .node_index
            .get(identity)
            .ok_or_else(|| GraphError::NodeNotFound(identity.to_string()))?;

        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        let mut out = Vec::new();

        while let Some((node, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            let mut incoming: Vec<(EdgeIndex, NodeIndex)> = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|edge| (edge.id(), edge.source()))
                .collect();
            incoming.sort_unstable_by(|&(a_id, a_node), &(b_id, b_node)| {
                a_id.cmp(&b_id)
                    .then_with(|| self.graph[a_node].cmp(&self.graph[b_node]))
            });
            for (_, neighbor) in incoming {
                if visited.insert(neighbor) {
                    out.push(ImpactedNode {
                        identity: self.graph[neighbor].clone(),
                        distance: depth + 1,
                    });
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        Ok(out)
    }
}
