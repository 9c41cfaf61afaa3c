use crate::graph::DependencyGraph;
use crate::types::{EdgeFact, GraphWarning, RawEdgeFact};
use coderef_index::ElementIndex;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Result of [`DependencyGraph::build`]: the graph plus any warnings.
#[derive(Debug)]
pub struct GraphBuild {
    pub graph: DependencyGraph,
    pub warnings: Vec<GraphWarning>,
}

impl DependencyGraph {
    /// Build a graph over the identities of `index`.
    ///
    /// Facts whose endpoints both resolve become edges, in fact order. Facts
    /// with a missing endpoint are retained as dangling and reported, never
    /// rejected.
    pub fn build(index: &ElementIndex, facts: Vec<EdgeFact>) -> GraphBuild {
        let mut graph: DiGraph<String, crate::EdgeKind> = DiGraph::new();
        let mut node_index: HashMap<String, NodeIndex> = HashMap::new();

        // Phase 1: one node per identity, in scan order.
        for identity in index.identities() {
            let idx = graph.add_node(identity.clone());
            node_index.insert(identity, idx);
        }

        // Phase 2: resolve facts into edges.
        let mut dangling = Vec::new();
        let mut warnings = Vec::new();
        for fact in facts {
            match (node_index.get(&fact.source), node_index.get(&fact.target)) {
                (Some(&source), Some(&target)) => {
                    graph.add_edge(source, target, fact.kind);
                }
                _ => {
                    log::warn!(
                        "dangling edge {} -> {} ({})",
                        fact.source,
                        fact.target,
                        fact.kind
                    );
                    warnings.push(GraphWarning::DanglingEdge {
                        source: fact.source.clone(),
                        target: fact.target.clone(),
                    });
                    dangling.push(fact);
                }
            }
        }

        log::info!(
            "Built dependency graph: {} nodes, {} edges, {} dangling",
            graph.node_count(),
            graph.edge_count(),
            dangling.len()
        );

        GraphBuild {
            graph: DependencyGraph::from_parts(graph, node_index, dangling),
            warnings,
        }
    }
}

/// Resolve scanner-level `file#name` edge facts into identity-keyed facts.
///
/// Each endpoint is looked up through the index; the first element at that
/// path with a matching name wins (stable scan order). Endpoints that do not
/// resolve are passed through verbatim and will surface as dangling edges at
/// build time.
pub fn resolve_raw_facts(index: &ElementIndex, facts: &[RawEdgeFact]) -> Vec<EdgeFact> {
    facts
        .iter()
        .map(|fact| EdgeFact {
            source: resolve_endpoint(index, &fact.source),
            target: resolve_endpoint(index, &fact.target),
            kind: fact.kind,
        })
        .collect()
}

fn resolve_endpoint(index: &ElementIndex, endpoint: &str) -> String {
    let (path, name) = match endpoint.split_once('#') {
        Some(parts) => parts,
        None => return endpoint.to_string(),
    };
    index
        .find_by_path(path)
        .into_iter()
        .find(|record| record.name.as_deref() == Some(name))
        .map(|record| record.identity())
        .unwrap_or_else(|| endpoint.to_string())
}
