use crate::error::{QueryError, Result};
use crate::types::{
    AffectedElement, FindRequest, FindResponse, FoundElement, ImpactLevel, ImpactResponse,
    ImpactSummary,
};
use coderef_graph::DependencyGraph;
use coderef_index::ElementIndex;
use coderef_tag::Reference;

/// Read surface over one snapshot pair. Construct one engine per snapshot
/// and share it by reference; the underlying index and graph never change.
pub struct QueryEngine {
    index: ElementIndex,
    graph: DependencyGraph,
}

impl QueryEngine {
    pub fn new(index: ElementIndex, graph: DependencyGraph) -> Self {
        Self { index, graph }
    }

    pub fn index(&self) -> &ElementIndex {
        &self.index
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Filtered element lookup. `total_count` counts all matches; `limit`
    /// only truncates the returned list.
    pub fn find(&self, request: &FindRequest) -> Result<FindResponse> {
        let matches = self.index.query(&request.filter, None)?;
        let total_count = matches.len();

        let take = request.limit.unwrap_or(total_count);
        let elements = matches
            .into_iter()
            .take(take)
            .map(|record| {
                let identity = record.identity();
                let has_relationships = request
                    .include_relationships
                    .then(|| self.graph.has_edges(&identity));
                FoundElement {
                    identity,
                    element: record.clone(),
                    has_relationships,
                }
            })
            .collect();

        log::debug!("find: {total_count} matches");
        Ok(FindResponse {
            elements,
            total_count,
        })
    }

    /// Impact analysis for one reference: transitive consumers bucketed by
    /// distance into fixed risk levels.
    pub fn impact(&self, reference: &Reference, depth: Option<usize>) -> Result<ImpactResponse> {
        let identity = reference.identity();
        if !self.graph.contains(&identity) {
            return Err(QueryError::UnknownReference(coderef_tag::generate(
                reference,
            )));
        }

        let impacted = self.graph.transitive_impact(&identity, depth)?;
        let mut summary = ImpactSummary::default();
        let affected_elements: Vec<AffectedElement> = impacted
            .into_iter()
            .map(|node| {
                let impact_level = ImpactLevel::from_distance(node.distance);
                match impact_level {
                    ImpactLevel::High => summary.high += 1,
                    ImpactLevel::Medium => summary.medium += 1,
                    ImpactLevel::Low => summary.low += 1,
                }
                summary.total += 1;
                let element = self.index.get(&node.identity).first().map(|&r| r.clone());
                AffectedElement {
                    identity: node.identity,
                    distance: node.distance,
                    impact_level,
                    element,
                }
            })
            .collect();

        Ok(ImpactResponse {
            reference: coderef_tag::generate(reference),
            affected_elements,
            impact_summary: summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coderef_graph::{EdgeFact, EdgeKind};
    use coderef_index::{ElementFilter, ElementRecord};
    use coderef_tag::ElementKind;
    use pretty_assertions::assert_eq;

    fn element(path: &str, name: &str, line: u32) -> ElementRecord {
        ElementRecord::new(ElementKind::Function, path)
            .with_name(name)
            .with_line(line)
    }

    fn engine() -> QueryEngine {
        let index = coderef_index::ElementIndex::build(vec![
            element("core/db", "query", 5),
            element("svc/user", "load_user", 12),
            element("svc/order", "load_order", 9),
            element("api/users", "get_user", 30),
            element("api/orders", "get_order", 41),
        ])
        .index;
        let facts = vec![
            EdgeFact::new("Fn:svc/user#load_user:12", "Fn:core/db#query:5", EdgeKind::Calls),
            EdgeFact::new("Fn:svc/order#load_order:9", "Fn:core/db#query:5", EdgeKind::Calls),
            EdgeFact::new("Fn:api/users#get_user:30", "Fn:svc/user#load_user:12", EdgeKind::Calls),
            EdgeFact::new(
                "Fn:api/orders#get_order:41",
                "Fn:svc/order#load_order:9",
                EdgeKind::Imports,
            ),
        ];
        let graph = DependencyGraph::build(&index, facts).graph;
        QueryEngine::new(index, graph)
    }

    #[test]
    fn find_reports_total_before_limit() {
        let engine = engine();
        let request = FindRequest {
            filter: ElementFilter {
                path_pattern: Some("svc/*".to_string()),
                ..Default::default()
            },
            limit: Some(1),
            ..Default::default()
        };
        let response = engine.find(&request).unwrap();
        assert_eq!(response.total_count, 2);
        assert_eq!(response.elements.len(), 1);
        assert_eq!(response.elements[0].identity, "Fn:svc/user#load_user:12");
        assert_eq!(response.elements[0].has_relationships, None);
    }

    #[test]
    fn find_attaches_relationship_flags_on_request() {
        let engine = engine();
        let request = FindRequest {
            include_relationships: true,
            ..Default::default()
        };
        let response = engine.find(&request).unwrap();
        assert!(response
            .elements
            .iter()
            .all(|found| found.has_relationships == Some(true)));
    }

    #[test]
    fn impact_buckets_by_distance() {
        let engine = engine();
        let reference = coderef_tag::parse("@Fn/core/db#query:5").unwrap();
        let response = engine.impact(&reference, None).unwrap();

        let by_identity: Vec<(&str, ImpactLevel)> = response
            .affected_elements
            .iter()
            .map(|hit| (hit.identity.as_str(), hit.impact_level))
            .collect();
        assert_eq!(
            by_identity,
            vec![
                ("Fn:svc/user#load_user:12", ImpactLevel::High),
                ("Fn:svc/order#load_order:9", ImpactLevel::High),
                ("Fn:api/users#get_user:30", ImpactLevel::Medium),
                ("Fn:api/orders#get_order:41", ImpactLevel::Medium),
            ]
        );
        assert_eq!(
            response.impact_summary,
            ImpactSummary {
                high: 2,
                medium: 2,
                low: 0,
                total: 4,
            }
        );
        assert!(response
            .affected_elements
            .iter()
            .all(|hit| hit.element.is_some()));
    }

    #[test]
    fn impact_on_unknown_reference_is_an_error() {
        let engine = engine();
        let reference = coderef_tag::parse("@Fn/ghost/module#vanished:1").unwrap();
        assert!(matches!(
            engine.impact(&reference, None),
            Err(QueryError::UnknownReference(_))
        ));
    }
}
