//! Full pipeline: scanner records -> snapshot -> index -> graph -> queries.

use coderef_graph::{resolve_raw_facts, DependencyGraph, EdgeKind, RawEdgeFact};
use coderef_index::{ElementFilter, ElementIndex, ScanRecord, Snapshot};
use coderef_query::{FindRequest, ImpactLevel, QueryEngine};

fn engine() -> QueryEngine {
    let raw = r#"[
        {"type": "Fn", "name": "query", "file": "core/db.py", "line": 5, "language": "python"},
        {"type": "Fn", "name": "load_user", "file": "svc/user.py", "line": 12, "language": "python"},
        {"type": "Fn", "name": "get_user", "file": "api/users.py", "line": 30, "language": "python"},
        {"type": "Cls", "name": "User", "file": "models/user.py", "line": 3, "language": "python"}
    ]"#;
    let records: Vec<ScanRecord> = serde_json::from_str(raw).unwrap();
    let elements: Vec<_> = records.into_iter().map(ScanRecord::into_record).collect();

    let snapshot = Snapshot::new(1_722_000_000, elements);
    assert_eq!(snapshot.metadata.total_elements, 4);
    let index = ElementIndex::build(snapshot.elements).index;

    let raw_facts = vec![
        RawEdgeFact {
            source: "svc/user#load_user".to_string(),
            target: "core/db#query".to_string(),
            kind: EdgeKind::Calls,
        },
        RawEdgeFact {
            source: "api/users#get_user".to_string(),
            target: "svc/user#load_user".to_string(),
            kind: EdgeKind::Calls,
        },
    ];
    let facts = resolve_raw_facts(&index, &raw_facts);
    let graph = DependencyGraph::build(&index, facts).graph;
    QueryEngine::new(index, graph)
}

#[test]
fn find_then_impact_over_scanner_input() {
    let engine = engine();

    let response = engine
        .find(&FindRequest {
            filter: ElementFilter {
                path_pattern: Some("svc/*".to_string()),
                ..Default::default()
            },
            include_relationships: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(response.total_count, 1);
    assert_eq!(response.elements[0].identity, "Fn:svc/user#load_user:12");
    assert_eq!(response.elements[0].has_relationships, Some(true));

    let reference = coderef_tag::parse("@Fn/core/db#query:5").unwrap();
    let impact = engine.impact(&reference, None).unwrap();
    assert_eq!(impact.impact_summary.total, 2);
    assert_eq!(impact.affected_elements[0].impact_level, ImpactLevel::High);
    assert_eq!(
        impact.affected_elements[1].identity,
        "Fn:api/users#get_user:30"
    );
}
