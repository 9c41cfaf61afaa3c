use anyhow::{bail, Context, Result};
use coderef_drift::{DriftConfig, DriftDetector};
use coderef_graph::{resolve_raw_facts, DependencyGraph, EdgeFact, EdgeKind, RawEdgeFact};
use coderef_index::{ElementFilter, ElementIndex, ScanRecord, Snapshot};
use coderef_query::{FindRequest, QueryEngine};
use coderef_tag::{ElementKind, MetaValue};
use serde::Deserialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn parse(tag: &str) -> Result<()> {
    let reference = coderef_tag::parse(tag)?;
    println!("{}", serde_json::to_string_pretty(&reference)?);
    Ok(())
}

pub(crate) fn extract(file: &Path) -> Result<()> {
    let document = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let found: Vec<serde_json::Value> = coderef_tag::extract_all(&document)
        .map(|(offset, reference)| {
            serde_json::json!({
                "offset": offset,
                "tag": coderef_tag::generate(&reference),
                "reference": reference,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(())
}

pub(crate) fn snapshot(scan: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(scan)
        .with_context(|| format!("failed to read {}", scan.display()))?;
    let records: Vec<ScanRecord> =
        serde_json::from_str(&raw).context("scan file must be a JSON array of scanner records")?;
    let elements = records.into_iter().map(ScanRecord::into_record).collect();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    let snapshot = Snapshot::new(timestamp, elements);
    println!("{}", snapshot.to_json()?);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn query(
    snapshot: &Path,
    kinds: &[String],
    path_pattern: Option<String>,
    metadata: &[String],
    limit: Option<usize>,
    relationships: bool,
    edges: Option<&Path>,
) -> Result<()> {
    let index = load_index(snapshot)?;
    let graph = match edges {
        Some(path) => build_graph(&index, path)?,
        None => DependencyGraph::build(&index, Vec::new()).graph,
    };
    let engine = QueryEngine::new(index, graph);

    let request = FindRequest {
        query: None,
        filter: ElementFilter {
            kinds: parse_kinds(kinds)?,
            path_pattern,
            metadata_filters: parse_metadata(metadata)?,
        },
        limit,
        include_relationships: relationships,
    };
    let response = engine.find(&request)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub(crate) fn impact(snapshot: &Path, tag: &str, edges: &Path, depth: Option<usize>) -> Result<()> {
    let reference = coderef_tag::parse(tag)?;
    let index = load_index(snapshot)?;
    let graph = build_graph(&index, edges)?;
    let engine = QueryEngine::new(index, graph);
    let response = engine.impact(&reference, depth)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub(crate) fn drift(
    baseline: &Path,
    current: &Path,
    threshold: Option<f64>,
    epsilon: Option<f64>,
) -> Result<()> {
    let mut config = DriftConfig::default();
    if let Some(threshold) = threshold {
        if !(0.0..=1.0).contains(&threshold) {
            bail!("--threshold must be within [0, 1]");
        }
        config = config.with_threshold(threshold);
    }
    if let Some(epsilon) = epsilon {
        if !(0.0..=1.0).contains(&epsilon) {
            bail!("--epsilon must be within [0, 1]");
        }
        config = config.with_epsilon(epsilon);
    }

    let baseline = load_index(baseline)?;
    let current = load_index(current)?;
    let results = DriftDetector::new(config).compare(&baseline, &current);
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn load_index(path: &Path) -> Result<ElementIndex> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let snapshot = Snapshot::from_json(&raw)
        .with_context(|| format!("{} is not a snapshot document", path.display()))?;
    // Duplicate-identity warnings are logged by the build itself.
    Ok(ElementIndex::build(snapshot.elements).index)
}

/// Edge files accept both identity-keyed facts and raw scanner triples,
/// detected per entry.
#[derive(Deserialize)]
struct EdgeEntry {
    source: String,
    target: String,
    kind: EdgeKind,
}

fn build_graph(index: &ElementIndex, edges: &Path) -> Result<DependencyGraph> {
    let raw = std::fs::read_to_string(edges)
        .with_context(|| format!("failed to read {}", edges.display()))?;
    let entries: Vec<EdgeEntry> =
        serde_json::from_str(&raw).context("edges file must be a JSON array of edge facts")?;

    let mut facts = Vec::with_capacity(entries.len());
    for entry in entries {
        if is_identity(&entry.source) && is_identity(&entry.target) {
            facts.push(EdgeFact::new(entry.source, entry.target, entry.kind));
        } else {
            let resolved = resolve_raw_facts(
                index,
                &[RawEdgeFact {
                    source: entry.source,
                    target: entry.target,
                    kind: entry.kind,
                }],
            );
            facts.extend(resolved);
        }
    }
    Ok(DependencyGraph::build(index, facts).graph)
}

fn is_identity(endpoint: &str) -> bool {
    endpoint
        .split_once(':')
        .is_some_and(|(code, _)| ElementKind::parse_code(code).is_some())
}

fn parse_kinds(kinds: &[String]) -> Result<Option<Vec<ElementKind>>> {
    if kinds.is_empty() {
        return Ok(None);
    }
    let mut out = Vec::with_capacity(kinds.len());
    for code in kinds {
        match ElementKind::parse_code(code) {
            Some(kind) => out.push(kind),
            None => bail!("unknown type designator '{code}'"),
        }
    }
    Ok(Some(out))
}

fn parse_metadata(pairs: &[String]) -> Result<Option<indexmap::IndexMap<String, MetaValue>>> {
    if pairs.is_empty() {
        return Ok(None);
    }
    let mut out = indexmap::IndexMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("--meta expects KEY=VALUE, got '{pair}'");
        };
        out.insert(key.to_string(), MetaValue::infer(value));
    }
    Ok(Some(out))
}
