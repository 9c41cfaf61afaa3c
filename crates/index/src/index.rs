use crate::error::{IndexError, Result};
use crate::record::ElementRecord;
use crate::stats::IndexStats;
use coderef_tag::{ElementKind, MetaValue};
use globset::Glob;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Non-fatal findings attached to an index build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexWarning {
    /// Two or more scanned elements produced the same identity key. All of
    /// them stay in the index; callers must handle multiplicity.
    DuplicateIdentity { identity: String, count: usize },
}

/// Result of [`ElementIndex::build`]: the index plus any warnings.
#[derive(Debug)]
pub struct IndexBuild {
    pub index: ElementIndex,
    pub warnings: Vec<IndexWarning>,
}

/// Filter for [`ElementIndex::query`]. All provided fields are ANDed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ElementFilter {
    /// Restrict to these type designators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<ElementKind>>,

    /// Glob over the normalized path, e.g. `auth/*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_pattern: Option<String>,

    /// Exact-match metadata pairs; every pair must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_filters: Option<IndexMap<String, MetaValue>>,
}

/// Immutable multi-key lookup over one scan snapshot.
///
/// Built once, never mutated; a fresh scan builds a fresh index. Lookup maps
/// store positions into the stable scan-order record list, so every query
/// result preserves input order.
#[derive(Debug)]
pub struct ElementIndex {
    records: Vec<ElementRecord>,
    by_kind: HashMap<ElementKind, Vec<usize>>,
    by_path: HashMap<String, Vec<usize>>,
    by_name: HashMap<String, Vec<usize>>,
    by_metadata: HashMap<(String, String), Vec<usize>>,
    by_identity: HashMap<String, Vec<usize>>,
}

impl ElementIndex {
    /// Single-pass build over scanned elements.
    pub fn build(records: Vec<ElementRecord>) -> IndexBuild {
        let mut by_kind: HashMap<ElementKind, Vec<usize>> = HashMap::new();
        let mut by_path: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_metadata: HashMap<(String, String), Vec<usize>> = HashMap::new();
        let mut by_identity: HashMap<String, Vec<usize>> = HashMap::new();

        for (pos, record) in records.iter().enumerate() {
            by_kind.entry(record.kind).or_default().push(pos);
            by_path.entry(record.path.clone()).or_default().push(pos);
            if let Some(name) = &record.name {
                by_name.entry(name.clone()).or_default().push(pos);
            }
            for (key, value) in &record.metadata {
                by_metadata
                    .entry((key.clone(), value.render()))
                    .or_default()
                    .push(pos);
            }
            by_identity.entry(record.identity()).or_default().push(pos);
        }

        let mut warnings = Vec::new();
        let mut collisions: Vec<(&String, usize)> = by_identity
            .iter()
            .filter(|(_, positions)| positions.len() > 1)
            .map(|(identity, positions)| (identity, positions.len()))
            .collect();
        collisions.sort_unstable();
        for (identity, count) in collisions {
            log::warn!("duplicate identity '{identity}' ({count} elements)");
            warnings.push(IndexWarning::DuplicateIdentity {
                identity: identity.clone(),
                count,
            });
        }

        log::info!(
            "Indexed {} elements across {} paths ({} warnings)",
            records.len(),
            by_path.len(),
            warnings.len()
        );

        IndexBuild {
            index: ElementIndex {
                records,
                by_kind,
                by_path,
                by_name,
                by_metadata,
                by_identity,
            },
            warnings,
        }
    }

    /// All records in stable scan order.
    pub fn records(&self) -> &[ElementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records under an identity key; more than one entry means the scan
    /// produced a collision.
    pub fn get(&self, identity: &str) -> Vec<&ElementRecord> {
        self.positions_to_records(self.by_identity.get(identity))
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.by_identity.contains_key(identity)
    }

    /// Identity keys in stable scan order (first occurrence wins for
    /// collisions).
    pub fn identities(&self) -> impl Iterator<Item = String> + '_ {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .map(ElementRecord::identity)
            .filter(move |identity| seen.insert(identity.clone()))
    }

    pub fn find_by_kind(&self, kind: ElementKind) -> Vec<&ElementRecord> {
        self.positions_to_records(self.by_kind.get(&kind))
    }

    pub fn find_by_path(&self, path: &str) -> Vec<&ElementRecord> {
        self.positions_to_records(self.by_path.get(path))
    }

    pub fn find_by_name(&self, name: &str) -> Vec<&ElementRecord> {
        self.positions_to_records(self.by_name.get(name))
    }

    pub fn find_by_metadata(&self, key: &str, value: &MetaValue) -> Vec<&ElementRecord> {
        self.positions_to_records(self.by_metadata.get(&(key.to_string(), value.render())))
            .into_iter()
            .filter(|record| record.metadata.get(key) == Some(value))
            .collect()
    }

    /// Filtered lookup in stable scan order, truncated at `limit`.
    pub fn query(
        &self,
        filter: &ElementFilter,
        limit: Option<usize>,
    ) -> Result<Vec<&ElementRecord>> {
        let matcher = match &filter.path_pattern {
            Some(pattern) => Some(
                Glob::new(pattern)
                    .map_err(|source| IndexError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    })?
                    .compile_matcher(),
            ),
            None => None,
        };

        let mut out = Vec::new();
        for record in &self.records {
            if let Some(kinds) = &filter.kinds {
                if !kinds.contains(&record.kind) {
                    continue;
                }
            }
            if let Some(matcher) = &matcher {
                if !matcher.is_match(&record.path) {
                    continue;
                }
            }
            if let Some(pairs) = &filter.metadata_filters {
                let all_match = pairs
                    .iter()
                    .all(|(key, value)| record.metadata.get(key) == Some(value));
                if !all_match {
                    continue;
                }
            }
            out.push(record);
            if let Some(limit) = limit {
                if out.len() == limit {
                    break;
                }
            }
        }
        Ok(out)
    }

    /// Summary of this snapshot.
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats::new();
        stats.elements = self.records.len();
        stats.files = self.by_path.len();
        for record in &self.records {
            if !record.language.is_empty() {
                *stats.languages.entry(record.language.clone()).or_insert(0) += 1;
            }
        }
        stats.duplicates = self
            .by_identity
            .values()
            .filter(|positions| positions.len() > 1)
            .count();
        stats
    }

    fn positions_to_records(&self, positions: Option<&Vec<usize>>) -> Vec<&ElementRecord> {
        positions
            .map(|positions| positions.iter().map(|&pos| &self.records[pos]).collect())
            .unwrap_or_default()
    }
}
