use coderef_index::{ElementFilter, ElementRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Query input, one request per lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FindRequest {
    /// Free-text query, reserved for external search layers; this engine
    /// only evaluates `filter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default)]
    pub filter: ElementFilter,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Attach `has_relationships` flags (O(1) adjacency checks, no
    /// traversal).
    #[serde(default)]
    pub include_relationships: bool,
}

/// One element in a find result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FoundElement {
    pub identity: String,

    #[serde(flatten)]
    pub element: ElementRecord,

    /// Present only when relationships were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_relationships: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FindResponse {
    pub elements: Vec<FoundElement>,

    /// Matches before `limit` truncation.
    pub total_count: usize,
}

/// Risk bucket by traversal distance: 1 -> high, 2 -> medium, >=3 -> low.
/// Fixed policy, not configurable per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

impl ImpactLevel {
    pub fn from_distance(distance: usize) -> Self {
        match distance {
            0 | 1 => ImpactLevel::High,
            2 => ImpactLevel::Medium,
            _ => ImpactLevel::Low,
        }
    }
}

/// One transitively impacted element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AffectedElement {
    pub identity: String,
    pub distance: usize,
    pub impact_level: ImpactLevel,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ImpactSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImpactResponse {
    /// The origin reference in tag text form.
    pub reference: String,

    pub affected_elements: Vec<AffectedElement>,

    pub impact_summary: ImpactSummary,
}
