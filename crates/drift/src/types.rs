use coderef_index::ElementRecord;
use coderef_tag::Reference;
use serde::{Deserialize, Serialize};

/// How a baseline reference relates to the current scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftStatus {
    Unchanged,
    Moved,
    Renamed,
    Missing,
    Ambiguous,
}

/// Classification of one baseline reference. Produced fresh on every
/// comparison; never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftResult {
    pub status: DriftStatus,

    /// The baseline reference in tag form.
    pub reference: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_line: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_line: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,

    /// Match confidence in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Tied candidates for `ambiguous` results, in stable current order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<ElementRecord>>,
}

impl DriftResult {
    pub(crate) fn bare(status: DriftStatus, reference: Reference) -> Self {
        Self {
            status,
            reference,
            old_line: None,
            new_line: None,
            old_name: None,
            new_name: None,
            confidence: None,
            candidates: None,
        }
    }
}
