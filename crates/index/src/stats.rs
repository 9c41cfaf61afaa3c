use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary of an index snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of indexed elements
    pub elements: usize,

    /// Number of distinct paths
    pub files: usize,

    /// Element counts per language
    pub languages: HashMap<String, usize>,

    /// Identity keys with more than one element
    pub duplicates: usize,
}

impl IndexStats {
    pub fn new() -> Self {
        Self::default()
    }
}
