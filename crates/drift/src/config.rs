use serde::{Deserialize, Serialize};

/// Minimum name-similarity ratio for a rename classification.
pub const DEFAULT_RENAME_THRESHOLD: f64 = 0.7;

/// Candidates within this distance of the best ratio count as tied.
pub const DEFAULT_AMBIGUITY_EPSILON: f64 = 0.01;

/// Tunables for drift comparison. The defaults mirror long-standing
/// operational values; both knobs are per-detector, not global.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DriftConfig {
    pub rename_threshold: f64,
    pub ambiguity_epsilon: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            rename_threshold: DEFAULT_RENAME_THRESHOLD,
            ambiguity_epsilon: DEFAULT_AMBIGUITY_EPSILON,
        }
    }
}

impl DriftConfig {
    pub fn with_threshold(mut self, rename_threshold: f64) -> Self {
        self.rename_threshold = rename_threshold;
        self
    }

    pub fn with_epsilon(mut self, ambiguity_epsilon: f64) -> Self {
        self.ambiguity_epsilon = ambiguity_epsilon;
        self
    }
}
