use crate::config::DriftConfig;
use crate::types::{DriftResult, DriftStatus};
use coderef_index::{ElementIndex, ElementRecord};
use strsim::normalized_levenshtein;

/// Compares a baseline index against a freshly built one.
pub struct DriftDetector {
    config: DriftConfig,
}

impl DriftDetector {
    pub fn new(config: DriftConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(DriftConfig::default())
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Classify every baseline element against `current`.
    ///
    /// Exactly one result per baseline element, in baseline scan order;
    /// identical inputs always produce identical output.
    pub fn compare(&self, baseline: &ElementIndex, current: &ElementIndex) -> Vec<DriftResult> {
        let results: Vec<DriftResult> = baseline
            .records()
            .iter()
            .map(|record| self.classify(record, current))
            .collect();
        log::info!(
            "drift: classified {} baseline elements ({} missing, {} ambiguous)",
            results.len(),
            results
                .iter()
                .filter(|r| r.status == DriftStatus::Missing)
                .count(),
            results
                .iter()
                .filter(|r| r.status == DriftStatus::Ambiguous)
                .count(),
        );
        results
    }

    fn classify(&self, record: &ElementRecord, current: &ElementIndex) -> DriftResult {
        let reference = record.to_reference();

        // 1. Exact identity match.
        if current.contains(&record.identity()) {
            return DriftResult::bare(DriftStatus::Unchanged, reference);
        }

        // 2. Same (type, path, name) at another line. The identity check
        // above already failed, so any hit here differs in line.
        if let Some(moved) = current
            .find_by_path(&record.path)
            .into_iter()
            .find(|candidate| candidate.kind == record.kind && candidate.name == record.name)
        {
            let mut result = DriftResult::bare(DriftStatus::Moved, reference);
            result.old_line = record.line;
            result.new_line = moved.line;
            result.confidence = Some(1.0);
            return result;
        }

        // 3/4/5. Rename candidates share (type, path) and carry a name.
        let Some(old_name) = record.name.as_deref() else {
            return DriftResult::bare(DriftStatus::Missing, reference);
        };

        let mut candidates: Vec<&ElementRecord> = current
            .find_by_path(&record.path)
            .into_iter()
            .filter(|candidate| candidate.kind == record.kind && candidate.name.is_some())
            .collect();
        // Stable by-path-then-by-name order fixes both iteration and
        // tie-break selection.
        candidates.sort_by(|a, b| (&a.path, &a.name).cmp(&(&b.path, &b.name)));

        let mut best: Option<(f64, &ElementRecord)> = None;
        let mut scored: Vec<(f64, &ElementRecord)> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let new_name = candidate.name.as_deref().unwrap_or_default();
            let ratio = normalized_levenshtein(old_name, new_name);
            scored.push((ratio, candidate));
            // Strict comparison keeps the first candidate on exact ties.
            if best.map_or(true, |(best_ratio, _)| ratio > best_ratio) {
                best = Some((ratio, candidate));
            }
        }

        let Some((best_ratio, best_candidate)) = best else {
            return DriftResult::bare(DriftStatus::Missing, reference);
        };
        if best_ratio < self.config.rename_threshold {
            return DriftResult::bare(DriftStatus::Missing, reference);
        }

        let tied: Vec<&ElementRecord> = scored
            .iter()
            .filter(|(ratio, _)| {
                *ratio >= self.config.rename_threshold
                    && best_ratio - ratio <= self.config.ambiguity_epsilon
            })
            .map(|&(_, candidate)| candidate)
            .collect();

        if tied.len() >= 2 {
            let mut result = DriftResult::bare(DriftStatus::Ambiguous, reference);
            result.old_name = Some(old_name.to_string());
            result.confidence = Some(best_ratio);
            result.candidates = Some(tied.into_iter().cloned().collect());
            return result;
        }

        let mut result = DriftResult::bare(DriftStatus::Renamed, reference);
        result.old_name = Some(old_name.to_string());
        result.new_name = best_candidate.name.clone();
        result.confidence = Some(best_ratio);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coderef_index::ElementIndex;
    use coderef_tag::ElementKind;
    use pretty_assertions::assert_eq;

    fn element(path: &str, name: &str, line: u32) -> ElementRecord {
        ElementRecord::new(ElementKind::Function, path)
            .with_name(name)
            .with_line(line)
    }

    fn index_of(records: Vec<ElementRecord>) -> ElementIndex {
        ElementIndex::build(records).index
    }

    #[test]
    fn unchanged_on_exact_identity() {
        let baseline = index_of(vec![element("auth/login", "authenticate", 24)]);
        let current = index_of(vec![element("auth/login", "authenticate", 24)]);
        let results = DriftDetector::with_defaults().compare(&baseline, &current);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, DriftStatus::Unchanged);
        assert_eq!(results[0].confidence, None);
    }

    #[test]
    fn moved_when_only_the_line_changed() {
        let baseline = index_of(vec![element("auth/login", "authenticate", 24)]);
        let current = index_of(vec![element("auth/login", "authenticate", 40)]);
        let results = DriftDetector::with_defaults().compare(&baseline, &current);
        assert_eq!(results[0].status, DriftStatus::Moved);
        assert_eq!(results[0].old_line, Some(24));
        assert_eq!(results[0].new_line, Some(40));
        assert_eq!(results[0].confidence, Some(1.0));
    }

    #[test]
    fn renamed_above_threshold() {
        let baseline = index_of(vec![element("auth/login", "authenticate", 24)]);
        let current = index_of(vec![element("auth/login", "authenticateUser", 24)]);
        let results = DriftDetector::with_defaults().compare(&baseline, &current);
        assert_eq!(results[0].status, DriftStatus::Renamed);
        assert_eq!(results[0].old_name.as_deref(), Some("authenticate"));
        assert_eq!(results[0].new_name.as_deref(), Some("authenticateUser"));
        // distance 4 over max length 16
        let confidence = results[0].confidence.unwrap();
        assert!((confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn missing_when_nothing_reaches_threshold() {
        let baseline = index_of(vec![element("auth/login", "authenticate", 24)]);
        let current = index_of(vec![element("auth/login", "totallyDifferent", 24)]);
        let results = DriftDetector::with_defaults().compare(&baseline, &current);
        assert_eq!(results[0].status, DriftStatus::Missing);
        assert_eq!(results[0].candidates, None);
    }

    #[test]
    fn ambiguous_when_two_candidates_tie() {
        // Both candidates are one substitution away from a 4-char name:
        // ratio 0.75 each.
        let baseline = index_of(vec![element("svc/pay", "save", 10)]);
        let current = index_of(vec![
            element("svc/pay", "sav1", 11),
            element("svc/pay", "sav2", 12),
        ]);
        let results = DriftDetector::with_defaults().compare(&baseline, &current);
        assert_eq!(results[0].status, DriftStatus::Ambiguous);
        let confidence = results[0].confidence.unwrap();
        assert!((confidence - 0.75).abs() < 1e-9);
        let candidates = results[0].candidates.as_ref().unwrap();
        assert_eq!(candidates.len(), 2);
        let names: Vec<&str> = candidates
            .iter()
            .map(|c| c.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["sav1", "sav2"]);
    }

    #[test]
    fn near_tie_outside_epsilon_is_a_rename() {
        // 0.9167 vs 0.75: the runner-up is outside the epsilon band.
        let baseline = index_of(vec![element("auth/login", "authenticate", 24)]);
        let current = index_of(vec![
            element("auth/login", "authenticateUser", 24),
            element("auth/login", "authenticat", 30),
        ]);
        let results = DriftDetector::with_defaults().compare(&baseline, &current);
        assert_eq!(results[0].status, DriftStatus::Renamed);
        assert_eq!(results[0].new_name.as_deref(), Some("authenticat"));
    }

    #[test]
    fn exact_ties_list_candidates_in_stable_name_order() {
        // Scan order is reversed; the attached candidates still come out in
        // by-path-then-by-name order. A zero epsilon still counts exact
        // ties as ambiguous.
        let config = DriftConfig::default().with_epsilon(0.0);
        let baseline = index_of(vec![element("svc/pay", "save", 10)]);
        let current = index_of(vec![
            element("svc/pay", "sav2", 12),
            element("svc/pay", "sav1", 11),
        ]);
        let results = DriftDetector::new(config).compare(&baseline, &current);
        assert_eq!(results[0].status, DriftStatus::Ambiguous);
        let names: Vec<&str> = results[0]
            .candidates
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["sav1", "sav2"]);
    }

    #[test]
    fn baseline_without_name_cannot_be_renamed() {
        let baseline = index_of(vec![
            ElementRecord::new(ElementKind::File, "src/main").with_line(1)
        ]);
        let current = index_of(vec![ElementRecord::new(ElementKind::File, "src/app")
            .with_line(1)]);
        let results = DriftDetector::with_defaults().compare(&baseline, &current);
        assert_eq!(results[0].status, DriftStatus::Missing);
    }

    #[test]
    fn every_baseline_element_gets_exactly_one_status() {
        let baseline = index_of(vec![
            element("auth/login", "authenticate", 24),
            element("auth/login", "logout", 58),
            element("billing/invoice", "total", 12),
        ]);
        let current = index_of(vec![
            element("auth/login", "authenticate", 40),
            element("auth/login", "logOut", 58),
        ]);
        let results = DriftDetector::with_defaults().compare(&baseline, &current);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, DriftStatus::Moved);
        assert_eq!(results[1].status, DriftStatus::Renamed);
        assert_eq!(results[2].status, DriftStatus::Missing);
    }

    #[test]
    fn compare_is_deterministic() {
        let baseline = index_of(vec![
            element("auth/login", "authenticate", 24),
            element("svc/pay", "charge", 10),
        ]);
        let current = index_of(vec![
            element("auth/login", "authenticateUser", 24),
            element("svc/pay", "recharge", 10),
        ]);
        let detector = DriftDetector::with_defaults();
        let first = serde_json::to_string(&detector.compare(&baseline, &current)).unwrap();
        let second = serde_json::to_string(&detector.compare(&baseline, &current)).unwrap();
        assert_eq!(first, second);
    }
}
