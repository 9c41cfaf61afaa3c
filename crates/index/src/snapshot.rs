use crate::record::ElementRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Metadata block of a persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub total_files: usize,
    pub total_elements: usize,
    pub languages: Vec<String>,
}

/// Persisted form of one scan, the drift-baseline storage format.
///
/// The engine only (de)serializes this document; reading and writing files
/// is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,

    /// Seconds since the Unix epoch, stamped by the caller.
    pub timestamp: u64,

    pub elements: Vec<ElementRecord>,

    pub metadata: SnapshotMeta,
}

impl Snapshot {
    /// Wrap a scan, computing the metadata block from the element list.
    pub fn new(timestamp: u64, elements: Vec<ElementRecord>) -> Self {
        let files: BTreeSet<&str> = elements.iter().map(|e| e.path.as_str()).collect();
        let languages: BTreeSet<&str> = elements
            .iter()
            .map(|e| e.language.as_str())
            .filter(|language| !language.is_empty())
            .collect();
        let metadata = SnapshotMeta {
            total_files: files.len(),
            total_elements: elements.len(),
            languages: languages.into_iter().map(String::from).collect(),
        };
        Self {
            version: SNAPSHOT_VERSION,
            timestamp,
            elements,
            metadata,
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coderef_tag::ElementKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn snapshot_metadata_is_computed() {
        let elements = vec![
            ElementRecord::new(ElementKind::Function, "auth/login")
                .with_name("authenticate")
                .with_line(24)
                .with_language("python"),
            ElementRecord::new(ElementKind::Function, "auth/login")
                .with_name("logout")
                .with_line(58)
                .with_language("python"),
            ElementRecord::new(ElementKind::Class, "models/user")
                .with_name("User")
                .with_line(3)
                .with_language("typescript"),
        ];
        let snapshot = Snapshot::new(1_722_000_000, elements);
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.metadata.total_files, 2);
        assert_eq!(snapshot.metadata.total_elements, 3);
        assert_eq!(snapshot.metadata.languages, vec!["python", "typescript"]);
    }

    #[test]
    fn snapshot_json_uses_camel_case_metadata() {
        let snapshot = Snapshot::new(
            0,
            vec![ElementRecord::new(ElementKind::File, "src/main").with_language("rust")],
        );
        let raw = snapshot.to_json().unwrap();
        assert!(raw.contains("\"totalFiles\""));
        assert!(raw.contains("\"totalElements\""));
        assert_eq!(Snapshot::from_json(&raw).unwrap(), snapshot);
    }
}
