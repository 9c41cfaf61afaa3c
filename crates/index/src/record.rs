use coderef_tag::{ElementKind, MetaValue, Reference};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One scanned code element, normalized for indexing.
///
/// The `(path, name, line)` tuple is expected to be unique within a scan;
/// violations surface as duplicate-identity warnings at build time rather
/// than being dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ElementRecord {
    #[serde(rename = "type")]
    pub kind: ElementKind,

    /// Forward-slash path with no file extension.
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, MetaValue>,

    #[serde(default)]
    pub language: String,
}

impl ElementRecord {
    pub fn new(kind: ElementKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            name: None,
            line: None,
            metadata: IndexMap::new(),
            language: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: MetaValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Canonical identity key, `Kind:path#name:line`. Optional parts are
    /// omitted the same way tag text omits them, so identities stay
    /// TagCodec-compatible.
    pub fn identity(&self) -> String {
        let mut key = format!("{}:{}", self.kind.code(), self.path);
        if let Some(name) = &self.name {
            key.push('#');
            key.push_str(name);
        }
        if let Some(line) = self.line {
            key.push(':');
            key.push_str(&line.to_string());
        }
        key
    }

    /// Convert to the tag form (metadata carried over verbatim).
    pub fn to_reference(&self) -> Reference {
        Reference {
            kind: self.kind,
            path: self.path.clone(),
            name: self.name.clone(),
            line: self.line,
            metadata: self.metadata.clone(),
        }
    }
}

/// Raw element shape handed over by an external scanner.
///
/// Field names follow the scanner wire format (`type`, `file`); ingestion
/// normalizes the path before the record enters an index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    #[serde(rename = "type")]
    pub kind: ElementKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub file: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    #[serde(default)]
    pub language: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, MetaValue>,
}

impl ScanRecord {
    /// Normalize into an [`ElementRecord`].
    pub fn into_record(self) -> ElementRecord {
        ElementRecord {
            kind: self.kind,
            path: normalize_path(&self.file),
            name: self.name,
            line: self.line,
            metadata: self.metadata,
            language: self.language,
        }
    }
}

/// Normalize a scanner-reported file path: backslashes become forward
/// slashes and a trailing extension on the final segment is stripped.
pub fn normalize_path(file: &str) -> String {
    let slashed = file.replace('\\', "/");
    let trimmed = slashed.trim_matches('/');
    match trimmed.rsplit_once('/') {
        Some((dir, base)) => match base.rsplit_once('.') {
            Some((stem, _ext)) if !stem.is_empty() => format!("{dir}/{stem}"),
            _ => format!("{dir}/{base}"),
        },
        None => match trimmed.rsplit_once('.') {
            Some((stem, _ext)) if !stem.is_empty() => stem.to_string(),
            _ => trimmed.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identity_mirrors_tag_text() {
        let record = ElementRecord::new(ElementKind::Function, "auth/login")
            .with_name("authenticate")
            .with_line(24);
        assert_eq!(record.identity(), "Fn:auth/login#authenticate:24");

        let bare = ElementRecord::new(ElementKind::File, "src/main");
        assert_eq!(bare.identity(), "File:src/main");
    }

    #[test]
    fn to_reference_round_trips_through_tag_text() {
        let record = ElementRecord::new(ElementKind::Method, "models/user")
            .with_name("save")
            .with_line(102)
            .with_metadata("public", MetaValue::Bool(true));
        let text = coderef_tag::generate(&record.to_reference());
        assert_eq!(text, "@Mth/models/user#save:102{public=true}");
    }

    #[test]
    fn path_normalization() {
        assert_eq!(normalize_path("src\\auth\\login.py"), "src/auth/login");
        assert_eq!(normalize_path("src/auth/login.rs"), "src/auth/login");
        assert_eq!(normalize_path("src/auth/login"), "src/auth/login");
        assert_eq!(normalize_path("main.go"), "main");
        assert_eq!(normalize_path("/src/lib.rs"), "src/lib");
        // Hidden files keep their dot.
        assert_eq!(normalize_path("conf/.env"), "conf/.env");
    }

    #[test]
    fn scan_record_wire_names() {
        let raw = r#"{"type":"Fn","name":"authenticate","file":"auth/login.py","line":24,"language":"python"}"#;
        let scan: ScanRecord = serde_json::from_str(raw).unwrap();
        let record = scan.into_record();
        assert_eq!(record.path, "auth/login");
        assert_eq!(record.identity(), "Fn:auth/login#authenticate:24");
    }
}
