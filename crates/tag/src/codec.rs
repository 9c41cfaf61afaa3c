use crate::error::{Result, TagError};
use crate::kind::ElementKind;
use crate::meta::MetaValue;
use crate::reference::Reference;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;

/// Candidate scanner for tags embedded in free text. The shape is permissive;
/// every candidate still has to survive [`parse`].
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@[A-Za-z]+/[A-Za-z0-9_.\-/]+(?:#[A-Za-z0-9_$.\-]+)?(?::[0-9]+)?(?:\{[^{}\n]*\})?")
        .expect("tag pattern is valid")
});

fn is_path_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-' | b'/')
}

fn is_element_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.' | b'-')
}

/// Parse a single canonical tag. The whole input must be consumed.
pub fn parse(text: &str) -> Result<Reference> {
    let bytes = text.as_bytes();
    if !text.starts_with('@') {
        return Err(TagError::malformed(0, "expected '@'"));
    }

    let body = &text[1..];
    let slash = body
        .find('/')
        .ok_or_else(|| TagError::malformed(text.len(), "missing '/path'"))?;
    let code = &body[..slash];
    if code.is_empty() {
        return Err(TagError::malformed(1, "empty type designator"));
    }
    if !code.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(TagError::malformed(1, "type designator must be alphabetic"));
    }
    let kind = ElementKind::parse_code(code).ok_or_else(|| TagError::UnknownKind {
        code: code.to_string(),
    })?;

    // Past '@Type/'.
    let mut pos = 1 + slash + 1;
    let path_start = pos;
    while pos < bytes.len() && !matches!(bytes[pos], b'#' | b':' | b'{') {
        if !is_path_byte(bytes[pos]) {
            return Err(TagError::malformed(
                pos,
                format!("invalid path character '{}'", bytes[pos] as char),
            ));
        }
        pos += 1;
    }
    let path = &text[path_start..pos];
    if path.is_empty() {
        return Err(TagError::malformed(path_start, "empty path"));
    }
    if path.split('/').any(str::is_empty) {
        return Err(TagError::malformed(path_start, "empty path segment"));
    }

    let mut name = None;
    if pos < bytes.len() && bytes[pos] == b'#' {
        pos += 1;
        let start = pos;
        while pos < bytes.len() && !matches!(bytes[pos], b':' | b'{') {
            if !is_element_byte(bytes[pos]) {
                return Err(TagError::malformed(
                    pos,
                    format!("invalid element character '{}'", bytes[pos] as char),
                ));
            }
            pos += 1;
        }
        if pos == start {
            return Err(TagError::malformed(start, "empty element name"));
        }
        name = Some(text[start..pos].to_string());
    }

    let mut line = None;
    if pos < bytes.len() && bytes[pos] == b':' {
        pos += 1;
        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == start {
            return Err(TagError::malformed(start, "expected line number"));
        }
        let value: u32 = text[start..pos]
            .parse()
            .map_err(|_| TagError::malformed(start, "line number out of range"))?;
        if value == 0 {
            return Err(TagError::malformed(start, "line number must be positive"));
        }
        line = Some(value);
    }

    let mut metadata = IndexMap::new();
    if pos < bytes.len() && bytes[pos] == b'{' {
        let block = &text[pos..];
        if !block.ends_with('}') {
            return match block.rfind('}') {
                None => Err(TagError::malformed(pos, "unterminated metadata block")),
                Some(close) => Err(TagError::malformed(
                    pos + close + 1,
                    "unexpected trailing characters",
                )),
            };
        }
        metadata = parse_metadata(block)?;
        pos = text.len();
    }

    if pos != text.len() {
        return Err(TagError::malformed(pos, "unexpected trailing characters"));
    }

    Ok(Reference {
        kind,
        path: path.to_string(),
        name,
        line,
        metadata,
    })
}

/// Parse a `{...}` block as a JSON object or key=value pairs.
fn parse_metadata(block: &str) -> Result<IndexMap<String, MetaValue>> {
    // JSON first: the kv grammar never produces a quoted key, so the two
    // forms cannot be confused.
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(block) {
        let serde_json::Value::Object(map) = value else {
            return Err(TagError::metadata("JSON metadata must be an object"));
        };
        let mut out = IndexMap::new();
        for (key, value) in map {
            match value {
                serde_json::Value::Null
                | serde_json::Value::Array(_)
                | serde_json::Value::Object(_) => {
                    return Err(TagError::metadata(format!(
                        "unsupported JSON value for key '{key}'"
                    )));
                }
                scalar => {
                    out.insert(key, MetaValue::from(scalar));
                }
            }
        }
        return Ok(out);
    }

    let inner = &block[1..block.len() - 1];
    let mut out = IndexMap::new();
    if inner.trim().is_empty() {
        return Ok(out);
    }
    for pair in inner.split(',') {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| TagError::metadata(format!("expected key=value, got '{pair}'")))?;
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            return Err(TagError::metadata("empty metadata key"));
        }
        if key.contains(['{', '}']) || value.contains(['{', '}']) {
            return Err(TagError::metadata("braces are not allowed in key=value pairs"));
        }
        out.insert(key.to_string(), MetaValue::infer(value));
    }
    Ok(out)
}

/// Emit the canonical text for a reference. Fields appear in fixed order and
/// metadata keys keep their insertion order; this never fails.
pub fn generate(reference: &Reference) -> String {
    let mut out = String::new();
    let _ = write!(out, "@{}/{}", reference.kind.code(), reference.path);
    if let Some(name) = &reference.name {
        let _ = write!(out, "#{name}");
    }
    if let Some(line) = reference.line {
        let _ = write!(out, ":{line}");
    }
    if !reference.metadata.is_empty() {
        out.push_str(&render_metadata(&reference.metadata));
    }
    out
}

fn render_metadata(metadata: &IndexMap<String, MetaValue>) -> String {
    let kv_ok = metadata.iter().all(|(key, value)| {
        !key.is_empty()
            && !key.contains(['=', ',', '{', '}'])
            && !key.chars().any(char::is_control)
            && key.trim() == key
            && value.kv_representable()
    });
    if kv_ok {
        let pairs: Vec<String> = metadata
            .iter()
            .map(|(key, value)| format!("{key}={}", value.render()))
            .collect();
        return format!("{{{}}}", pairs.join(","));
    }

    // JSON form for values the kv grammar cannot carry.
    let map: serde_json::Map<String, serde_json::Value> = metadata
        .iter()
        .map(|(key, value)| (key.clone(), json_value(value)))
        .collect();
    serde_json::Value::Object(map).to_string()
}

fn json_value(value: &MetaValue) -> serde_json::Value {
    match value {
        MetaValue::Bool(b) => serde_json::Value::Bool(*b),
        MetaValue::Int(n) => serde_json::Value::Number((*n).into()),
        MetaValue::Float(x) => serde_json::Number::from_f64(*x)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(x.to_string())),
        MetaValue::Str(s) => serde_json::Value::String(s.clone()),
    }
}

/// Whether `text` is a single valid canonical tag. Never panics.
pub fn is_valid(text: &str) -> bool {
    parse(text).is_ok()
}

/// Lazy iterator over tags embedded in free text, in byte-offset order.
///
/// Candidates that fail [`parse`] (unknown designator, bad metadata) are
/// skipped. Calling [`extract_all`] again restarts the scan.
pub struct ExtractedTags<'t> {
    matches: regex::Matches<'static, 't>,
}

impl<'t> Iterator for ExtractedTags<'t> {
    type Item = (usize, Reference);

    fn next(&mut self) -> Option<Self::Item> {
        for found in self.matches.by_ref() {
            if let Ok(reference) = parse(found.as_str()) {
                return Some((found.start(), reference));
            }
        }
        None
    }
}

/// Scan free text (comments, docs) for embedded tags.
pub fn extract_all(document: &str) -> ExtractedTags<'_> {
    ExtractedTags {
        matches: TAG_PATTERN.find_iter(document),
    }
}
