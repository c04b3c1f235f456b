//! # Document Loading
//!
//! Turns YAML source (JSON is accepted as the YAML subset it is) into the
//! [`Value`] tree the engine consumes. Both documents and schemas go through
//! [`parse_document`]; reading from disk goes through [`load_document`],
//! which bounds the number of bytes read.

use std::io::Read;
use std::path::Path;

use crate::error::ParseError;
use crate::value::{Mapping, Value};

/// Default upper bound on a single document's size: 16 MiB.
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 16 * 1024 * 1024;

/// Parse YAML source into a document tree.
///
/// `origin` names the source in error messages (usually its path).
///
/// # Errors
///
/// Returns `ParseError::Syntax` for malformed YAML and
/// `ParseError::Unsupported` for content the document model cannot
/// represent (complex mapping keys, integers outside `i64`).
pub fn parse_document(source: &str, origin: &str) -> Result<Value, ParseError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(source).map_err(|e| ParseError::Syntax {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;

    from_yaml(&yaml).map_err(|reason| ParseError::Unsupported {
        origin: origin.to_string(),
        reason,
    })
}

/// Read and parse a document from disk, refusing files larger than `max_bytes`.
///
/// # Errors
///
/// Returns `ParseError::Unreadable` if the file cannot be opened or read,
/// `ParseError::TooLarge` if it exceeds `max_bytes`, and any error from
/// [`parse_document`].
pub fn load_document(path: &Path, max_bytes: u64) -> Result<Value, ParseError> {
    let origin = path.display().to_string();
    let unreadable = |source: std::io::Error| ParseError::Unreadable {
        origin: origin.clone(),
        source,
    };

    let file = std::fs::File::open(path).map_err(unreadable)?;
    let size = file.metadata().map_err(unreadable)?.len();
    if size > max_bytes {
        return Err(ParseError::TooLarge {
            origin: origin.clone(),
            size,
            limit: max_bytes,
        });
    }

    let mut content = String::with_capacity(size as usize);
    file.take(max_bytes + 1)
        .read_to_string(&mut content)
        .map_err(unreadable)?;
    if content.len() as u64 > max_bytes {
        return Err(ParseError::TooLarge {
            origin,
            size: content.len() as u64,
            limit: max_bytes,
        });
    }

    parse_document(&content, &origin)
}

/// Convert a `serde_yaml::Value` into a document tree.
///
/// Scalar mapping keys (numbers, booleans) become their string rendering;
/// tags are dropped and the inner value kept.
fn from_yaml(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i))
            } else if n.as_u64().is_some() {
                Err(format!("integer {n} does not fit in 64 signed bits"))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(from_yaml).collect();
            Ok(Value::Sequence(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                out.insert(key, from_yaml(v)?);
            }
            Ok(Value::Mapping(out))
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_nested_yaml() {
        let doc = parse_document(
            r#"
name: team-a
replicas: 3
ratio: 0.5
enabled: true
owner: ~
ports:
  - 80
  - 443
"#,
            "inline",
        )
        .unwrap();

        assert_eq!(doc.get("name"), Some(&Value::from("team-a")));
        assert_eq!(doc.get("replicas"), Some(&Value::Integer(3)));
        assert_eq!(doc.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(doc.get("enabled"), Some(&Value::Bool(true)));
        assert_eq!(doc.get("owner"), Some(&Value::Null));
        assert_eq!(
            doc.get("ports").and_then(|p| p.as_sequence()).map(|s| s.len()),
            Some(2)
        );
    }

    #[test]
    fn preserves_source_key_order() {
        let doc = parse_document("zeta: 1\nalpha: 2\nmid: 3\n", "inline").unwrap();
        let keys: Vec<&str> = doc.as_mapping().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn scalar_keys_are_stringified() {
        let doc = parse_document("1: one\ntrue: yes\n", "inline").unwrap();
        assert_eq!(doc.get("1"), Some(&Value::from("one")));
        assert!(doc.get("true").is_some());
    }

    #[test]
    fn accepts_json_source() {
        let doc = parse_document(r#"{"name": "x", "items": [1, 2]}"#, "inline.json").unwrap();
        assert_eq!(doc.get("name"), Some(&Value::from("x")));
    }

    #[test]
    fn tags_are_dropped() {
        let doc = parse_document("value: !custom {a: 1}\n", "inline").unwrap();
        assert_eq!(doc.get("value").and_then(|v| v.get("a")), Some(&Value::Integer(1)));
    }

    #[test]
    fn malformed_yaml_is_syntax_error() {
        let err = parse_document("name: [unclosed\n", "broken.yml").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
        assert!(err.to_string().contains("broken.yml"));
    }

    #[test]
    fn oversized_integer_is_unsupported() {
        let err = parse_document("big: 18446744073709551615\n", "big.yml").unwrap_err();
        assert!(matches!(err, ParseError::Unsupported { .. }));
    }

    #[test]
    fn load_document_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team-a.yml");
        std::fs::write(&path, "name: team-a\n").unwrap();
        let doc = load_document(&path, DEFAULT_MAX_DOCUMENT_BYTES).unwrap();
        assert_eq!(doc.get("name"), Some(&Value::from("team-a")));
    }

    #[test]
    fn load_document_rejects_oversized_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"name: a-rather-long-value\n").unwrap();
        let err = load_document(file.path(), 8).unwrap_err();
        assert!(matches!(err, ParseError::TooLarge { limit: 8, .. }));
    }

    #[test]
    fn load_document_missing_file_is_unreadable() {
        let err = load_document(Path::new("/nonexistent/yval/doc.yml"), 1024).unwrap_err();
        assert!(matches!(err, ParseError::Unreadable { .. }));
    }
}
