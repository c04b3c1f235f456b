//! # Canonical Value Fingerprints
//!
//! A [`Fingerprint`] is the key under which a value is remembered across
//! documents (uniqueness checks). Two values share a fingerprint iff they
//! are the same kind and render identically, so `1`, `1.0`, `"1"` and
//! `true` never collide.
//!
//! Mapping fingerprints are order-insensitive: keys are sorted before
//! rendering, matching the "insertion order is irrelevant for matching"
//! rule of the document model.

use std::fmt;

use serde::Serialize;

use crate::value::Value;

/// Kind-tagged canonical rendering of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a value.
    pub fn of(value: &Value) -> Self {
        let mut out = String::new();
        write_canonical(value, &mut out);
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("n:"),
        Value::Bool(b) => {
            out.push_str("b:");
            out.push_str(if *b { "true" } else { "false" });
        }
        Value::Integer(i) => {
            out.push_str("i:");
            out.push_str(&i.to_string());
        }
        Value::Float(x) => {
            out.push_str("f:");
            // -0.0 and 0.0 compare equal, keep them on one key.
            let x = if *x == 0.0 { 0.0 } else { *x };
            out.push_str(&format!("{x:?}"));
        }
        Value::String(s) => {
            out.push_str("s:");
            out.push_str(&s.len().to_string());
            out.push(':');
            out.push_str(s);
        }
        Value::Sequence(items) => {
            out.push('[');
            for item in items {
                write_canonical(item, out);
                out.push(',');
            }
            out.push(']');
        }
        Value::Mapping(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for key in keys {
                out.push_str(&key.len().to_string());
                out.push(':');
                out.push_str(key);
                out.push('=');
                if let Some(v) = map.get(key) {
                    write_canonical(v, out);
                }
                out.push(',');
            }
            out.push('}');
        }
    }
}
