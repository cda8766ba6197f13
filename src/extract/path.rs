//! Path resolution - walk one dotted path expression over a nested record
//!
//! A path is a dot-separated list of segments, resolved left to right:
//!
//! - `[]` broadcasts the remaining path over every element of the current
//!   sequence (order preserving)
//! - `[N]` picks the N-th element of the current sequence (0-based)
//! - `name?` reads an optional map key (absent resolves to `""`)
//! - `name` reads a required map key
//!
//! `Reservations.[].Instances.[0]` walks every reservation and takes the
//! first instance of each.

use super::error::PathError;
use serde_json::Value;

/// Result of resolving one path against one record
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// A single value (scalar, map, or a sequence reached without `[]`)
    One(Value),
    /// A broadcast result: one value per element of the wildcarded sequence
    Many(Vec<Value>),
}

impl Resolved {
    /// Collapse a broadcast result into a plain JSON array
    pub fn into_value(self) -> Value {
        match self {
            Resolved::One(value) => value,
            Resolved::Many(items) => Value::Array(items),
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Resolved::Many(_))
    }
}

/// Resolve `path` against `record`.
///
/// Pure function of its inputs; the record is never mutated. A `[]` segment
/// switches resolution into broadcast mode: every later segment is applied
/// per element, and nested wildcards nest the resulting sequences.
pub fn resolve(record: &Value, path: &str) -> Result<Resolved, PathError> {
    match path.split_once('.') {
        None => resolve_segment(record, path),
        Some((head, tail)) => match resolve_segment(record, head)? {
            Resolved::Many(items) => {
                let results = items
                    .iter()
                    .map(|item| resolve(item, tail).map(Resolved::into_value))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Resolved::Many(results))
            }
            Resolved::One(value) => resolve(&value, tail),
        },
    }
}

/// Resolve a single segment against the current value.
///
/// Segment kinds are tried in priority order: wildcard, index literal,
/// optional key, required key. A bracketed segment whose body is not an
/// integer falls through to key lookup.
fn resolve_segment(value: &Value, segment: &str) -> Result<Resolved, PathError> {
    if segment == "[]" {
        return match value {
            Value::Array(items) => Ok(Resolved::Many(items.clone())),
            _ => Err(PathError::NotASequence {
                segment: segment.to_string(),
            }),
        };
    }

    if let Some(index) = parse_index(segment) {
        return match value {
            Value::Array(items) => items.get(index).cloned().map(Resolved::One).ok_or(
                PathError::IndexOutOfRange {
                    index,
                    len: items.len(),
                },
            ),
            _ => Err(PathError::NotASequence {
                segment: segment.to_string(),
            }),
        };
    }

    if let Some(key) = segment.strip_suffix('?') {
        let found = value
            .as_object()
            .ok_or_else(|| PathError::KeyNotFound {
                key: key.to_string(),
            })?
            .get(key);
        return Ok(Resolved::One(
            found.cloned().unwrap_or_else(|| Value::String(String::new())),
        ));
    }

    value
        .as_object()
        .and_then(|map| map.get(segment))
        .cloned()
        .map(Resolved::One)
        .ok_or_else(|| PathError::KeyNotFound {
            key: segment.to_string(),
        })
}

fn parse_index(segment: &str) -> Option<usize> {
    segment
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .and_then(|body| body.parse::<usize>().ok())
}
