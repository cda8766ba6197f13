//! Row extraction - apply parsed field specifications to records

use super::error::{ExtractError, Result};
use super::path::{resolve, Resolved};
use super::spec::FieldSpec;
use super::types::{display_string, Cell, Row};
use serde_json::Value;

/// Projects records into rows through a fixed list of field specifications.
///
/// Specifications are parsed once at construction and applied in order;
/// directives sharing an output name overwrite earlier ones.
pub struct RowExtractor {
    specs: Vec<FieldSpec>,
}

impl RowExtractor {
    /// Parse the given specification tokens. Fails fast on the first
    /// malformed token.
    pub fn new<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let specs = specs
            .iter()
            .map(|s| FieldSpec::parse(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(RowExtractor { specs })
    }

    /// Build an extractor from already-parsed specifications.
    pub fn from_specs(specs: Vec<FieldSpec>) -> Self {
        RowExtractor { specs }
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    /// Extract one row from one record, evaluating directives in
    /// specification order. Resolver failures abort the row and carry the
    /// offending specification.
    pub fn extract(&self, record: &Value) -> Result<Row> {
        let mut row = Row::new();
        for spec in &self.specs {
            row.insert(spec.name.clone(), apply_spec(spec, record)?);
        }
        Ok(row)
    }

    /// Extract one row per record, preserving input order.
    pub fn extract_all(&self, records: &[Value]) -> Result<Vec<Row>> {
        records.iter().map(|record| self.extract(record)).collect()
    }
}

/// One-shot convenience: parse the specifications and extract a single row.
pub fn extract<S: AsRef<str>>(record: &Value, specs: &[S]) -> Result<Row> {
    RowExtractor::new(specs)?.extract(record)
}

fn apply_spec(spec: &FieldSpec, record: &Value) -> Result<Cell> {
    let resolved = resolve(record, &spec.path).map_err(|source| ExtractError::Resolve {
        spec: spec.raw().to_string(),
        path: spec.path.clone(),
        source,
    })?;

    let cell = match (&spec.join, resolved) {
        (Some(sep), resolved) => Cell::Text(join_strings(spec, resolved, sep)?),
        (None, Resolved::Many(items)) => Cell::List(items.iter().map(display_string).collect()),
        // A sequence reached without a wildcard still passes through whole.
        (None, Resolved::One(Value::Array(items))) => {
            Cell::List(items.iter().map(display_string).collect())
        }
        (None, Resolved::One(value)) => Cell::Text(display_string(&value)),
    };

    Ok(match (spec.max_len, cell) {
        (Some(max), Cell::Text(text)) => Cell::Text(truncate(&text, max)),
        // Sequence cells pass through untouched; the renderer owns them.
        (_, cell) => cell,
    })
}

fn join_strings(spec: &FieldSpec, resolved: Resolved, sep: &str) -> Result<String> {
    let items = match resolved {
        Resolved::Many(items) => items,
        Resolved::One(Value::Array(items)) => items,
        Resolved::One(_) => {
            return Err(ExtractError::join_mismatch(
                spec.raw(),
                "resolved to a single non-sequence value",
            ))
        }
    };

    let strings = items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.as_str()),
            other => Err(ExtractError::join_mismatch(
                spec.raw(),
                format!("sequence element {} is not a string", other),
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(strings.join(sep))
}

/// Cut display text past `max` characters, marking the cut with `...`.
/// The truncated result is exactly `max + 3` characters long; text at or
/// under the limit passes through untouched.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}
