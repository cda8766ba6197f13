use thiserror::Error;

/// Result type alias for extraction calls
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Failures while resolving a single path expression against a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A required map key is absent (or the current value is not a map)
    #[error("key not found: {key:?}")]
    KeyNotFound { key: String },

    /// A literal sequence index exceeds the sequence bounds
    #[error("index {index} out of range (sequence has {len} elements)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A `[]` or `[N]` segment was applied to a non-sequence value
    #[error("segment {segment:?} applied to a non-sequence value")]
    NotASequence { segment: String },
}

/// Failures of a single extraction call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A field-specification string does not match the grammar
    #[error("malformed field specification {spec:?}: {reason}")]
    MalformedSpecification { spec: String, reason: String },

    /// A join separator was supplied but the value is not a sequence of strings
    #[error("field {spec:?}: join requires a sequence of strings ({reason})")]
    JoinTypeMismatch { spec: String, reason: String },

    /// The path resolver failed; tagged with the offending field spec
    #[error("field {spec:?}, path {path:?}: {source}")]
    Resolve {
        spec: String,
        path: String,
        #[source]
        source: PathError,
    },
}

impl ExtractError {
    pub(crate) fn malformed(spec: &str, reason: impl Into<String>) -> Self {
        ExtractError::MalformedSpecification {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn join_mismatch(spec: &str, reason: impl Into<String>) -> Self {
        ExtractError::JoinTypeMismatch {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}
