//! Error types for tagnet operations.
//!
//! Sparse data is never an error: empty subsets, empty counters and
//! empty graphs are valid results. Errors are reserved for structurally
//! invalid inputs, which indicate a configuration defect.

use thiserror::Error;

/// Result type for tagnet operations.
pub type Result<T> = std::result::Result<T, TagnetError>;

/// Errors that can occur during tagnet operations.
#[derive(Debug, Error)]
pub enum TagnetError {
    /// Dictionary or pipeline configuration is malformed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Input corpus could not be read.
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The dictionary document does not have the expected shape.
    #[error("Malformed dictionary at {path}: expected {expected}")]
    MalformedDictionary { path: String, expected: String },

    /// Two categories share a name.
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),

    /// Two tags share a name within one category.
    #[error("Duplicate tag '{tag}' in category '{category}'")]
    DuplicateTag { category: String, tag: String },

    /// Two markers share a name.
    #[error("Duplicate marker: {0}")]
    DuplicateMarker(String),

    /// A category, tag or marker has an empty name.
    #[error("Empty name for {0}")]
    EmptyName(String),

    /// Unknown category referenced by a caller.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Corpus loading errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorpusError {
    /// Input document is not a JSON array of records.
    #[error("Expected a JSON array of records in {0}")]
    NotAnArray(String),

    /// Input path does not exist.
    #[error("Corpus path not found: {0}")]
    NotFound(String),
}

// Convenience constructors
impl TagnetError {
    pub fn malformed(path: impl Into<String>, expected: impl Into<String>) -> Self {
        TagnetError::Config(ConfigError::MalformedDictionary {
            path: path.into(),
            expected: expected.into(),
        })
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TagnetError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    pub fn unknown_category(name: impl Into<String>) -> Self {
        TagnetError::Config(ConfigError::UnknownCategory(name.into()))
    }

    /// Whether this error came from configuration rather than data.
    pub fn is_config(&self) -> bool {
        matches!(self, TagnetError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = TagnetError::malformed("$.COLOR", "an object of keyword lists");
        assert_eq!(
            err.to_string(),
            "Config error: Malformed dictionary at $.COLOR: expected an object of keyword lists"
        );
        assert!(err.is_config());
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TagnetError = io.into();
        assert!(matches!(err, TagnetError::Io(_)));
        assert!(!err.is_config());
    }
}
