//! Source-layer errors

use thiserror::Error;

/// Failure surfaced by a single source attempt.
///
/// None of these propagate out of the pipeline; the fallback executor
/// catches them at the source boundary and moves on to the next source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Source reported itself down
    #[error("source {source_name} is unavailable")]
    Unavailable { source_name: String },

    /// Source does not serve this record type
    #[error("source {source_name} does not support record type '{record_type}'")]
    UnsupportedType {
        source_name: String,
        record_type: String,
    },

    /// The backing system failed mid-fetch
    #[error("source {source_name} backend failure: {message}")]
    Backend { source_name: String, message: String },

    /// A fetch exceeded its deadline; configured by the source itself
    #[error("source {source_name} timed out after {elapsed_ms}ms")]
    Timeout { source_name: String, elapsed_ms: u64 },
}

impl SourceError {
    /// Create a backend failure error
    pub fn backend(source: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::Backend {
            source_name: source.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while wiring the registry at startup.
///
/// These are contract violations and do propagate to the caller.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Resolver selection is by name, so names must be unique
    #[error("a source named '{name}' is already registered")]
    DuplicateName { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message() {
        let err = SourceError::backend("ledger", "connection reset");
        assert!(err.to_string().contains("ledger"));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_duplicate_name_message() {
        let err = RegistryError::DuplicateName {
            name: "cache".into(),
        };
        assert!(err.to_string().contains("cache"));
    }
}
