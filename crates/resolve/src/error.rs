//! Resolution pipeline errors
//!
//! Only contract violations surface as errors; data-layer failures are
//! recovered inside the fallback executor and resolve to "no data".

use thiserror::Error;

/// Caller contract violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("record type must not be empty")]
    EmptyRecordType,

    #[error("record id must not be empty")]
    EmptyRecordId,
}

/// Validate the (record_type, id) pair every fetch entry point receives.
pub(crate) fn validate_request(record_type: &str, id: &str) -> Result<(), ResolveError> {
    if record_type.trim().is_empty() {
        return Err(ResolveError::EmptyRecordType);
    }
    if id.trim().is_empty() {
        return Err(ResolveError::EmptyRecordId);
    }
    Ok(())
}
