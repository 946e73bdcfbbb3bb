//! Error Taxonomy

use crate::types::RecordKind;
use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, SensorsError>;

/// Structured failures returned to callers.
///
/// Every variant carries a short stable code (see [`SensorsError::code`])
/// alongside the human-readable message produced by `Display`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorsError {
    /// A required request field is missing.
    #[error("missing required field: {field}")]
    Required { field: String },

    /// A field value is malformed or invalid.
    #[error("bad value for field {field}: {message}")]
    BadValue { field: String, message: String },

    /// A numeric range with min >= max.
    #[error("bad range for {field}: min {min} must be less than max {max}")]
    BadRange { field: String, min: f64, max: f64 },

    /// A foreign id does not reference any existing record.
    #[error("unknown {field}: {id}")]
    UnknownId { field: String, id: String },

    /// A record with the same key already exists (reject-on-duplicate stores).
    #[error("{kind} with key {key} already exists")]
    Exists { kind: RecordKind, key: String },

    /// The underlying store failed; the driver message is passed through.
    #[error("database error: {0}")]
    Db(String),
}

impl SensorsError {
    /// Short stable error code for the outbound interface.
    pub fn code(&self) -> &'static str {
        match self {
            SensorsError::Required { .. } => "REQUIRED",
            SensorsError::BadValue { .. } => "BAD_VAL",
            SensorsError::BadRange { .. } => "BAD_RANGE",
            SensorsError::UnknownId { .. } => "BAD_ID",
            SensorsError::Exists { .. } => "EXISTS",
            SensorsError::Db(_) => "DB",
        }
    }

    /// Convenience constructor for a missing field.
    pub fn required(field: &str) -> Self {
        SensorsError::Required { field: field.to_string() }
    }

    /// Convenience constructor for a malformed field value.
    pub fn bad_value(field: &str, message: impl Into<String>) -> Self {
        SensorsError::BadValue { field: field.to_string(), message: message.into() }
    }

    /// Convenience constructor for an unknown foreign id.
    pub fn unknown_id(field: &str, id: &str) -> Self {
        SensorsError::UnknownId { field: field.to_string(), id: id.to_string() }
    }
}
